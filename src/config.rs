use crate::classifier::SampleTag;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::resolver::StatusTable;
use crate::source::DEFAULT_BAUD_RATE;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub device: DeviceConfig,
    pub protocol: ProtocolConfig,
    pub status: StatusConfig,
    pub monitoring: MonitoringConfig,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial device path; usually given with `-d` instead.
    pub path: Option<String>,
    pub baud_rate: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Tag carrying heartbeat samples: "BEAT" or "DATA".
    pub sample_tag: SampleTag,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// "verbose" (status, advice and colors) or "minimal" (status only).
    pub table: StatusTable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub history_capacity: usize,
    /// How often to log monitor stats (records applied, unrecognized lines) at INFO level.
    pub stats_log_interval_secs: u64,
    /// Log every parsed line and the resulting state.
    pub debug: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            stats_log_interval_secs: 60,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub tick_ms: u64,
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`) and applies `PORT`.
    /// A missing default file means built-in defaults; a missing file named
    /// by `CONFIG_FILE` is an error.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("CONFIG_FILE").ok().filter(|p| !p.is_empty());
        let mut config = match &explicit {
            Some(path) => Self::parse_file(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::parse_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_port_env(std::env::var("PORT").ok().as_deref())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config file.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("config file {}: {}", path.display(), e))?;
        Self::parse(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config = Self::parse(s)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Overrides `server.port` from the `PORT` value; unset or empty keeps the configured port.
    pub fn apply_port_env(&mut self, port: Option<&str>) -> anyhow::Result<()> {
        let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(());
        };
        self.server.port = raw
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number, got {:?}: {}", raw, e))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.device.path.as_deref() != Some(""),
            "device.path must be non-empty when set"
        );
        anyhow::ensure!(
            self.device.baud_rate > 0,
            "device.baud_rate must be > 0, got {}",
            self.device.baud_rate
        );
        anyhow::ensure!(
            self.monitoring.history_capacity > 0,
            "monitoring.history_capacity must be > 0, got {}",
            self.monitoring.history_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.simulator.tick_ms > 0,
            "simulator.tick_ms must be > 0, got {}",
            self.simulator.tick_ms
        );
        Ok(())
    }
}
