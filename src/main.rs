use anyhow::Result;
use clap::Parser;
use heartbeat_monitor::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// `RUST_LOG` when set, else `info` (`debug` in debug mode). Debug mode always
/// enables this crate's DEBUG events on top of `RUST_LOG`.
fn log_filter(debug: bool, rust_log: Option<&str>) -> Result<EnvFilter> {
    let default_level = if debug { "debug" } else { "info" };
    let mut filter = rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));
    if debug {
        filter = filter.add_directive("heartbeat_monitor=debug".parse()?);
    }
    Ok(filter)
}

#[derive(Parser, Debug)]
#[command(name = "heartbeat-monitor", version)]
#[command(about = "Serve heartbeat sensor telemetry from a serial device over HTTP")]
struct Args {
    /// Serial device path (e.g. /dev/ttyACM0)
    #[arg(short = 'd', long, conflicts_with_all = ["replay", "simulate"])]
    device: Option<String>,

    /// Read recorded lines from a file instead of the serial device
    #[arg(long, conflicts_with = "simulate")]
    replay: Option<PathBuf>,

    /// Feed the monitor from the built-in device simulator
    #[arg(long)]
    simulate: bool,

    /// Log every parsed line and the resulting state
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut app_config = config::AppConfig::load()?;
    app_config.monitoring.debug |= args.debug;
    if args.device.is_some() {
        app_config.device.path = args.device.clone();
    }

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = log_filter(app_config.monitoring.debug, rust_log.as_deref())?;
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();
    tracing::info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let (source, _simulator_handle) = if args.simulate {
        let seed = app_config.simulator.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, tick_ms = app_config.simulator.tick_ms, "using simulated device");
        let (source, handle) = simulator::spawn(
            seed,
            tokio::time::Duration::from_millis(app_config.simulator.tick_ms),
        );
        (source, Some(handle))
    } else if let Some(path) = &args.replay {
        (source::LineSource::open_replay(path).await?, None)
    } else {
        let path = app_config.device.path.as_deref().ok_or_else(|| {
            anyhow::anyhow!("no serial device given; pass -d <path>, --replay or --simulate")
        })?;
        (
            source::LineSource::open_serial(path, app_config.device.baud_rate)?,
            None,
        )
    };

    let classifier = classifier::Classifier::new(app_config.protocol.sample_tag);
    let resolver = resolver::StatusResolver::new(app_config.status.table);
    let state = state::MonitorState::new(resolver, app_config.monitoring.history_capacity);
    let (publisher, snapshots) = publisher::channel(&state);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let mut consumer_handle = consumer::spawn(
        consumer::ConsumerDeps {
            source,
            classifier,
            state,
            publisher,
            shutdown_rx,
        },
        consumer::ConsumerConfig {
            debug: app_config.monitoring.debug,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(snapshots);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        result = &mut consumer_handle => {
            // The consumer only returns on its own when the line source fails.
            match result {
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "telemetry stream ended");
                    std::process::exit(1);
                }
                Ok(Ok(_)) => anyhow::bail!("consumer stopped unexpectedly"),
                Err(e) => anyhow::bail!("consumer task failed: {}", e),
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = consumer_handle.await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
