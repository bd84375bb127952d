// Domain models: classified records, rate codes, published snapshot

use std::fmt;

/// Heart-rate trend reported by the device on `RATE:` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateCode {
    Normal,
    High,
    Low,
    Rising,
    Falling,
}

impl RateCode {
    pub const ALL: [RateCode; 5] = [
        RateCode::Normal,
        RateCode::High,
        RateCode::Low,
        RateCode::Rising,
        RateCode::Falling,
    ];

    /// Parse the single-character wire code (`N`, `H`, `L`, `R`, `F`).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(RateCode::Normal),
            'H' => Some(RateCode::High),
            'L' => Some(RateCode::Low),
            'R' => Some(RateCode::Rising),
            'F' => Some(RateCode::Falling),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            RateCode::Normal => 'N',
            RateCode::High => 'H',
            RateCode::Low => 'L',
            RateCode::Rising => 'R',
            RateCode::Falling => 'F',
        }
    }

    /// Position in `ALL`; used to index the status tables.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Why a line did not classify as a known record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Unrecognized {
    #[error("line shorter than the 4-character tag")]
    TooShort,
    #[error("unknown tag {0:?}")]
    UnknownTag(String),
    #[error("{tag} line has no payload")]
    MissingPayload { tag: String },
    #[error("sample payload {0:?} is not a number")]
    NotANumber(String),
    #[error("rate code {0:?} is not one of N, H, L, R, F")]
    UnknownRateCode(String),
}

/// One classified telemetry line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    ModeChange { mode: char },
    BeatSample { value: f64 },
    RateEvent { code: RateCode },
    Unrecognized { raw: String, reason: Unrecognized },
}

/// Point-in-time copy of the monitor state handed to HTTP readers.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSnapshot {
    pub mode: char,
    /// Oldest first.
    pub history: Vec<f64>,
    pub status: String,
    pub action: String,
    pub action_color: String,
    pub badge_color: String,
    pub records_applied: u64,
    pub unrecognized_lines: u64,
}
