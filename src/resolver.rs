// Rate code -> display status, advice, colors

use crate::models::RateCode;
use serde::Deserialize;

/// Display fields derived from one rate code. Always applied as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: &'static str,
    pub action: &'static str,
    /// Text color for the action line.
    pub action_color: &'static str,
    /// Badge class for the status label.
    pub badge_color: &'static str,
}

/// Table richness. `Minimal` is status-only: the action line repeats the
/// status text. Colors are the same in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTable {
    #[default]
    Verbose,
    Minimal,
}

const OK_COLORS: (&str, &str) = ("green", "success");
const ALARM_COLORS: (&str, &str) = ("red", "danger");

const fn entry(
    status: &'static str,
    action: &'static str,
    colors: (&'static str, &'static str),
) -> StatusEntry {
    StatusEntry {
        status,
        action,
        action_color: colors.0,
        badge_color: colors.1,
    }
}

// Indexed by RateCode::index(): N, H, L, R, F.
static VERBOSE: [StatusEntry; 5] = [
    entry("Normal", "You're good!", OK_COLORS),
    entry("HIGH", "Call 911!", ALARM_COLORS),
    entry("LOW", "Call 911!", ALARM_COLORS),
    entry("Rising Rapidly", "Take it easy ...", ALARM_COLORS),
    entry("Falling Rapidly", "Take it easy ...", ALARM_COLORS),
];

static MINIMAL: [StatusEntry; 5] = [
    entry("Normal", "Normal", OK_COLORS),
    entry("HIGH", "HIGH", ALARM_COLORS),
    entry("LOW", "LOW", ALARM_COLORS),
    entry("Rising Rapidly", "Rising Rapidly", ALARM_COLORS),
    entry("Falling Rapidly", "Falling Rapidly", ALARM_COLORS),
];

/// Immutable lookup over the full rate alphabet.
#[derive(Debug, Clone)]
pub struct StatusResolver {
    table: &'static [StatusEntry; 5],
}

impl StatusResolver {
    pub fn new(table: StatusTable) -> Self {
        let table = match table {
            StatusTable::Verbose => &VERBOSE,
            StatusTable::Minimal => &MINIMAL,
        };
        Self { table }
    }

    pub fn resolve(&self, code: RateCode) -> &'static StatusEntry {
        let table: &'static [StatusEntry; 5] = self.table;
        &table[code.index()]
    }

    /// Fields shown before any rate event arrives.
    pub fn initial(&self) -> &'static StatusEntry {
        self.resolve(RateCode::Normal)
    }
}

impl Default for StatusResolver {
    fn default() -> Self {
        Self::new(StatusTable::default())
    }
}
