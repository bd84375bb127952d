// Shared test helpers

#![allow(dead_code)]

use heartbeat_monitor::classifier::{Classifier, SampleTag};
use heartbeat_monitor::consumer::ingest_line;
use heartbeat_monitor::models::MonitorSnapshot;
use heartbeat_monitor::state::MonitorState;

/// Display fields only; leaves out the observability counters.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub mode: char,
    pub history: Vec<f64>,
    pub status: String,
    pub action: String,
    pub action_color: String,
    pub badge_color: String,
}

pub fn display(snapshot: &MonitorSnapshot) -> DisplayFields {
    DisplayFields {
        mode: snapshot.mode,
        history: snapshot.history.clone(),
        status: snapshot.status.clone(),
        action: snapshot.action.clone(),
        action_color: snapshot.action_color.clone(),
        badge_color: snapshot.badge_color.clone(),
    }
}

pub fn feed(state: &mut MonitorState, lines: &[&str]) {
    let classifier = Classifier::new(SampleTag::Beat);
    for line in lines {
        ingest_line(line, &classifier, state, false);
    }
}

pub fn state_after(lines: &[&str]) -> MonitorState {
    let mut state = MonitorState::default();
    feed(&mut state, lines);
    state
}

/// Wire text for a stream of lines, newline-terminated.
pub fn wire(lines: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    out
}
