// Monitor state transitions driven by wire lines

mod common;

use common::{display, feed, state_after};
use heartbeat_monitor::classifier::{Classifier, SampleTag};
use heartbeat_monitor::consumer::ingest_line;
use heartbeat_monitor::models::{RateCode, Record};
use heartbeat_monitor::resolver::{StatusResolver, StatusTable};
use heartbeat_monitor::state::{Applied, MonitorState};

fn busy_state() -> MonitorState {
    state_after(&["MODE:2", "BEAT:70", "BEAT:71", "RATE:R"])
}

#[test]
fn test_initial_state_defaults() {
    let s = MonitorState::default().snapshot();
    assert_eq!(s.mode, '0');
    assert!(s.history.is_empty());
    assert_eq!(s.status, "Normal");
    assert_eq!(s.action, "You're good!");
    assert_eq!(s.action_color, "green");
    assert_eq!(s.badge_color, "success");
}

#[test]
fn test_mode_changes_only_mode() {
    for c in ['0', '1', '2', 'x', '9'] {
        let mut state = busy_state();
        let before = display(&state.snapshot());
        let line = format!("MODE:{}", c);
        feed(&mut state, &[&line]);
        let after = display(&state.snapshot());
        assert_eq!(after.mode, c);
        assert_eq!(after.history, before.history);
        assert_eq!(after.status, before.status);
        assert_eq!(after.action, before.action);
        assert_eq!(after.action_color, before.action_color);
        assert_eq!(after.badge_color, before.badge_color);
    }
}

#[test]
fn test_beat_grows_history_until_capacity() {
    let mut state = MonitorState::default();
    for i in 1..=40 {
        let before = display(&state.snapshot());
        let line = format!("BEAT:{}", i);
        feed(&mut state, &[&line]);
        let after = display(&state.snapshot());
        assert_eq!(after.history.len(), (i as usize).min(16));
        assert_eq!(after.history.last(), Some(&(i as f64)));
        if before.history.len() == 16 {
            assert!(!after.history.contains(&before.history[0]));
        }
        assert_eq!(after.status, before.status);
        assert_eq!(after.mode, before.mode);
    }
}

#[test]
fn test_seventeen_samples_evict_first() {
    let lines: Vec<String> = (1..=17).map(|i| format!("BEAT:{}", i * 10)).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let state = state_after(&refs);
    let expected: Vec<f64> = (2..=17).map(|i| (i * 10) as f64).collect();
    assert_eq!(state.snapshot().history, expected);
}

#[test]
fn test_rate_sets_all_four_fields_from_resolver() {
    let resolver = StatusResolver::default();
    for code in RateCode::ALL {
        let mut state = busy_state();
        let line = format!("RATE:{}", code);
        feed(&mut state, &[&line]);
        let s = state.snapshot();
        let e = resolver.resolve(code);
        assert_eq!(s.status, e.status);
        assert_eq!(s.action, e.action);
        assert_eq!(s.action_color, e.action_color);
        assert_eq!(s.badge_color, e.badge_color);
        assert_eq!(s.history, vec![70.0, 71.0]);
        assert_eq!(s.mode, '2');
    }
}

#[test]
fn test_unknown_rate_code_is_noop() {
    let mut state = busy_state();
    let before = display(&state.snapshot());
    feed(&mut state, &["RATE:X", "RATE:", "RATE:n", "RATE:HL"]);
    assert_eq!(display(&state.snapshot()), before);
    assert_eq!(state.unrecognized_lines(), 4);
}

#[test]
fn test_short_and_unknown_lines_leave_state_unchanged() {
    let mut state = busy_state();
    let before = display(&state.snapshot());
    let applied_before = state.records_applied();
    feed(
        &mut state,
        &["", "M", "MOD", "TEMP:37", "BEAT:abc", "BEAT:", "MODE:", "Board started!"],
    );
    assert_eq!(display(&state.snapshot()), before);
    assert_eq!(state.records_applied(), applied_before);
}

#[test]
fn test_end_to_end_normal_sequence() {
    let state = state_after(&["MODE:1", "BEAT:72", "BEAT:75", "RATE:N"]);
    let s = state.snapshot();
    assert_eq!(s.mode, '1');
    assert_eq!(s.history, vec![72.0, 75.0]);
    assert_eq!(s.status, "Normal");
    assert_eq!(
        s.action,
        StatusResolver::default().resolve(RateCode::Normal).action
    );
    assert_eq!(s.action_color, "green");
    assert_eq!(s.badge_color, "success");
    assert_eq!(s.records_applied, 4);
}

#[test]
fn test_end_to_end_high_overrides_defaults() {
    let defaults = MonitorState::default().snapshot();
    let s = state_after(&["RATE:H"]).snapshot();
    assert_ne!(s.status, defaults.status);
    assert_ne!(s.action, defaults.action);
    assert_eq!(s.status, "HIGH");
    assert_eq!(s.action_color, "red");
    assert_eq!(s.badge_color, "danger");
}

#[test]
fn test_rate_back_to_normal_restores_all_fields() {
    let s = state_after(&["RATE:H", "RATE:N"]).snapshot();
    assert_eq!(display(&s), display(&MonitorState::default().snapshot()));
}

#[test]
fn test_minimal_table_and_data_tag() {
    let classifier = Classifier::new(SampleTag::Data);
    let mut state = MonitorState::new(StatusResolver::new(StatusTable::Minimal), 4);
    for line in ["DATA:60", "BEAT:61", "DATA:62.5", "RATE:L"] {
        ingest_line(line, &classifier, &mut state, true);
    }
    let s = state.snapshot();
    assert_eq!(s.history, vec![60.0, 62.5]);
    assert_eq!(s.status, "LOW");
    assert_eq!(s.action, "LOW");
    assert_eq!(s.badge_color, "danger");
}

#[test]
fn test_configured_capacity() {
    let mut state = MonitorState::new(StatusResolver::default(), 3);
    feed(&mut state, &["BEAT:1", "BEAT:2", "BEAT:3", "BEAT:4"]);
    assert_eq!(state.snapshot().history, vec![2.0, 3.0, 4.0]);
    assert_eq!(state.history().capacity(), 3);
}

#[test]
fn test_apply_reports_what_changed() {
    let mut state = MonitorState::default();
    assert_eq!(state.apply(&Record::ModeChange { mode: '1' }), Applied::Mode);
    assert_eq!(state.apply(&Record::BeatSample { value: -1.5 }), Applied::Sample);
    assert_eq!(
        state.apply(&Record::RateEvent {
            code: RateCode::Falling
        }),
        Applied::Status
    );
    let unrecognized = Classifier::default().classify("nope");
    assert_eq!(state.apply(&unrecognized), Applied::Ignored);
    assert_eq!(state.records_applied(), 3);
    assert_eq!(state.unrecognized_lines(), 1);
    assert_eq!(state.snapshot().history, vec![-1.5]);
}
