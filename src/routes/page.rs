// Monitor page rendering

use axum::{extract::State, response::Html};
use std::fmt::Write;

use super::AppState;
use crate::models::MonitorSnapshot;

/// GET /*: renders whatever snapshot is current, including the all-defaults one.
pub(super) async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshots.current_snapshot();
    Html(render(&snapshot))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Color tokens go into class/style attributes; keep only token characters.
fn token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

pub fn render(snapshot: &MonitorSnapshot) -> String {
    let mode = escape(&snapshot.mode.to_string());
    let status = escape(&snapshot.status);
    let action = escape(&snapshot.action);
    let action_color = token(&snapshot.action_color);
    let badge_color = token(&snapshot.badge_color);

    let mut history = String::new();
    if snapshot.history.is_empty() {
        history.push_str("      <p class=\"text-muted\" id=\"history-empty\">No readings yet.</p>\n");
    } else {
        history.push_str("      <ol id=\"history\">\n");
        for value in &snapshot.history {
            // Writing to a String cannot fail.
            let _ = writeln!(history, "        <li>{}</li>", value);
        }
        history.push_str("      </ol>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="1">
    <title>Heartbeat Monitor</title>
  </head>
  <body>
    <main class="container">
      <h1>Heartbeat Monitor</h1>
      <p>Mode: <span id="mode">{mode}</span></p>
      <p>Status: <span id="status" class="badge badge-{badge_color}">{status}</span></p>
      <p id="action" style="color: {action_color}">{action}</p>
      <h2>Recent heartbeats</h2>
{history}    </main>
    <footer>
      <small id="counters">{applied} records applied, {unrecognized} lines ignored</small>
      <small>{name} {version}</small>
    </footer>
  </body>
</html>
"#,
        applied = snapshot.records_applied,
        unrecognized = snapshot.unrecognized_lines,
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    )
}
