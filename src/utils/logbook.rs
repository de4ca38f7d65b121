// src/utils/logbook.rs
use serde_json::Value;
use std::{fs, io::Write, path::Path};

/// Append one event object as a line to the JSONL logbook.
///
/// Write failures are swallowed: losing a log line must never fail the
/// engine operation being logged. Creates parent directories if missing.
pub fn emit_event(log_path: &Path, event: &str, data: Value, ts: &str) {
    let line = serde_json::json!({
        "timestamp": ts,
        "event": event,
        "data": data
    });
    let json = match serde_json::to_string(&line) {
        Ok(j) => j,
        Err(_) => return,
    };
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(mut f) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        let _ = writeln!(f, "{}", json);
    }
}

/// Single-line, length-capped preview of content for logging. The full
/// payload never enters the logbook.
pub fn preview(content: &str, max_len: usize) -> String {
    let mut t: String = content.replace('\n', " ").chars().take(max_len).collect();
    if content.chars().count() > max_len {
        t.push('…');
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_and_flattens() {
        let p = preview("line one\nline two", 12);
        assert_eq!(p, "line one lin…");
        assert_eq!(preview("short", 12), "short");
    }
}
