//! Display helpers for progress events

use serde_json::Value;

/// Longest argument value shown in a tool-call summary
pub const ARGUMENT_DISPLAY_LEN: usize = 60;

/// Longest tool result shown in a progress event
pub const RESULT_DISPLAY_LEN: usize = 200;

/// Truncate to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_result(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Render a JSON value for display, cutting it to `max_len` characters.
///
/// Strings are shown without quotes.
pub fn shorten(value: &Value, max_len: usize) -> String {
    let s = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if s.chars().count() <= max_len {
        return s;
    }
    let keep = max_len.saturating_sub(3);
    let cut: String = s.chars().take(keep).collect();
    format!("{}...", cut)
}

/// One-line `key=value, ...` summary of tool arguments
pub fn summarize_arguments(args: &Value) -> String {
    match args {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, shorten(v, ARGUMENT_DISPLAY_LEN)))
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}
