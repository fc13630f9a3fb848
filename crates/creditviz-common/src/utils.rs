//! Shared formatting helpers.

use chrono::{DateTime, Utc};

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Trims whitespace and control characters from both ends of a header cell.
pub fn clean_header(input: &str) -> String {
    input
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}

/// Rounds to an integer and inserts `,` every three digits.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Truncates a label to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_label(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
