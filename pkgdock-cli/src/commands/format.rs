//! Display formatting helpers for sizes and timestamps.

use chrono::{DateTime, Utc};

/// Render a byte count with a binary unit, trimming trailing zeros
/// ("1.5 MB", "2 GB", "0 B").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);

    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[exp])
}

/// Render an optional timestamp; absent means the event never happened.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Never".to_string(),
    }
}
