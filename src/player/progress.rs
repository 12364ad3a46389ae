//! Time formatting for the progress bar.

/// Format milliseconds as `HH:MM:SS`.
pub fn format_hms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Fraction of `length_ms` reached at `time_ms`, clamped to `0.0..=1.0`.
pub fn progress_ratio(time_ms: u64, length_ms: Option<u64>) -> f64 {
    match length_ms {
        Some(len) if len > 0 => (time_ms as f64 / len as f64).clamp(0.0, 1.0),
        _ => 0.0,
    }
}
