//! Human-readable duration formatting

/// Format a second count as `"1h 2m 3s"`, dropping leading zero units.
///
/// Minutes are always shown once hours are present, seconds are always shown.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    if minutes > 0 || hours > 0 {
        out.push_str(&format!("{}m ", minutes));
    }
    out.push_str(&format!("{}s", secs));

    out.trim_end().to_string()
}
