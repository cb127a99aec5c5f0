/// Formats seconds as `H:MM:SS`, or `M:SS` under an hour. Fractions of a
/// second are dropped; negative and non-finite input reads as zero.
pub fn format_duration(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// ISO 8601 duration (`P42S`), used as hover text next to the clock.
pub fn iso_duration(seconds: f64) -> String {
    let rounded = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("P{}S", rounded)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}
