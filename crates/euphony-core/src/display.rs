//! Presentation helpers shared by every front end.

/// Shown when a duration cannot be interpreted.
pub const UNKNOWN_DURATION: &str = "Unknown Duration";

/// Format milliseconds as `m:ss`.
#[must_use]
pub fn format_duration(duration_ms: u64) -> String {
    let minutes = duration_ms / 60_000;
    let seconds = (duration_ms / 1000) % 60;
    format!("{minutes}:{seconds:02}")
}

/// Format a textual millisecond count as `m:ss`, or [`UNKNOWN_DURATION`]
/// when the text is not a non-negative integer.
#[must_use]
pub fn format_duration_text(raw: &str) -> String {
    raw.trim()
        .parse::<u64>()
        .map(format_duration)
        .unwrap_or_else(|_| UNKNOWN_DURATION.to_string())
}
