//! Human-readable time formatting
//!
//! Provides consistent time display formatting across SMP modules.

/// Format a duration in milliseconds as `MM:SS`.
///
/// Minutes wrap at 60 to keep the field width fixed; track durations
/// beyond an hour are rare enough that hour display is not warranted.
///
/// # Examples
///
/// ```
/// use smp_common::human_time::format_track_time;
///
/// assert_eq!(format_track_time(0), "00:00");
/// assert_eq!(format_track_time(45_000), "00:45");
/// assert_eq!(format_track_time(185_000), "03:05");
/// ```
pub fn format_track_time(millis: u64) -> String {
    let seconds = (millis / 1000) % 60;
    let minutes = (millis / 60_000) % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
