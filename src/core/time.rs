//! Time representation using whole seconds for chapter timing.
//! YouTube chapter syntax only resolves to the second, so the engine never
//! carries sub-second precision.

/// Time in seconds since the start of the video.
/// This is the core time representation throughout the application.
pub type Time = u64;

/// Time constants for conversions
pub mod constants {
    use super::Time;

    pub const SECONDS_PER_MINUTE: Time = 60;
    pub const SECONDS_PER_HOUR: Time = 3_600;
}

/// Time zero constant
pub const ZERO: Time = 0;

/// Convert a fractional seconds value (e.g. a media element's reported
/// duration) to whole seconds by flooring.
#[inline]
pub fn from_seconds_f64(seconds: f64) -> Time {
    if seconds <= 0.0 {
        return 0;
    }
    seconds.floor() as Time
}

/// Split a time into (hours, minutes, seconds) components.
#[inline]
pub fn to_hms(time: Time) -> (Time, Time, Time) {
    let hours = time / constants::SECONDS_PER_HOUR;
    let minutes = (time % constants::SECONDS_PER_HOUR) / constants::SECONDS_PER_MINUTE;
    let seconds = time % constants::SECONDS_PER_MINUTE;
    (hours, minutes, seconds)
}

/// Join (hours, minutes, seconds) components back into a time.
#[inline]
pub fn from_hms(hours: Time, minutes: Time, seconds: Time) -> Time {
    hours * constants::SECONDS_PER_HOUR + minutes * constants::SECONDS_PER_MINUTE + seconds
}

/// Format a time as a YouTube chapter timestamp.
///
/// Under an hour the format is `M:SS` (minutes unpadded). At an hour or
/// above, or when `force_hours` is set, the format is `H:MM:SS`. Callers
/// force the hours field when any line of an exported list needs it, since
/// the chapter syntax requires a consistent timestamp width.
pub fn format_timestamp(time: Time, force_hours: bool) -> String {
    let (hours, minutes, seconds) = to_hms(time);

    if hours == 0 && !force_hours {
        return format!("{}:{:02}", minutes, seconds);
    }

    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
