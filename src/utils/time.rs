use crate::error::{config_error, AgentResult};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Format used for UTC timestamps inside iCalendar objects
pub const ICS_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Format used for times shown back to the user
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M (%Z)";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA timezone name such as `Europe/Moscow`
pub fn parse_timezone(name: &str) -> AgentResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| config_error(&format!("Unknown timezone: {}", name)))
}

/// Parse an ISO-8601-like local timestamp.
///
/// A trailing UTC offset is accepted but dropped: the wall-clock part is what
/// gets interpreted in the configured zone.
pub fn parse_local_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    // Date only means midnight
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Attach a timezone to a wall-clock time.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times in a
/// DST gap do not exist and yield `None`.
pub fn localize(naive: &NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

/// Render a UTC instant the way iCalendar expects it
pub fn format_ics_utc(dt: &DateTime<Utc>) -> String {
    dt.format(ICS_UTC_FORMAT).to_string()
}

/// Render a localized instant for confirmations
pub fn format_display(dt: &DateTime<Tz>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}
