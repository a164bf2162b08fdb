use crate::utils::time::localize;
use chrono::{DateTime, Duration, NaiveDateTime};
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::validation::{FieldIssue, ValidationError};

/// Duration used when the request does not carry a usable one
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Validated, normalized description of a calendar event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    /// Event title, trimmed and never empty
    pub title: String,
    /// Start time as wall clock, read in the configured local zone
    pub event_datetime: NaiveDateTime,
    /// Positive duration in minutes
    pub duration_minutes: u32,
    /// Place name or meeting link, kept verbatim
    pub location: Option<String>,
}

impl EventRequest {
    /// Resolve the start and end instants in the given timezone.
    ///
    /// Fails when the wall-clock start falls into a DST gap or the end lies
    /// outside the representable range.
    pub fn localize(&self, tz: Tz) -> Result<(DateTime<Tz>, DateTime<Tz>), ValidationError> {
        let start = localize(&self.event_datetime, tz).ok_or_else(|| {
            ValidationError::single(FieldIssue::new(
                "event_datetime",
                format!(
                    "{} does not exist in timezone {}",
                    self.event_datetime.format("%Y-%m-%dT%H:%M:%S"),
                    tz.name()
                ),
            ))
        })?;
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes)))
            .ok_or_else(|| {
                ValidationError::single(FieldIssue::new(
                    "event_datetime",
                    format!(
                        "{} plus {} minutes is out of range",
                        self.event_datetime.format("%Y-%m-%dT%H:%M:%S"),
                        self.duration_minutes
                    ),
                ))
            })?;
        Ok((start, end))
    }
}

/// Shape the extraction boundary is asked to produce
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedEvent {
    /// Event title
    pub title: String,
    /// Start date and time in ISO format, e.g. '2025-11-06T15:30:00'
    pub event_datetime: String,
    /// Duration in minutes, 60 unless stated otherwise
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Place of the event or a link to the meeting
    #[serde(default)]
    pub location: Option<String>,
}
