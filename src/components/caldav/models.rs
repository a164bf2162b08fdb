use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt;

use crate::utils::time::format_display;

/// A calendar collection exposed by the account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarInfo {
    /// Display name as reported by the server
    pub name: String,
    /// Absolute URL of the collection
    pub url: String,
}

/// Event object sent to the calendar server; built per submission and
/// dropped once the call returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub dtstamp: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub location: Option<String>,
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub uid: String,
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: Option<String>,
    /// Locale the message is rendered in
    pub locale: String,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match &self.location {
            Some(location) => t!(
                "event_location",
                locale = self.locale.as_str(),
                location = location
            )
            .to_string(),
            None => String::new(),
        };

        write!(
            f,
            "{}",
            t!(
                "event_added",
                locale = self.locale.as_str(),
                title = self.title,
                start = format_display(&self.start),
                end = format_display(&self.end),
                location = location
            )
        )
    }
}
