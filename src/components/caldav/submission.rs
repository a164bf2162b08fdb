use crate::components::event_request::EventRequest;
use crate::error::{AgentResult, Error};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::client::CalendarService;
use super::models::{CalendarEvent, CalendarInfo, Confirmation};

/// Read-only settings the adapter needs for every submission
#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    /// Calendar to write into; empty or `None` means the first one
    pub calendar_name: Option<String>,
    /// Zone the request's wall-clock times are read in
    pub timezone: Tz,
    /// Locale of the confirmation message
    pub locale: String,
}

/// Pick the target calendar.
///
/// With a configured name, only an exact match on the trimmed display name
/// counts. Without one, the first calendar is used.
pub fn select_calendar(
    calendars: &[CalendarInfo],
    configured_name: Option<&str>,
) -> AgentResult<CalendarInfo> {
    let wanted = configured_name.map(str::trim).filter(|name| !name.is_empty());

    match wanted {
        Some(wanted) => calendars
            .iter()
            .find(|calendar| calendar.name.trim() == wanted)
            .cloned()
            .ok_or_else(|| Error::CalendarNotFound {
                name: wanted.to_string(),
                available: calendars.iter().map(|c| c.name.clone()).collect(),
            }),
        None => calendars.first().cloned().ok_or(Error::NoCalendars),
    }
}

/// Turns validated requests into calendar objects and submits them
#[derive(Clone)]
pub struct SubmissionAdapter {
    service: Arc<dyn CalendarService>,
    settings: SubmissionSettings,
}

impl SubmissionAdapter {
    pub fn new(service: Arc<dyn CalendarService>, settings: SubmissionSettings) -> Self {
        Self { service, settings }
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }

    /// Resolve the configured calendar against what the account exposes
    pub async fn resolve_calendar(&self) -> AgentResult<CalendarInfo> {
        let calendars = self.service.calendars().await?;
        select_calendar(&calendars, self.settings.calendar_name.as_deref())
    }

    /// Submit the request stamped with the current time
    pub async fn submit(&self, request: &EventRequest) -> AgentResult<Confirmation> {
        self.submit_at(request, Utc::now()).await
    }

    /// Submit the request once. Nothing is retried, and a failed PUT is not
    /// followed by a check for whether the server kept the event.
    pub async fn submit_at(
        &self,
        request: &EventRequest,
        now: DateTime<Utc>,
    ) -> AgentResult<Confirmation> {
        // Local validation first so a bad time never reaches the network
        let (start, end) = request.localize(self.settings.timezone)?;
        let event = CalendarEvent {
            uid: Uuid::new_v4().to_string(),
            dtstamp: now,
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
            summary: request.title.clone(),
            location: request.location.clone(),
        };

        let calendar = self.resolve_calendar().await?;
        info!(
            "Submitting event '{}' ({}) to calendar '{}'",
            event.summary, event.uid, calendar.name
        );

        if let Err(e) = self.service.put_event(&calendar, &event).await {
            error!("Failed to submit event {}: {}", event.uid, e);
            return Err(e);
        }

        Ok(Confirmation {
            uid: event.uid,
            title: event.summary,
            start,
            end,
            location: event.location,
            locale: self.settings.locale.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendars(names: &[&str]) -> Vec<CalendarInfo> {
        names
            .iter()
            .map(|name| CalendarInfo {
                name: name.to_string(),
                url: format!("https://caldav.example.com/cal/{}/", name.trim().to_lowercase()),
            })
            .collect()
    }

    #[test]
    fn test_select_by_name() {
        let available = calendars(&["Work", " Home ", "Birthdays"]);
        let selected = select_calendar(&available, Some("Home")).unwrap();
        assert_eq!(selected.name, " Home ");
    }

    #[test]
    fn test_select_unknown_name_lists_available() {
        let available = calendars(&["Work", "Home"]);
        match select_calendar(&available, Some("Gym")) {
            Err(Error::CalendarNotFound { name, available }) => {
                assert_eq!(name, "Gym");
                assert_eq!(available, vec!["Work".to_string(), "Home".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_select_first_without_name() {
        let available = calendars(&["Work", "Home"]);
        assert_eq!(select_calendar(&available, None).unwrap().name, "Work");
        assert_eq!(select_calendar(&available, Some("  ")).unwrap().name, "Work");
    }

    #[test]
    fn test_select_from_empty_account() {
        assert!(matches!(select_calendar(&[], None), Err(Error::NoCalendars)));
        assert!(matches!(
            select_calendar(&[], Some("Work")),
            Err(Error::CalendarNotFound { .. })
        ));
    }
}
