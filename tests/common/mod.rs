#![allow(dead_code)]

use async_trait::async_trait;
use planbot::components::caldav::{CalendarEvent, CalendarInfo, CalendarService};
use planbot::error::{submission_error, AgentResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock implementation of a CalDAV account for testing
#[derive(Default)]
pub struct MockCalendarService {
    calendars: Vec<CalendarInfo>,
    fail_put: bool,
    put_delay: Option<Duration>,
    pub listings: AtomicUsize,
    pub created: Mutex<Vec<(CalendarInfo, CalendarEvent)>>,
}

impl MockCalendarService {
    /// Create a mock account with the given calendar names
    pub fn with_calendars(names: &[&str]) -> Self {
        let calendars = names
            .iter()
            .map(|name| CalendarInfo {
                name: name.to_string(),
                url: format!("https://caldav.example.com/123/calendars/{}/", name.to_lowercase()),
            })
            .collect();
        Self {
            calendars,
            ..Default::default()
        }
    }

    /// Make every PUT fail
    pub fn failing(mut self) -> Self {
        self.fail_put = true;
        self
    }

    /// Make every PUT take this long
    pub fn slow(mut self, delay: Duration) -> Self {
        self.put_delay = Some(delay);
        self
    }

    pub fn created(&self) -> Vec<(CalendarInfo, CalendarEvent)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarService for MockCalendarService {
    async fn calendars(&self) -> AgentResult<Vec<CalendarInfo>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        Ok(self.calendars.clone())
    }

    async fn put_event(&self, calendar: &CalendarInfo, event: &CalendarEvent) -> AgentResult<()> {
        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_put {
            return Err(submission_error("PUT failed: HTTP 503 Service Unavailable"));
        }
        self.created
            .lock()
            .unwrap()
            .push((calendar.clone(), event.clone()));
        Ok(())
    }
}
