use crate::components::caldav::{Confirmation, SubmissionAdapter};
use crate::components::event_request::EventRequest;
use crate::components::extraction::{extract_event_request, EventExtractor};
use crate::error::{AgentResult, Error};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Free text in, calendar event out
#[derive(Clone)]
pub struct CalendarAgent {
    extractor: Arc<dyn EventExtractor>,
    adapter: SubmissionAdapter,
    timeout: Duration,
}

impl CalendarAgent {
    pub fn new(
        extractor: Arc<dyn EventExtractor>,
        adapter: SubmissionAdapter,
        timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            adapter,
            timeout,
        }
    }

    /// Handle an instruction using the current time as the date cue
    pub async fn handle(&self, instruction: &str) -> AgentResult<Confirmation> {
        self.handle_at(instruction, Utc::now()).await
    }

    /// Extract, validate and submit. Both external calls run under the
    /// request timeout.
    pub async fn handle_at(
        &self,
        instruction: &str,
        now: DateTime<Utc>,
    ) -> AgentResult<Confirmation> {
        let request = self.extract(instruction, now).await?;
        info!(
            "Extracted event '{}' at {} for {} minutes",
            request.title, request.event_datetime, request.duration_minutes
        );

        with_timeout("Calendar submission", self.timeout, self.adapter.submit_at(&request, now))
            .await
    }

    /// Extraction step only
    pub async fn extract(&self, instruction: &str, now: DateTime<Utc>) -> AgentResult<EventRequest> {
        let local_now = now.with_timezone(&self.adapter.settings().timezone);
        with_timeout(
            "Event extraction",
            self.timeout,
            extract_event_request(self.extractor.as_ref(), instruction, &local_now),
        )
        .await
    }
}

async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    future: impl Future<Output = AgentResult<T>>,
) -> AgentResult<T> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| Error::Timeout {
            operation,
            seconds: limit.as_secs(),
        })?
}
