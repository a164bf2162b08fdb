//! Boundary to the language model that turns free text into event fields.
//!
//! The model is an untrusted collaborator: whatever it returns is parsed
//! strictly and then run through the normal request validation.

pub mod prompt;
#[cfg(feature = "calendar-agent")]
mod rig_extractor;

#[cfg(feature = "calendar-agent")]
pub use rig_extractor::{RigExtractor, RigExtractorSettings};

use crate::components::event_request::{normalize, EventRequest};
use crate::error::{AgentResult, Error};
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::Value;
use tracing::{debug, error};

/// A text-completion backend for event extraction
#[async_trait]
pub trait EventExtractor: Send + Sync {
    /// Send the user message to the model and return its raw reply
    async fn complete(&self, user_message: &str) -> AgentResult<String>;
}

/// Ask the model for the event behind `instruction` and validate the answer
pub async fn extract_event_request(
    extractor: &dyn EventExtractor,
    instruction: &str,
    now: &DateTime<Tz>,
) -> AgentResult<EventRequest> {
    let message = prompt::user_message(instruction, now);
    let reply = extractor.complete(&message).await?;
    debug!("Extraction reply: {}", reply);

    let raw = parse_json_from_response(&reply)?;
    normalize(&raw).map_err(|e| Error::MalformedExtraction(e.to_string()))
}

/// Pull the JSON object out of a model reply.
///
/// The outermost `{...}` slice is tried first, since models like to wrap
/// JSON in prose or code fences; then the whole reply.
pub fn parse_json_from_response(response: &str) -> AgentResult<Value> {
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            match serde_json::from_str::<Value>(&response[start..=end]) {
                Ok(value) => return Ok(value),
                Err(e) => error!("Failed to parse JSON object from response: {}", e),
            }
        }
    }

    match serde_json::from_str::<Value>(response.trim()) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(value) => Err(Error::MalformedExtraction(format!(
            "expected a JSON object, got {}",
            value
        ))),
        Err(e) => {
            error!("Could not extract valid JSON from response: {}", response);
            Err(Error::MalformedExtraction(format!(
                "model reply is not JSON: {}",
                e
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct ScriptedExtractor {
        reply: String,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventExtractor for ScriptedExtractor {
        async fn complete(&self, user_message: &str) -> AgentResult<String> {
            self.seen.lock().unwrap().push(user_message.to_string());
            Ok(self.reply.clone())
        }
    }

    fn scripted(reply: &str) -> ScriptedExtractor {
        ScriptedExtractor {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn now() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2025, 11, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let reply = "Sure! ```json\n{\"title\": \"Dentist\", \"event_datetime\": \"2025-11-06T09:00:00\"}\n```";
        let value = parse_json_from_response(reply).unwrap();
        assert_eq!(value["title"], "Dentist");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(
            parse_json_from_response("[1, 2, 3]"),
            Err(Error::MalformedExtraction(_))
        ));
        assert!(matches!(
            parse_json_from_response("I could not find an event"),
            Err(Error::MalformedExtraction(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_event_request() {
        let extractor = scripted(
            r#"{"title": "Call with Ilsur", "event_datetime": "2025-11-06T15:00:00", "duration_minutes": null, "location": "https://zoom.us/abc123"}"#,
        );
        let request = extract_event_request(&extractor, "tomorrow at 15:00 call with Ilsur https://zoom.us/abc123", &now())
            .await
            .unwrap();
        assert_eq!(request.title, "Call with Ilsur");
        assert_eq!(request.duration_minutes, 60);

        let seen = extractor.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Current date and time: 2025-11-05T09:00:00"));
    }

    #[tokio::test]
    async fn test_invalid_extraction_is_malformed() {
        let extractor = scripted(r#"{"title": "", "event_datetime": "soon"}"#);
        let err = extract_event_request(&extractor, "something", &now())
            .await
            .unwrap_err();
        match err {
            Error::MalformedExtraction(message) => {
                assert!(message.contains("title"));
                assert!(message.contains("event_datetime"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
