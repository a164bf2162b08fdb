use crate::utils::time::parse_local_timestamp;
use serde_json::{Map, Value};
use tracing::debug;

use super::models::{EventRequest, DEFAULT_DURATION_MINUTES};
use super::validation::{FieldIssue, ValidationError};

/// Validate and normalize raw extracted fields into an [`EventRequest`].
///
/// Every field is checked before returning, so the error names all
/// offending fields at once.
pub fn normalize(raw: &Value) -> Result<EventRequest, ValidationError> {
    let fields = raw.as_object().ok_or_else(|| {
        ValidationError::single(FieldIssue::new("<root>", "expected a JSON object"))
    })?;

    let mut issues = Vec::new();

    let title = match normalize_title(fields) {
        Ok(title) => Some(title),
        Err(issue) => {
            issues.push(issue);
            None
        }
    };

    let event_datetime = match fields.get("event_datetime") {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new("event_datetime", "is required"));
            None
        }
        Some(Value::String(s)) => match parse_local_timestamp(s) {
            Some(dt) => Some(dt),
            None => {
                issues.push(FieldIssue::new(
                    "event_datetime",
                    format!("'{}' is not an ISO-8601 timestamp", s),
                ));
                None
            }
        },
        Some(other) => {
            issues.push(FieldIssue::new(
                "event_datetime",
                format!("expected a string, got {}", other),
            ));
            None
        }
    };

    let duration_minutes = match normalize_duration(fields.get("duration_minutes")) {
        Ok(duration) => Some(duration),
        Err(issue) => {
            issues.push(issue);
            None
        }
    };

    let location = match fields.get("location") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FieldIssue::new(
            "location",
            format!("expected text, got {}", other),
        )),
    };
    let location = location.unwrap_or_else(|issue| {
        issues.push(issue);
        None
    });

    match (title, event_datetime, duration_minutes) {
        (Some(title), Some(event_datetime), Some(duration_minutes)) if issues.is_empty() => {
            let request = EventRequest {
                title,
                event_datetime,
                duration_minutes,
                location,
            };
            debug!("Normalized event request: {:?}", request);
            Ok(request)
        }
        _ => Err(ValidationError::new(issues)),
    }
}

fn normalize_title(fields: &Map<String, Value>) -> Result<String, FieldIssue> {
    match fields.get("title") {
        None | Some(Value::Null) => Err(FieldIssue::new("title", "is required")),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(FieldIssue::new("title", "must not be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(other) => Err(FieldIssue::new(
            "title",
            format!("expected a string, got {}", other),
        )),
    }
}

/// Null, absent and falsy values fall back to the default duration
fn normalize_duration(value: Option<&Value>) -> Result<u32, FieldIssue> {
    let invalid = |v: &Value| {
        FieldIssue::new(
            "duration_minutes",
            format!("expected a positive whole number of minutes, got {}", v),
        )
    };

    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(DEFAULT_DURATION_MINUTES),
        Some(v @ Value::Number(n)) => {
            let minutes = match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i,
                (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => f as i64,
                _ => return Err(invalid(v)),
            };
            positive_minutes(minutes).ok_or_else(|| invalid(v))
        }
        Some(v @ Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(DEFAULT_DURATION_MINUTES);
            }
            trimmed
                .parse::<i64>()
                .ok()
                .and_then(positive_minutes)
                .ok_or_else(|| invalid(v))
        }
        Some(other) => Err(invalid(other)),
    }
}

fn positive_minutes(minutes: i64) -> Option<u32> {
    match minutes {
        0 => Some(DEFAULT_DURATION_MINUTES),
        m if m > 0 => u32::try_from(m).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_request() {
        let raw = json!({
            "title": "  Call with Ilsur ",
            "event_datetime": "2025-11-06T15:30:00",
            "duration_minutes": 30,
            "location": "https://zoom.us/abc123"
        });
        let request = normalize(&raw).unwrap();
        assert_eq!(request.title, "Call with Ilsur");
        assert_eq!(
            request.event_datetime.format("%Y-%m-%d %H:%M").to_string(),
            "2025-11-06 15:30"
        );
        assert_eq!(request.duration_minutes, 30);
        assert_eq!(request.location.as_deref(), Some("https://zoom.us/abc123"));
    }

    #[test]
    fn test_duration_defaults() {
        for duration in [json!(null), json!(0), json!(false), json!("")] {
            let raw = json!({
                "title": "Standup",
                "event_datetime": "2025-11-06T10:00:00",
                "duration_minutes": duration,
            });
            assert_eq!(normalize(&raw).unwrap().duration_minutes, 60);
        }

        let raw = json!({"title": "Standup", "event_datetime": "2025-11-06T10:00:00"});
        assert_eq!(normalize(&raw).unwrap().duration_minutes, 60);
    }

    #[test]
    fn test_duration_coercion() {
        let cases = [(json!(90.0), 90), (json!("45"), 45), (json!(15), 15)];
        for (duration, expected) in cases {
            let raw = json!({
                "title": "Review",
                "event_datetime": "2025-11-06T10:00:00",
                "duration_minutes": duration,
            });
            assert_eq!(normalize(&raw).unwrap().duration_minutes, expected);
        }

        for duration in [json!(-5), json!(12.5), json!("an hour"), json!(true), json!([30])] {
            let raw = json!({
                "title": "Review",
                "event_datetime": "2025-11-06T10:00:00",
                "duration_minutes": duration,
            });
            let err = normalize(&raw).unwrap_err();
            assert_eq!(err.fields(), vec!["duration_minutes"]);
        }
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = normalize(&json!({"title": "   ", "event_datetime": "next friday"})).unwrap_err();
        assert_eq!(err.fields(), vec!["title", "event_datetime"]);

        let err = normalize(&json!({})).unwrap_err();
        assert_eq!(err.fields(), vec!["title", "event_datetime"]);
        assert!(err.to_string().contains("title: is required"));
    }

    #[test]
    fn test_location_handling() {
        let raw = json!({
            "title": "Lunch",
            "event_datetime": "2025-11-06T13:00:00",
            "location": "Café; Main St, 5"
        });
        assert_eq!(
            normalize(&raw).unwrap().location.as_deref(),
            Some("Café; Main St, 5")
        );

        let raw = json!({"title": "Lunch", "event_datetime": "2025-11-06T13:00:00", "location": " "});
        assert_eq!(normalize(&raw).unwrap().location, None);

        let raw = json!({"title": "Lunch", "event_datetime": "2025-11-06T13:00:00", "location": 42});
        assert_eq!(normalize(&raw).unwrap_err().fields(), vec!["location"]);
    }

    #[test]
    fn test_non_object_input() {
        let err = normalize(&json!(["title", "2025-11-06"])).unwrap_err();
        assert_eq!(err.fields(), vec!["<root>"]);
    }
}
