use crate::components::event_request::ExtractedEvent;
use chrono::DateTime;
use chrono_tz::Tz;

const PREAMBLE: &str = "You are a scheduling assistant. Your task is to extract a strict event structure from the user's command.
Rules:
- Do not make up anything that is not in the command.
- If the command contains a URL, put it into the location field.
- duration_minutes is 60 unless the command says otherwise.
- Resolve relative dates (\"tomorrow\", \"next friday\") against the current date and time given in the message.
- event_datetime is local wall-clock time in ISO format without an offset, e.g. '2025-11-06T15:30:00'.
RETURN ONLY JSON (no other characters) matching this JSON Schema:
";

/// System prompt for the extraction model, including the output schema
pub fn system_prompt() -> String {
    let schema = schemars::schema_for!(ExtractedEvent);
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!("{}{}", PREAMBLE, schema)
}

/// User message: the instruction plus the current time as a cue for
/// relative dates
pub fn user_message(instruction: &str, now: &DateTime<Tz>) -> String {
    format!(
        "Add event: {}\nCurrent date and time: {} ({})",
        instruction.trim(),
        now.format("%Y-%m-%dT%H:%M:%S"),
        now.format("%A, %Z")
    )
}
