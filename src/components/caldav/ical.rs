use super::models::CalendarEvent;
use crate::utils::time::format_ics_utc;

const PRODID: &str = "-//planbot//calendar agent//EN";

/// Longest content line allowed before folding, in octets
const MAX_LINE_OCTETS: usize = 75;

/// Escape a TEXT property value (RFC 5545, section 3.3.11)
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Fold a content line into 75-octet chunks, never splitting a UTF-8
/// sequence. Continuation lines start with a single space.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0;
    // Continuation lines lose one octet to the leading space
    let mut limit = MAX_LINE_OCTETS;

    for c in line.chars() {
        let width = c.len_utf8();
        if current + width > limit {
            folded.push_str("\r\n ");
            current = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        folded.push(c);
        current += width;
    }
    folded
}

impl CalendarEvent {
    /// Serialize the event into an iCalendar object with CRLF line endings
    pub fn to_ics(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODID),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", format_ics_utc(&self.dtstamp)),
            format!("DTSTART:{}", format_ics_utc(&self.start)),
            format!("DTEND:{}", format_ics_utc(&self.end)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
        ];
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut ics = String::new();
        for line in lines {
            ics.push_str(&fold_line(&line));
            ics.push_str("\r\n");
        }
        ics
    }
}
