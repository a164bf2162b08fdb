//! Just enough WebDAV multistatus parsing to discover calendars.
//!
//! Servers disagree on namespace prefixes (`D:`, `d:`, none at all), so
//! elements are matched by local name only.

use regex::Regex;
use std::sync::OnceLock;

/// One `<response>` entry of a multistatus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavResponse {
    pub href: String,
    pub display_name: Option<String>,
    pub is_calendar: bool,
    /// Raw inner XML, for property lookups not covered above
    pub body: String,
}

fn response_regex() -> &'static Regex {
    static RESPONSE_RE: OnceLock<Regex> = OnceLock::new();
    RESPONSE_RE.get_or_init(|| {
        Regex::new(r"(?s)<(?:[A-Za-z0-9_-]+:)?response(?:\s[^>]*)?>(.*?)</(?:[A-Za-z0-9_-]+:)?response\s*>")
            .expect("response regex must compile")
    })
}

fn element_regex(local_name: &str) -> Option<Regex> {
    let name = regex::escape(local_name);
    Regex::new(&format!(
        r"(?s)<(?:[A-Za-z0-9_-]+:)?{name}(?:\s[^>]*)?(?:/>|>(.*?)</(?:[A-Za-z0-9_-]+:)?{name}\s*>)"
    ))
    .ok()
}

/// Inner text of the first element with the given local name. Self-closing
/// elements yield an empty string.
pub fn element_text(fragment: &str, local_name: &str) -> Option<String> {
    let re = element_regex(local_name)?;
    let caps = re.captures(fragment)?;
    Some(
        caps.get(1)
            .map(|m| unescape(m.as_str().trim()))
            .unwrap_or_default(),
    )
}

/// Whether an element with the given local name occurs in the fragment
pub fn has_element(fragment: &str, local_name: &str) -> bool {
    element_regex(local_name)
        .map(|re| re.is_match(fragment))
        .unwrap_or(false)
}

/// The `<href>` nested inside the named property, e.g.
/// `current-user-principal` or `calendar-home-set`
pub fn nested_href(body: &str, property: &str) -> Option<String> {
    let container = element_text_raw(body, property)?;
    element_text(&container, "href").filter(|href| !href.is_empty())
}

fn element_text_raw(fragment: &str, local_name: &str) -> Option<String> {
    let re = element_regex(local_name)?;
    let caps = re.captures(fragment)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

/// Split a multistatus body into its responses
pub fn parse_multistatus(body: &str) -> Vec<DavResponse> {
    response_regex()
        .captures_iter(body)
        .filter_map(|caps| {
            let inner = caps.get(1)?.as_str();
            let href = element_text(inner, "href")?;
            let display_name = element_text(inner, "displayname").filter(|name| !name.is_empty());
            let is_calendar = element_text_raw(inner, "resourcetype")
                .map(|types| has_element(&types, "calendar"))
                .unwrap_or(false);
            Some(DavResponse {
                href,
                display_name,
                is_calendar,
                body: inner.to_string(),
            })
        })
        .collect()
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
