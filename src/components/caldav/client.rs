use crate::error::{submission_error, AgentResult};
use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::models::{CalendarEvent, CalendarInfo};
use super::multistatus::{nested_href, parse_multistatus};

const PRINCIPAL_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop><d:current-user-principal/></d:prop>
</d:propfind>"#;

const HOME_SET_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop><c:calendar-home-set/></d:prop>
</d:propfind>"#;

const CALENDARS_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop><d:displayname/><d:resourcetype/></d:prop>
</d:propfind>"#;

/// Remote calendar account the agent writes into
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// List the calendars the account exposes, in server order
    async fn calendars(&self) -> AgentResult<Vec<CalendarInfo>>;

    /// Create the event in the given calendar
    async fn put_event(&self, calendar: &CalendarInfo, event: &CalendarEvent) -> AgentResult<()>;
}

/// Credentials and endpoint of a CalDAV account
#[derive(Debug, Clone)]
pub struct CalDavCredentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// CalDAV implementation of [`CalendarService`]
#[derive(Clone)]
pub struct CalDavClient {
    base_url: Url,
    username: String,
    password: String,
    client: Client,
}

impl CalDavClient {
    pub fn new(credentials: CalDavCredentials) -> AgentResult<Self> {
        let base_url = Url::parse(&credentials.url).map_err(|e| {
            submission_error(&format!("Invalid calendar URL {}: {}", credentials.url, e))
        })?;
        Ok(Self {
            base_url,
            username: credentials.username,
            password: credentials.password,
            client: Client::new(),
        })
    }

    /// Issue a PROPFIND and return the multistatus body
    async fn propfind(&self, url: &Url, depth: u8, body: &'static str) -> AgentResult<String> {
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| submission_error(&format!("Invalid method: {}", e)))?;

        let response = self
            .client
            .request(method, url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header("Depth", depth.to_string())
            .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| submission_error(&format!("PROPFIND {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::MULTI_STATUS && !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(submission_error(&format!(
                "PROPFIND {} failed: HTTP {} - {}",
                url, status, error_body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| submission_error(&format!("Failed to read PROPFIND response: {}", e)))
    }

    fn resolve(&self, base: &Url, href: &str) -> AgentResult<Url> {
        base.join(href)
            .map_err(|e| submission_error(&format!("Invalid href {}: {}", href, e)))
    }

    /// Follow a property that points at another collection, falling back to
    /// `url` when the server does not report it
    async fn follow_property(
        &self,
        url: &Url,
        query: &'static str,
        property: &str,
    ) -> AgentResult<Url> {
        let body = self.propfind(url, 0, query).await?;
        let href = parse_multistatus(&body)
            .iter()
            .find_map(|response| nested_href(&response.body, property));

        match href {
            Some(href) => self.resolve(url, &href),
            None => {
                debug!("{} not reported for {}, using it directly", property, url);
                Ok(url.clone())
            }
        }
    }
}

#[async_trait]
impl CalendarService for CalDavClient {
    async fn calendars(&self) -> AgentResult<Vec<CalendarInfo>> {
        let principal = self
            .follow_property(&self.base_url, PRINCIPAL_QUERY, "current-user-principal")
            .await?;
        let home = self
            .follow_property(&principal, HOME_SET_QUERY, "calendar-home-set")
            .await?;

        let body = self.propfind(&home, 1, CALENDARS_QUERY).await?;
        let mut calendars = Vec::new();
        for response in parse_multistatus(&body).into_iter().filter(|r| r.is_calendar) {
            let url = self.resolve(&home, &response.href)?;
            let name = response.display_name.unwrap_or_else(|| {
                url.path_segments()
                    .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                    .unwrap_or_default()
                    .to_string()
            });
            calendars.push(CalendarInfo {
                name,
                url: url.to_string(),
            });
        }

        info!("Found {} calendars at {}", calendars.len(), home);
        Ok(calendars)
    }

    async fn put_event(&self, calendar: &CalendarInfo, event: &CalendarEvent) -> AgentResult<()> {
        let collection = if calendar.url.ends_with('/') {
            calendar.url.clone()
        } else {
            format!("{}/", calendar.url)
        };
        let url = Url::parse(&collection)
            .and_then(|base| base.join(&format!("{}.ics", event.uid)))
            .map_err(|e| submission_error(&format!("Invalid calendar URL {}: {}", calendar.url, e)))?;

        debug!("Creating event {} at {}", event.uid, url);

        let response = self
            .client
            .put(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(header::CONTENT_TYPE, "text/calendar; charset=utf-8")
            .header(header::IF_NONE_MATCH, "*")
            .body(event.to_ics())
            .send()
            .await
            .map_err(|e| submission_error(&format!("PUT {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(submission_error(&format!(
                "PUT {} failed: HTTP {} - {}",
                url, status, error_body
            )));
        }

        info!("Event {} created in calendar '{}'", event.uid, calendar.name);
        Ok(())
    }
}
