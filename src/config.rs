use crate::components::caldav::{CalDavCredentials, SubmissionSettings};
use crate::components::sentiment::{HfModelSettings, DEFAULT_ENGLISH_MODEL, DEFAULT_RUSSIAN_MODEL};
use crate::error::{config_error, env_error, AgentResult};
use crate::utils::time::parse_timezone;
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::time::Duration;
use tracing::info;

/// Default CalDAV endpoint (iCloud)
pub const DEFAULT_CALENDAR_URL: &str = "https://caldav.icloud.com";

/// Default OpenAI-compatible endpoint used for extraction (Cerebras)
pub const DEFAULT_EXTRACTION_URL: &str = "https://api.cerebras.ai/v1";

/// Default extraction model
pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-oss-120b";

/// Default hosted inference endpoint for the sentiment models
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";

const DEFAULT_CONFIG_FILE: &str = "config/agent.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const SUPPORTED_LOCALES: [&str; 2] = ["en", "ru"];

/// Optional defaults read from the TOML config file; environment variables
/// win over anything set here
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    calendar_url: Option<String>,
    calendar_name: Option<String>,
    timezone: Option<String>,
    extraction_url: Option<String>,
    extraction_model: Option<String>,
    locale: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl FileSettings {
    /// A missing file means no file defaults; any other read failure is
    /// reported
    fn load(path: &str) -> AgentResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                info!("Loading settings from {}", path);
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(config_error(&format!("Cannot read {}: {}", path, e))),
        }
    }
}

/// Configuration of the calendar agent, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// CalDAV account identity
    pub calendar_username: String,
    /// CalDAV app password
    pub calendar_password: String,
    /// CalDAV endpoint
    pub calendar_url: String,
    /// Target calendar name; `None` uses the first calendar
    pub calendar_name: Option<String>,
    /// Zone event times are interpreted in
    pub timezone: Tz,
    /// API key of the extraction model
    pub extraction_api_key: String,
    /// Base URL of the extraction API
    pub extraction_url: String,
    /// Extraction model name
    pub extraction_model: String,
    /// Locale of user-facing messages
    pub locale: String,
    /// Limit for each external call
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from `.env`, the process environment and the
    /// optional config file
    pub fn load() -> AgentResult<Self> {
        dotenv().ok();

        let path = env::var("AGENT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let file = FileSettings::load(&path)?;

        Self::from_sources(|key| env::var(key).ok(), file)
    }

    /// Build configuration from a key lookup alone
    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(lookup, FileSettings::default())
    }

    /// Build configuration from a key lookup and TOML defaults
    pub fn from_lookup_with_file<F>(lookup: F, toml_content: &str) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileSettings = toml::from_str(toml_content)?;
        Self::from_sources(lookup, file)
    }

    fn from_sources<F>(lookup: F, file: FileSettings) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &str| get(key).ok_or_else(|| env_error(key));

        let calendar_username = required("APPLE_ID")?;
        let calendar_password = required("APPLE_ID_PASSWORD")?;
        let extraction_api_key = required("CEREBRAS_API_KEY")?;

        let calendar_url = get("ICLOUD_CALENDAR_URL")
            .or(file.calendar_url)
            .unwrap_or_else(|| DEFAULT_CALENDAR_URL.to_string());

        let calendar_name = get("ICLOUD_CALENDAR_NAME").or(file.calendar_name);

        let timezone = get("LOCAL_TIMEZONE")
            .or(file.timezone)
            .unwrap_or_else(|| "UTC".to_string());
        let timezone = parse_timezone(&timezone)?;

        let extraction_url = get("EXTRACTION_API_URL")
            .or(file.extraction_url)
            .unwrap_or_else(|| DEFAULT_EXTRACTION_URL.to_string());

        let extraction_model = get("EXTRACTION_MODEL")
            .or(file.extraction_model)
            .unwrap_or_else(|| DEFAULT_EXTRACTION_MODEL.to_string());

        let locale = get("BOT_LOCALE")
            .or(file.locale)
            .unwrap_or_else(|| "en".to_string());
        if !SUPPORTED_LOCALES.contains(&locale.as_str()) {
            return Err(config_error(&format!(
                "Unsupported locale {}; expected one of {}",
                locale,
                SUPPORTED_LOCALES.join(", ")
            )));
        }

        let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| config_error("Invalid REQUEST_TIMEOUT_SECS format"))?,
            None => file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if request_timeout_secs == 0 {
            return Err(config_error("REQUEST_TIMEOUT_SECS must be positive"));
        }

        Ok(Config {
            calendar_username,
            calendar_password,
            calendar_url,
            calendar_name,
            timezone,
            extraction_api_key,
            extraction_url,
            extraction_model,
            locale,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    pub fn caldav_credentials(&self) -> CalDavCredentials {
        CalDavCredentials {
            url: self.calendar_url.clone(),
            username: self.calendar_username.clone(),
            password: self.calendar_password.clone(),
        }
    }

    pub fn submission_settings(&self) -> SubmissionSettings {
        SubmissionSettings {
            calendar_name: self.calendar_name.clone(),
            timezone: self.timezone,
            locale: self.locale.clone(),
        }
    }
}

/// Configuration of the sentiment inference service
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub bind_address: String,
    pub port: u16,
    pub models: HfModelSettings,
}

impl SentimentConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> AgentResult<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            None => 8000,
        };

        Ok(SentimentConfig {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            models: HfModelSettings {
                base_url: get("HF_INFERENCE_URL")
                    .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
                api_token: get("HF_API_TOKEN"),
                english_model: get("SENTIMENT_MODEL_EN")
                    .unwrap_or_else(|| DEFAULT_ENGLISH_MODEL.to_string()),
                russian_model: get("SENTIMENT_MODEL_RU")
                    .unwrap_or_else(|| DEFAULT_RUSSIAN_MODEL.to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let path = env::temp_dir().join("planbot-no-such-dir").join("agent.toml");
        let file = FileSettings::load(path.to_str().unwrap()).unwrap();
        assert!(file.calendar_name.is_none());
        assert!(file.request_timeout_secs.is_none());
    }

    #[test]
    fn test_unreadable_config_file_is_reported() {
        // A directory exists but cannot be read as a file
        let path = env::temp_dir();
        let err = FileSettings::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
    }
}
