use crate::components::event_request::ValidationError;
use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(planbot::validation))]
    Validation(#[from] ValidationError),

    #[error("Malformed extraction output: {0}")]
    #[diagnostic(
        code(planbot::malformed_extraction),
        help("Rephrase the instruction with an explicit title, date and time")
    )]
    MalformedExtraction(String),

    #[error("Extraction request failed: {0}")]
    #[diagnostic(code(planbot::extraction))]
    Extraction(String),

    #[error("Calendar '{name}' not found. Available: {}", available.join(", "))]
    #[diagnostic(
        code(planbot::calendar_not_found),
        help("Set ICLOUD_CALENDAR_NAME to one of the available calendars, or leave it empty to use the first one")
    )]
    CalendarNotFound { name: String, available: Vec<String> },

    #[error("No calendars available for this account")]
    #[diagnostic(code(planbot::no_calendars))]
    NoCalendars,

    #[error("Calendar submission failed: {0}")]
    #[diagnostic(
        code(planbot::submission),
        help("The event may or may not exist on the server; check the calendar before retrying")
    )]
    Submission(String),

    #[error("Unsupported language: {0}")]
    #[diagnostic(code(planbot::unsupported_language))]
    UnsupportedLanguage(String),

    #[error("Classifier error: {0}")]
    #[diagnostic(code(planbot::classifier))]
    Classifier(String),

    #[error("{operation} timed out after {seconds}s")]
    #[diagnostic(code(planbot::timeout))]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    #[error("Environment error: {0}")]
    #[diagnostic(code(planbot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(planbot::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(planbot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(planbot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(planbot::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    /// Whether the error was caused by the caller rather than by this service
    /// or one of its collaborators
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::MalformedExtraction(_) | Error::UnsupportedLanguage(_)
        )
    }
}

/// Type alias for Result with our Error type
pub type AgentResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create calendar submission errors
pub fn submission_error(message: &str) -> Error {
    Error::Submission(message.to_string())
}

/// Helper to create extraction errors
pub fn extraction_error(message: &str) -> Error {
    Error::Extraction(message.to_string())
}

/// Helper to create classifier errors
pub fn classifier_error(message: &str) -> Error {
    Error::Classifier(message.to_string())
}
