use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default general-purpose English sentiment model
pub const DEFAULT_ENGLISH_MODEL: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// Russian-language sentiment model
pub const DEFAULT_RUSSIAN_MODEL: &str = "blanchefort/rubert-base-cased-sentiment";

/// Languages with a classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Russian,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::English),
            "ru" => Ok(Language::Russian),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Body of an inference request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
    /// Language code. An absent field means English; an explicit `null` is
    /// kept apart so it can be rejected.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<Option<String>>,
}

/// Marks a field that is present in the body, even when it is `null`
fn present_value<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl SentimentRequest {
    /// Resolve the requested language
    pub fn language(&self) -> Result<Language, Error> {
        match &self.language {
            None => Ok(Language::English),
            Some(Some(code)) => code.parse(),
            Some(None) => Err(Error::UnsupportedLanguage("null".to_string())),
        }
    }
}

/// Winning label and its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub label: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("ru".parse::<Language>().unwrap(), Language::Russian);
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(Error::UnsupportedLanguage(code)) if code == "fr"
        ));
        assert!("EN".parse::<Language>().is_err());
    }

    #[test]
    fn test_request_language_defaults_to_english() {
        let request: SentimentRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(request.language().unwrap(), Language::English);

        let request: SentimentRequest =
            serde_json::from_str(r#"{"text": "привет", "language": "ru"}"#).unwrap();
        assert_eq!(request.language().unwrap(), Language::Russian);
    }

    #[test]
    fn test_request_null_language_is_unsupported() {
        let request: SentimentRequest =
            serde_json::from_str(r#"{"text": "hi", "language": null}"#).unwrap();
        assert_eq!(request.language, Some(None));
        assert!(matches!(
            request.language(),
            Err(Error::UnsupportedLanguage(_))
        ));
    }
}
