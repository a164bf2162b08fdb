use planbot::config::{
    Config, SentimentConfig, DEFAULT_CALENDAR_URL, DEFAULT_EXTRACTION_MODEL,
    DEFAULT_INFERENCE_URL,
};
use planbot::components::sentiment::{DEFAULT_ENGLISH_MODEL, DEFAULT_RUSSIAN_MODEL};
use planbot::error::Error;
use std::collections::HashMap;
use std::time::Duration;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| values.get(key).cloned()
}

const REQUIRED: [(&str, &str); 3] = [
    ("APPLE_ID", "user@example.com"),
    ("APPLE_ID_PASSWORD", "abcd-efgh-ijkl-mnop"),
    ("CEREBRAS_API_KEY", "test_key"),
];

/// Smoke test to verify that the config can be loaded with defaults
#[test]
fn test_config_defaults() {
    let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(config.calendar_username, "user@example.com");
    assert_eq!(config.calendar_url, DEFAULT_CALENDAR_URL);
    assert_eq!(config.calendar_name, None);
    assert_eq!(config.timezone, chrono_tz::UTC);
    assert_eq!(config.extraction_model, DEFAULT_EXTRACTION_MODEL);
    assert_eq!(config.locale, "en");
    assert_eq!(config.request_timeout, Duration::from_secs(60));
}

#[test]
fn test_config_overrides() {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend([
        ("ICLOUD_CALENDAR_NAME", " Домашний "),
        ("LOCAL_TIMEZONE", "Europe/Moscow"),
        ("BOT_LOCALE", "ru"),
        ("REQUEST_TIMEOUT_SECS", "15"),
    ]);
    let config = Config::from_lookup(lookup(&pairs)).unwrap();

    assert_eq!(config.calendar_name.as_deref(), Some("Домашний"));
    assert_eq!(config.timezone, chrono_tz::Europe::Moscow);
    assert_eq!(config.locale, "ru");
    assert_eq!(config.request_timeout, Duration::from_secs(15));

    let settings = config.submission_settings();
    assert_eq!(settings.calendar_name.as_deref(), Some("Домашний"));
    assert_eq!(settings.timezone, chrono_tz::Europe::Moscow);
}

#[test]
fn test_blank_calendar_name_means_first_calendar() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("ICLOUD_CALENDAR_NAME", "   "));
    let config = Config::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(config.calendar_name, None);
}

#[test]
fn test_missing_credentials() {
    let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
    assert!(matches!(err, Error::Environment(ref message) if message.contains("CEREBRAS_API_KEY")));
}

#[test]
fn test_invalid_values_are_rejected() {
    for (key, value) in [
        ("LOCAL_TIMEZONE", "Mars/Olympus"),
        ("BOT_LOCALE", "de"),
        ("REQUEST_TIMEOUT_SECS", "soon"),
        ("REQUEST_TIMEOUT_SECS", "0"),
    ] {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((key, value));
        let result = Config::from_lookup(lookup(&pairs));
        assert!(
            matches!(result, Err(Error::Config(_))),
            "{}={} should be rejected",
            key,
            value
        );
    }
}

#[test]
fn test_file_settings_are_overridden_by_environment() {
    let toml = r#"
calendar_name = "Work"
timezone = "Europe/Berlin"
extraction_model = "llama-3.3-70b"
request_timeout_secs = 30
"#;
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("LOCAL_TIMEZONE", "Asia/Tokyo"));
    let config = Config::from_lookup_with_file(lookup(&pairs), toml).unwrap();

    assert_eq!(config.calendar_name.as_deref(), Some("Work"));
    assert_eq!(config.timezone, chrono_tz::Asia::Tokyo);
    assert_eq!(config.extraction_model, "llama-3.3-70b");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
fn test_sentiment_config() {
    let config = SentimentConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.port, 8000);
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.models.base_url, DEFAULT_INFERENCE_URL);
    assert_eq!(config.models.english_model, DEFAULT_ENGLISH_MODEL);
    assert_eq!(config.models.russian_model, DEFAULT_RUSSIAN_MODEL);
    assert_eq!(config.models.api_token, None);

    let config = SentimentConfig::from_lookup(lookup(&[("PORT", "9090"), ("HF_API_TOKEN", "hf_x")]))
        .unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.models.api_token.as_deref(), Some("hf_x"));

    assert!(SentimentConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
}
