use crate::config::Config;
use crate::error::{AgentResult, Error};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(feature = "calendar-agent")]
use crate::components::{
    caldav::{CalDavClient, SubmissionAdapter},
    extraction::{RigExtractor, RigExtractorSettings},
    CalendarAgent,
};
#[cfg(feature = "calendar-agent")]
use std::sync::Arc;

/// Initialize logging with environment-based configuration
pub fn init_logging(default_filter: &str) -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the agent configuration
pub fn load_config() -> AgentResult<Config> {
    match Config::load() {
        Ok(config) => {
            info!(
                "Loaded configuration: calendar {} ({}), timezone {}, locale {}",
                config.calendar_url,
                config.calendar_name.as_deref().unwrap_or("first available"),
                config.timezone.name(),
                config.locale
            );
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e)
        }
    }
}

/// Wire the production collaborators into a calendar agent
#[cfg(feature = "calendar-agent")]
pub fn build_agent(config: &Config) -> AgentResult<CalendarAgent> {
    let calendar = CalDavClient::new(config.caldav_credentials())?;
    let adapter = SubmissionAdapter::new(Arc::new(calendar), config.submission_settings());

    let extractor = RigExtractor::new(&RigExtractorSettings {
        api_key: config.extraction_api_key.clone(),
        base_url: config.extraction_url.clone(),
        model: config.extraction_model.clone(),
    });

    Ok(CalendarAgent::new(
        Arc::new(extractor),
        adapter,
        config.request_timeout,
    ))
}
