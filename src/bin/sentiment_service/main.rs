mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use planbot::components::sentiment::{HfClassifierFactory, SentimentService};
use planbot::config::SentimentConfig;
use planbot::error::Error;
use planbot::shutdown::shutdown_signal;
use planbot::startup;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::handlers::{health_handler, infer_handler};

#[derive(Clone)]
pub struct AppState {
    /// Language selection and cached classifiers
    pub service: Arc<SentimentService>,
}

/// Build the HTTP router for the service
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/infer", post(infer_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize tracing
    startup::init_logging("info,tower_http=debug")?;

    info!("Starting sentiment inference service");

    let config = SentimentConfig::load()?;
    info!(
        "Models: en={}, ru={} via {}",
        config.models.english_model, config.models.russian_model, config.models.base_url
    );

    let factory = Arc::new(HfClassifierFactory::new(config.models.clone()));
    let state = AppState {
        service: Arc::new(SentimentService::new(factory)),
    };

    let ip = config
        .bind_address
        .parse::<std::net::IpAddr>()
        .map_err(|e| Error::Config(format!("Invalid BIND_ADDRESS {}: {}", config.bind_address, e)))?;
    let addr = SocketAddr::new(ip, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::from)?;

    Ok(())
}
