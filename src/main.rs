use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use postcall::config::AppConfig;
use postcall::handlers;
use postcall::services::calendar::google::GoogleCalendarProvider;
use postcall::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if !config.is_development() {
        anyhow::ensure!(
            !config.retell_api_key.is_empty(),
            "RETELL_API_KEY must be set when ENVIRONMENT is not development"
        );
    }

    let calendar = GoogleCalendarProvider::from_token_json(&config.google_token_json)?;
    tracing::info!(calendar_id = %config.google_calendar_id, "calendar provider initialized");

    let state = Arc::new(AppState {
        config: config.clone(),
        calendar: Box::new(calendar),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhook/retell", post(handlers::webhook::retell_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
