// EcoPredict - Web Server
// REST API over the prediction and activity core

use anyhow::{Context, Result};
use ecopredict::api::{router, AppState};
use ecopredict::{init_tracing, sample_activities, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let history = config.load_history()?;

    match &config.history_path {
        Some(path) => info!(months = history.len(), path = ?path, "history loaded"),
        None => info!(months = history.len(), "using built-in sample history"),
    }

    let state = AppState::new(history, sample_activities(), config.forecast_months);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;

    info!("🚀 Server running on http://{}", config.bind_address);
    info!("   API: http://{}/api/prediction", config.bind_address);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
