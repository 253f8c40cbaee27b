pub mod api; // Review API router + server
pub mod cases; // Case-collection files
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod display_name;
pub mod extraction; // Transcript parsing
pub mod ledger; // Append-only review ledger
pub mod models;
pub mod navigation;
pub mod session; // One reviewer working one case file
pub mod validation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::ReviewConfig;
use crate::core_state::CoreState;

/// Install the fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Serve the review API until Ctrl-C.
pub async fn run() -> Result<(), String> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let review_config = ReviewConfig::load();
    tracing::info!(
        simulations = %review_config.simulations_dir.display(),
        reviews = %review_config.reviews_dir.display(),
        lookahead = %review_config.lookahead,
        "Configuration loaded"
    );

    let core = Arc::new(CoreState::new(review_config));
    let server = api::start_review_api_server(core).await?;
    tracing::info!(addr = %server.session.server_addr, "Review API ready");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for shutdown signal: {e}"))?;

    server.stop().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
