//! Fleetwatch - equipment reliability dashboard
//!
//! Polls an equipment REST backend for the fleet list and statistics,
//! keeps the latest snapshot in memory, and serves a dashboard with
//! add/delete actions that forward to the backend.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod io;
pub mod prompt;
pub mod state;
pub mod store;
pub mod view;

pub use config::{load_config, Config};
pub use error::{FleetwatchError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::EquipmentApi;
use crate::io::ReqwestHttpClient;
use crate::prompt::AutoConfirm;
use crate::store::Store;

/// Run the fleetwatch service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let cancel = CancellationToken::new();

    let api = EquipmentApi::new(&config.backend.base_url, Arc::clone(&http));
    let state = state::new_state_handle(Duration::from_secs(config.messages.ttl_seconds));
    let store = Arc::new(Store::new(api, state, Arc::new(AutoConfirm)));

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let dashboard_store = Arc::clone(&store);
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_store);
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!(
        "Refresh loop started against {} (interval {}s)",
        config.backend.base_url,
        config.backend.poll_interval_seconds
    );

    // Poll the backend until cancelled
    engine::refresh_loop(
        Arc::clone(&store),
        Duration::from_secs(config.backend.poll_interval_seconds),
        cancel.clone(),
    )
    .await;

    tracing::info!("Fleetwatch stopped");
    Ok(())
}
