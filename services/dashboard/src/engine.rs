//! Periodic refresh scheduling

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::Store;

/// Drive the store: one refresh immediately, then one per interval
/// until the token is cancelled.
///
/// Each refresh is awaited before the next sleep, so once this
/// function returns no further state writes can happen.
pub async fn refresh_loop(store: Arc<Store>, interval: Duration, cancel: CancellationToken) {
    loop {
        store.refresh().await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Refresh loop cancelled");
                break;
            }
        }
    }
}
