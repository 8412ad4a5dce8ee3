// Feed refresh loop - single-flight polling with manual wake
use crate::application::feed_service::{FeedService, FeedState};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Refresh the feed forever: aggregate, publish, then sleep until the
/// next interval tick or a manual refresh request. One task owns the
/// whole cycle, so a new fetch can never start while one is in flight.
pub async fn run_refresh_loop(service: FeedService, state: Arc<FeedState>, interval: Duration) {
    loop {
        match service.aggregate().await {
            Ok(items) => {
                tracing::info!("Feed refreshed: {} activities", items.len());
                state.publish(items, Utc::now()).await;
            }
            Err(e) => {
                tracing::warn!("Feed refresh failed: {:#}", e);
                state.publish_error(format!("{:#}", e)).await;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = state.refresh_requested() => {
                tracing::info!("Refresh requested, fetching now");
            }
        }
    }
}
