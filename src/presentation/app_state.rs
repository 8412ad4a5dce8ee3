// Application state for HTTP handlers
use crate::application::feed_service::FeedState;
use crate::infrastructure::linear_proxy::LinearProxy;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub feed_state: Arc<FeedState>,
    pub linear_proxy: LinearProxy,
}
