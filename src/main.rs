// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{
    routing::{any, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::application::activity_repository::{CommitRepository, TicketRepository};
use crate::application::feed_service::{FeedService, FeedState};
use crate::application::refresh::run_refresh_loop;
use crate::infrastructure::config::{load_app_config, parse_repositories};
use crate::infrastructure::github_client::GithubClient;
use crate::infrastructure::linear_client::LinearClient;
use crate::infrastructure::linear_proxy::LinearProxy;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_feed, health_check, linear_proxy, refresh_feed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_app_config()?;
    let repositories = parse_repositories(&config.github.repositories);

    // Build sources (infrastructure layer). GitHub runs only with a token
    // and at least one repository; Linear only with an API key.
    let commits: Option<Arc<dyn CommitRepository>> = match &config.github.token {
        Some(token) if !repositories.is_empty() => Some(Arc::new(GithubClient::new(
            token.clone(),
            config.github.username.clone(),
            repositories,
        ))),
        _ => None,
    };
    let tickets: Option<Arc<dyn TicketRepository>> = config.linear.api_key.as_ref().map(|key| {
        Arc::new(LinearClient::new(config.linear.api_url.clone(), key.clone()))
            as Arc<dyn TicketRepository>
    });

    // Create services (application layer)
    let feed_service = FeedService::new(commits, tickets, config.feed.limit);
    let feed_state = Arc::new(FeedState::new());

    tokio::spawn(run_refresh_loop(
        feed_service,
        feed_state.clone(),
        Duration::from_millis(config.feed.refresh_interval_ms),
    ));

    // Create application state
    let state = Arc::new(AppState {
        feed_state,
        linear_proxy: LinearProxy::new(
            config.linear.api_url.clone(),
            config.linear.api_key.clone(),
        ),
    });

    // Build router (presentation layer)
    // Note: the proxy route sets its own CORS header, so the permissive
    // layer only wraps the feed endpoints
    let feed_routes = Router::new()
        .route("/feed", get(get_feed))
        .route("/refresh", post(refresh_feed))
        .layer(CorsLayer::permissive());

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/linear/graphql", any(linear_proxy))
        .merge(feed_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    println!("Starting devfeed service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
