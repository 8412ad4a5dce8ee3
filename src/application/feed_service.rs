// Feed service - Use case for aggregating the activity feed
use crate::application::activity_repository::{CommitRepository, TicketRepository};
use crate::domain::activity::ActivityItem;
use crate::domain::filter::sort_by_recency;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

pub const DEFAULT_FEED_LIMIT: usize = 50;

#[derive(Clone)]
pub struct FeedService {
    commits: Option<Arc<dyn CommitRepository>>,
    tickets: Option<Arc<dyn TicketRepository>>,
    limit: usize,
}

impl FeedService {
    /// A source passed as None is skipped entirely; the caller decides
    /// which sources are configured.
    pub fn new(
        commits: Option<Arc<dyn CommitRepository>>,
        tickets: Option<Arc<dyn TicketRepository>>,
        limit: usize,
    ) -> Self {
        Self {
            commits,
            tickets,
            limit,
        }
    }

    /// Fetch both sources, tag everything into ActivityItems and sort the
    /// merged feed newest-first. All-or-nothing: an error escaping either
    /// source fails the whole aggregate.
    pub async fn aggregate(&self) -> anyhow::Result<Vec<ActivityItem>> {
        let commits_fut = async {
            match &self.commits {
                Some(repo) => repo.recent_commits(self.limit).await,
                None => Ok(Vec::new()),
            }
        };
        let tickets_fut = async {
            match &self.tickets {
                Some(repo) => repo.assigned_tickets(self.limit).await,
                None => Ok(Vec::new()),
            }
        };

        let (commits, tickets) = tokio::join!(commits_fut, tickets_fut);
        let commits = commits.context("Failed to fetch GitHub commits")?;
        let tickets = tickets.context("Failed to fetch Linear tickets")?;

        let commit_count = commits.len();
        let ticket_count = tickets.len();

        let mut items: Vec<ActivityItem> = commits
            .into_iter()
            .map(ActivityItem::from_commit)
            .chain(tickets.into_iter().map(ActivityItem::from_ticket))
            .collect();
        sort_by_recency(&mut items);

        tracing::debug!(
            "Aggregated {} activities ({} commits, {} tickets)",
            items.len(),
            commit_count,
            ticket_count
        );
        Ok(items)
    }
}

/// The feed as last published by the refresh loop.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedSnapshot {
    pub activities: Vec<ActivityItem>,
    pub last_fetch: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Shared feed state: one writer (the refresh loop), many readers.
pub struct FeedState {
    snapshot: RwLock<FeedSnapshot>,
    refresh: Notify,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(FeedSnapshot::default()),
            refresh: Notify::new(),
        }
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn publish(&self, activities: Vec<ActivityItem>, fetched_at: DateTime<Utc>) {
        let mut snapshot = self.snapshot.write().await;
        snapshot.activities = activities;
        snapshot.last_fetch = Some(fetched_at);
        snapshot.error = None;
    }

    /// A failed aggregate clears the feed: partial or stale results are
    /// never shown alongside an error.
    pub async fn publish_error(&self, message: String) {
        let mut snapshot = self.snapshot.write().await;
        snapshot.activities = Vec::new();
        snapshot.error = Some(message);
    }

    /// Ask the refresh loop to run now. Requests arriving while a fetch
    /// is in flight coalesce into at most one extra run.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    pub async fn refresh_requested(&self) {
        self.refresh.notified().await;
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}
