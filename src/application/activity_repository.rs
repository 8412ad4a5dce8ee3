// Repository traits for remote activity sources
use crate::domain::activity::{Commit, Ticket};
use async_trait::async_trait;

#[async_trait]
pub trait CommitRepository: Send + Sync {
    /// Recent commits authored by the configured identity across the
    /// configured repositories, newest first. `limit` is a total budget
    /// shared across repositories.
    async fn recent_commits(&self, limit: usize) -> anyhow::Result<Vec<Commit>>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Tickets assigned to the authenticated user, ordered by last update.
    async fn assigned_tickets(&self, limit: usize) -> anyhow::Result<Vec<Ticket>>;
}
