// Activity feed domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Github,
    Linear,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Github => "github",
            Source::Linear => "linear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Commit,
    Ticket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub avatar: Option<String>,
}

/// A commit normalized from the GitHub commits API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    pub id: String,
    /// First line of the commit message.
    pub message: String,
    /// Author date.
    pub timestamp: DateTime<Utc>,
    /// "owner/repo" the commit was fetched from.
    pub repository: String,
    pub url: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Created,
    Assigned,
    InProgress,
    Completed,
    Closed,
}

impl TicketStatus {
    /// Normalize a Linear workflow state type. Unrecognized types map to
    /// Assigned.
    pub fn from_state_type(state_type: &str) -> Self {
        match state_type {
            "backlog" | "unstarted" => TicketStatus::Created,
            "started" => TicketStatus::InProgress,
            "completed" => TicketStatus::Completed,
            "canceled" => TicketStatus::Closed,
            _ => TicketStatus::Assigned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    /// Normalize Linear's numeric priority field. Absent or unrecognized
    /// values map to Medium.
    pub fn from_linear(priority: Option<i64>) -> Self {
        match priority {
            Some(0) => TicketPriority::Low,
            Some(1) => TicketPriority::Medium,
            Some(2) => TicketPriority::High,
            Some(3) | Some(4) => TicketPriority::Urgent,
            _ => TicketPriority::Medium,
        }
    }
}

/// A ticket normalized from the Linear GraphQL API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    /// Last-updated date, used for feed ordering.
    pub updated_at: DateTime<Utc>,
    pub url: String,
    pub description: Option<String>,
    pub priority: TicketPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ActivityData {
    Commit(Commit),
    Ticket(Ticket),
}

/// The unit the feed operates on: a commit or ticket tagged with its
/// source and the timestamp used for global ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    /// Synthetic id, unique across the feed: "{source}-{original id}".
    pub id: String,
    pub source: Source,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub data: ActivityData,
}

impl ActivityItem {
    pub fn from_commit(commit: Commit) -> Self {
        Self {
            id: format!("{}-{}", Source::Github.as_str(), commit.id),
            source: Source::Github,
            timestamp: commit.timestamp,
            data: ActivityData::Commit(commit),
        }
    }

    pub fn from_ticket(ticket: Ticket) -> Self {
        Self {
            id: format!("{}-{}", Source::Linear.as_str(), ticket.id),
            source: Source::Linear,
            timestamp: ticket.updated_at,
            data: ActivityData::Ticket(ticket),
        }
    }

    pub fn kind(&self) -> ActivityKind {
        match self.data {
            ActivityData::Commit(_) => ActivityKind::Commit,
            ActivityData::Ticket(_) => ActivityKind::Ticket,
        }
    }
}
