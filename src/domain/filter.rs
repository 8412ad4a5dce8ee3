// Feed filtering and ordering
use crate::domain::activity::{ActivityItem, ActivityKind, Source};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    #[default]
    All,
    Github,
    Linear,
}

impl SourceFilter {
    fn matches(&self, source: Source) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Github => source == Source::Github,
            SourceFilter::Linear => source == Source::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Commit,
    Ticket,
}

impl TypeFilter {
    fn matches(&self, kind: ActivityKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Commit => kind == ActivityKind::Commit,
            TypeFilter::Ticket => kind == ActivityKind::Ticket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    /// Cutoff instant for this window, or None when the range is unbounded.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let window_ms = match self {
            TimeRange::All => return None,
            TimeRange::Day => DAY_MS,
            TimeRange::Week => WEEK_MS,
            TimeRange::Month => MONTH_MS,
        };
        Some(now - Duration::milliseconds(window_ms))
    }
}

/// The three independent feed predicates, combined with logical AND.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub source: SourceFilter,
    #[serde(default, rename = "type")]
    pub kind: TypeFilter,
    #[serde(default)]
    pub range: TimeRange,
}

/// Select the items matching all three predicates. Relative order is
/// preserved; the input is expected to be sorted already and is never
/// re-sorted here.
pub fn filter_activities(
    items: &[ActivityItem],
    opts: &FilterOptions,
    now: DateTime<Utc>,
) -> Vec<ActivityItem> {
    let cutoff = opts.range.cutoff(now);
    items
        .iter()
        .filter(|item| opts.source.matches(item.source))
        .filter(|item| opts.kind.matches(item.kind()))
        .filter(|item| cutoff.is_none_or(|c| item.timestamp >= c))
        .cloned()
        .collect()
}

/// Sort a feed newest-first. Stable, so equal timestamps keep their
/// concatenation order.
pub fn sort_by_recency(items: &mut [ActivityItem]) {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::{Commit, CommitAuthor, Ticket, TicketPriority, TicketStatus};

    fn commit_item(id: &str, timestamp: &str) -> ActivityItem {
        ActivityItem::from_commit(Commit {
            id: id.to_string(),
            message: "Update dependencies".to_string(),
            timestamp: timestamp.parse().unwrap(),
            repository: "acme/web".to_string(),
            url: format!("https://github.com/acme/web/commit/{}", id),
            author: CommitAuthor {
                name: "Dev".to_string(),
                avatar: None,
            },
        })
    }

    fn ticket_item(id: &str, updated_at: &str) -> ActivityItem {
        ActivityItem::from_ticket(Ticket {
            id: id.to_string(),
            title: "Flaky deploy".to_string(),
            status: TicketStatus::InProgress,
            created_at: "2026-07-01T00:00:00Z".parse().unwrap(),
            updated_at: updated_at.parse().unwrap(),
            url: format!("https://linear.app/acme/issue/{}", id),
            description: None,
            priority: TicketPriority::Medium,
        })
    }

    fn sample_feed() -> Vec<ActivityItem> {
        vec![
            commit_item("c1", "2026-08-05T10:00:00Z"),
            ticket_item("t1", "2026-08-04T10:00:00Z"),
            commit_item("c2", "2026-08-03T10:00:00Z"),
            ticket_item("t2", "2026-08-01T10:00:00Z"),
        ]
    }

    #[test]
    fn test_all_filters_are_identity() {
        let feed = sample_feed();
        let now = "2026-08-06T00:00:00Z".parse().unwrap();
        let filtered = filter_activities(&feed, &FilterOptions::default(), now);
        assert_eq!(filtered, feed);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let feed = sample_feed();
        let now = "2026-08-06T00:00:00Z".parse().unwrap();
        let opts = FilterOptions {
            source: SourceFilter::Github,
            kind: TypeFilter::All,
            range: TimeRange::Week,
        };

        let once = filter_activities(&feed, &opts, now);
        let twice = filter_activities(&once, &opts, now);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_source_and_type_filters() {
        let feed = sample_feed();
        let now = "2026-08-06T00:00:00Z".parse().unwrap();

        let github = filter_activities(
            &feed,
            &FilterOptions {
                source: SourceFilter::Github,
                ..Default::default()
            },
            now,
        );
        assert_eq!(github.len(), 2);
        assert!(github.iter().all(|i| i.source == Source::Github));

        let tickets = filter_activities(
            &feed,
            &FilterOptions {
                kind: TypeFilter::Ticket,
                ..Default::default()
            },
            now,
        );
        assert_eq!(tickets.len(), 2);
        assert!(tickets.iter().all(|i| i.kind() == ActivityKind::Ticket));
    }

    #[test]
    fn test_day_window_boundary_is_inclusive() {
        let now: DateTime<Utc> = "2026-08-06T00:00:00Z".parse().unwrap();
        let on_boundary = commit_item("c1", "2026-08-05T00:00:00Z");
        let just_outside = commit_item("c2", "2026-08-04T23:59:59.999Z");

        let feed = vec![on_boundary.clone(), just_outside];
        let opts = FilterOptions {
            range: TimeRange::Day,
            ..Default::default()
        };

        let filtered = filter_activities(&feed, &opts, now);
        assert_eq!(filtered, vec![on_boundary]);
    }

    #[test]
    fn test_filter_preserves_order_without_sorting() {
        // Deliberately unsorted input; filter must not reorder it
        let feed = vec![
            commit_item("c1", "2026-08-01T10:00:00Z"),
            commit_item("c2", "2026-08-05T10:00:00Z"),
        ];
        let now = "2026-08-06T00:00:00Z".parse().unwrap();
        let filtered = filter_activities(&feed, &FilterOptions::default(), now);
        assert_eq!(filtered[0].id, "github-c1");
        assert_eq!(filtered[1].id, "github-c2");
    }

    #[test]
    fn test_sort_by_recency_is_descending() {
        let mut feed = vec![
            ticket_item("t1", "2026-08-01T10:00:00Z"),
            commit_item("c1", "2026-08-05T10:00:00Z"),
            ticket_item("t2", "2026-08-03T10:00:00Z"),
        ];
        sort_by_recency(&mut feed);

        assert!(feed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(feed[0].id, "github-c1");
    }

    #[test]
    fn test_query_string_shapes_deserialize() {
        let opts: FilterOptions =
            serde_json::from_str(r#"{"source":"linear","type":"ticket","range":"7d"}"#).unwrap();
        assert_eq!(opts.source, SourceFilter::Linear);
        assert_eq!(opts.kind, TypeFilter::Ticket);
        assert_eq!(opts.range, TimeRange::Week);

        // Every predicate defaults to "all" when omitted
        let opts: FilterOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.source, SourceFilter::All);
        assert_eq!(opts.kind, TypeFilter::All);
        assert_eq!(opts.range, TimeRange::All);
    }
}
