// Linear GraphQL client for assigned tickets
use crate::application::activity_repository::TicketRepository;
use crate::domain::activity::{Ticket, TicketPriority, TicketStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const GET_TICKETS_QUERY: &str = r#"
query GetTickets($first: Int!) {
  viewer {
    assignedIssues(first: $first, orderBy: updatedAt) {
      nodes {
        id
        title
        url
        createdAt
        updatedAt
        description
        priority
        state {
          name
          type
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone)]
pub struct LinearClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<TicketsData>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TicketsData {
    viewer: Option<Viewer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Viewer {
    assigned_issues: Option<IssueConnection>,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Vec<IssueNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    id: String,
    title: String,
    url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    description: Option<String>,
    priority: Option<i64>,
    state: StateNode,
}

#[derive(Debug, Deserialize)]
struct StateNode {
    #[allow(dead_code)]
    name: String,
    #[serde(rename = "type")]
    state_type: String,
}

impl LinearClient {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    async fn fetch_tickets(&self, limit: usize) -> Result<Vec<Ticket>> {
        let body = serde_json::json!({
            "query": GET_TICKETS_QUERY,
            "variables": { "first": limit },
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", self.api_key.clone())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Linear")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Linear API error ({}): {}", status, body);
        }

        let data = response
            .json::<GraphqlResponse>()
            .await
            .context("Failed to parse Linear response")?;

        extract_tickets(data)
    }
}

fn extract_tickets(response: GraphqlResponse) -> Result<Vec<Ticket>> {
    if let Some(first) = response.errors.as_ref().and_then(|errors| errors.first()) {
        anyhow::bail!("Linear GraphQL error: {}", first.message);
    }

    let nodes = response
        .data
        .and_then(|data| data.viewer)
        .and_then(|viewer| viewer.assigned_issues)
        .map(|connection| connection.nodes);

    let Some(nodes) = nodes else {
        tracing::warn!("No Linear issues found in response");
        return Ok(Vec::new());
    };

    Ok(nodes.into_iter().map(map_issue).collect())
}

fn map_issue(node: IssueNode) -> Ticket {
    Ticket {
        id: node.id,
        title: node.title,
        status: TicketStatus::from_state_type(&node.state.state_type),
        created_at: node.created_at,
        updated_at: node.updated_at,
        url: node.url,
        description: node.description,
        priority: TicketPriority::from_linear(node.priority),
    }
}

#[async_trait]
impl TicketRepository for LinearClient {
    /// Errors never escape this client: transport failures, GraphQL error
    /// arrays and malformed shapes all log and yield an empty list.
    async fn assigned_tickets(&self, limit: usize) -> Result<Vec<Ticket>> {
        match self.fetch_tickets(limit).await {
            Ok(tickets) => Ok(tickets),
            Err(e) => {
                tracing::error!("Error fetching Linear tickets: {:#}", e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_node(state_type: &str, priority: Option<i64>) -> serde_json::Value {
        serde_json::json!({
            "id": "t1",
            "title": "Payments webhook drops events",
            "url": "https://linear.app/acme/issue/t1",
            "createdAt": "2026-07-20T08:00:00Z",
            "updatedAt": "2026-08-04T16:00:00Z",
            "description": null,
            "priority": priority,
            "state": {"name": "In Progress", "type": state_type}
        })
    }

    fn response_with_nodes(nodes: Vec<serde_json::Value>) -> GraphqlResponse {
        serde_json::from_value(serde_json::json!({
            "data": {"viewer": {"assignedIssues": {"nodes": nodes}}}
        }))
        .unwrap()
    }

    #[test]
    fn test_graphql_errors_become_an_error() {
        let response: GraphqlResponse = serde_json::from_value(serde_json::json!({
            "errors": [{"message": "bad token"}]
        }))
        .unwrap();

        let err = extract_tickets(response).unwrap_err();
        assert!(err.to_string().contains("bad token"));
    }

    #[test]
    fn test_missing_viewer_yields_empty_list() {
        let response: GraphqlResponse =
            serde_json::from_value(serde_json::json!({"data": {}})).unwrap();
        assert!(extract_tickets(response).unwrap().is_empty());
    }

    #[test]
    fn test_issue_mapping() {
        let tickets =
            extract_tickets(response_with_nodes(vec![issue_node("started", Some(4))])).unwrap();

        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, "t1");
        assert_eq!(tickets[0].status, TicketStatus::InProgress);
        assert_eq!(tickets[0].priority, TicketPriority::Urgent);
        assert_eq!(
            tickets[0].updated_at,
            "2026-08-04T16:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_state_type_normalization_paths() {
        let tickets = extract_tickets(response_with_nodes(vec![
            issue_node("canceled", None),
            issue_node("unstarted", None),
            issue_node("triage", None),
        ]))
        .unwrap();

        assert_eq!(tickets[0].status, TicketStatus::Closed);
        assert_eq!(tickets[1].status, TicketStatus::Created);
        assert_eq!(tickets[2].status, TicketStatus::Assigned);
        assert!(tickets.iter().all(|t| t.priority == TicketPriority::Medium));
    }

    #[tokio::test]
    async fn test_transport_errors_are_swallowed() {
        // Nothing listens on this port; the request fails without leaving
        // the machine and the client must still resolve to an empty list.
        let client = LinearClient::new(
            "http://127.0.0.1:9/graphql".to_string(),
            "lin_api_key".to_string(),
        );

        let tickets = client.assigned_tickets(50).await.unwrap();
        assert!(tickets.is_empty());
    }
}
