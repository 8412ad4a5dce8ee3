// GitHub REST client for recent commits
use crate::application::activity_repository::CommitRepository;
use crate::domain::activity::{Commit, CommitAuthor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub token is required")]
    MissingToken,
    #[error("GitHub API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    username: Option<String>,
    repositories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    html_url: String,
    commit: CommitDetails,
    /// The GitHub user, absent when the author has no account.
    author: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
struct CommitDetails {
    author: GitAuthor,
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitAuthor {
    name: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    avatar_url: Option<String>,
}

impl GithubClient {
    pub fn new(token: String, username: Option<String>, repositories: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.github.com".to_string(),
            token,
            username,
            repositories,
        }
    }

    fn commits_url(&self, repo: &str, per_page: usize) -> String {
        let mut url = format!("{}/repos/{}/commits?per_page={}", self.base_url, repo, per_page);
        if let Some(username) = &self.username {
            url.push_str("&author=");
            url.push_str(&urlencoding::encode(username));
        }
        url
    }

    async fn fetch_repo_commits(&self, repo: &str, per_page: usize) -> Result<Vec<Commit>> {
        let url = self.commits_url(repo, per_page);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .context("Failed to send request to GitHub")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Api { status, body }.into());
        }

        let entries = response
            .json::<Vec<CommitEntry>>()
            .await
            .context("Failed to parse GitHub commits response")?;

        Ok(entries
            .into_iter()
            .map(|entry| map_commit(entry, repo))
            .collect())
    }
}

fn map_commit(entry: CommitEntry, repo: &str) -> Commit {
    Commit {
        id: entry.sha,
        message: first_line(&entry.commit.message),
        timestamp: entry.commit.author.date,
        repository: repo.to_string(),
        url: entry.html_url,
        author: CommitAuthor {
            name: entry.commit.author.name,
            avatar: entry.author.and_then(|user| user.avatar_url),
        },
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

/// Per-repository share of the total commit budget.
fn per_repo_share(limit: usize, repo_count: usize) -> usize {
    limit.div_ceil(repo_count)
}

/// Merge per-repository batches into one list, newest first. A failed
/// repository is logged and contributes nothing; it never aborts the
/// batch.
fn merge_repo_batches(batches: Vec<(String, Result<Vec<Commit>>)>) -> Vec<Commit> {
    let mut commits = Vec::new();
    for (repo, result) in batches {
        match result {
            Ok(mut batch) => commits.append(&mut batch),
            Err(e) => tracing::warn!("Failed to fetch commits for {}: {:#}", repo, e),
        }
    }
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    commits
}

#[async_trait]
impl CommitRepository for GithubClient {
    async fn recent_commits(&self, limit: usize) -> Result<Vec<Commit>> {
        if self.token.is_empty() {
            return Err(GithubError::MissingToken.into());
        }
        if self.repositories.is_empty() {
            return Ok(Vec::new());
        }

        let per_page = per_repo_share(limit, self.repositories.len());

        let mut batches = Vec::with_capacity(self.repositories.len());
        for repo in &self.repositories {
            let result = self.fetch_repo_commits(repo, per_page).await;
            batches.push((repo.clone(), result));
        }

        Ok(merge_repo_batches(batches))
    }
}
