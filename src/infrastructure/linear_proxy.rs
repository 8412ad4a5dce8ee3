// Upstream forwarder for the Linear GraphQL proxy route
use anyhow::{Context, Result};
use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct LinearProxy {
    client: reqwest::Client,
    upstream: String,
    fallback_key: Option<String>,
}

/// The caller's credential wins; the server-configured key is only a
/// fallback. With neither, the request goes out unauthenticated and the
/// upstream's rejection is passed through.
fn select_credential(header: Option<&str>, fallback: Option<&str>) -> Option<String> {
    header.or(fallback).map(str::to_string)
}

impl LinearProxy {
    pub fn new(upstream: String, fallback_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream,
            fallback_key,
        }
    }

    /// Relay a GraphQL request body verbatim and return the upstream's
    /// status with its JSON payload. A non-JSON upstream body is an error.
    pub async fn forward(&self, authorization: Option<&str>, body: Bytes) -> Result<(u16, Vec<u8>)> {
        let mut request = self
            .client
            .post(&self.upstream)
            .header("Content-Type", "application/json")
            .body(body);

        if let Some(credential) = select_credential(authorization, self.fallback_key.as_deref()) {
            request = request.header("Authorization", credential);
        }

        let response = request.send().await.context("Failed to reach Linear")?;
        let status = response.status().as_u16();

        let payload = response
            .json::<serde_json::Value>()
            .await
            .context("Failed to parse Linear response")?;
        let body = serde_json::to_vec(&payload).context("Failed to serialize Linear response")?;

        Ok((status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_credential_wins() {
        assert_eq!(
            select_credential(Some("caller_key"), Some("server_key")),
            Some("caller_key".to_string())
        );
        assert_eq!(
            select_credential(None, Some("server_key")),
            Some("server_key".to_string())
        );
        assert_eq!(select_credential(None, None), None);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_error() {
        let proxy = LinearProxy::new("http://127.0.0.1:9/graphql".to_string(), None);
        let err = proxy
            .forward(None, Bytes::from_static(b"{\"query\":\"{ viewer { id } }\"}"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to reach Linear"));
    }
}
