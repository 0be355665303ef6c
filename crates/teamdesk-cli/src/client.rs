//! HTTP client for the onboarding admin API.

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};

/// Thin wrapper over the server's admin endpoints.
pub struct AdminClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .context("No admin token; run `teamdesk login` and set TEAMDESK_TOKEN or pass --token")?;
        Ok(request.bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;
        tracing::debug!(status = %response.status(), what, "Response received");

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(text);
        bail!("{} failed ({}): {}", what, status, message)
    }

    async fn json(&self, request: RequestBuilder, what: &str) -> Result<Value> {
        let response = self.send(request, what).await?;
        response
            .json()
            .await
            .with_context(|| format!("Invalid {} response", what))
    }

    pub async fn health(&self) -> Result<Value> {
        self.json(self.http.get(self.url("/api/health")), "health")
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Value> {
        let request = self
            .http
            .post(self.url("/api/admin/login"))
            .json(&json!({ "username": username, "password": password }));
        self.json(request, "login").await
    }

    pub async fn me(&self) -> Result<Value> {
        let request = self.authorized(self.http.get(self.url("/api/admin/me")))?;
        self.json(request, "me").await
    }

    pub async fn entries(&self, scope: &str) -> Result<Value> {
        let request = self.authorized(
            self.http
                .get(self.url("/api/admin/entries"))
                .query(&[("scope", scope)]),
        )?;
        self.json(request, "entries").await
    }

    pub async fn submissions(&self, scope: &str) -> Result<Value> {
        let request = self.authorized(
            self.http
                .get(self.url("/api/admin/submissions"))
                .query(&[("scope", scope)]),
        )?;
        self.json(request, "submissions").await
    }

    pub async fn verify(&self, id: i64, reviewer: &str) -> Result<Value> {
        let request = self.authorized(
            self.http
                .post(self.url(&format!("/api/admin/submissions/{}/verify", id)))
                .json(&json!({ "reviewerName": reviewer })),
        )?;
        self.json(request, "verify").await
    }

    pub async fn reject(&self, id: i64, reviewer: &str) -> Result<Value> {
        let request = self.authorized(
            self.http
                .delete(self.url(&format!("/api/admin/submissions/{}", id)))
                .json(&json!({ "reviewerName": reviewer })),
        )?;
        self.json(request, "reject").await
    }

    /// Download an export; returns the bytes.
    pub async fn export(&self, scope: &str, format: &str) -> Result<Vec<u8>> {
        let path = match format {
            "csv" => "/api/admin/download-csv",
            _ => "/api/admin/download-excel",
        };
        let request = self.authorized(self.http.get(self.url(path)).query(&[("scope", scope)]))?;
        let response = self.send(request, "export").await?;
        let bytes = response.bytes().await.context("Failed to read export body")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = AdminClient::new("http://localhost:3001/", None);
        assert_eq!(client.url("/api/health"), "http://localhost:3001/api/health");
    }

    #[test]
    fn test_admin_calls_need_token() {
        let client = AdminClient::new("http://localhost:3001", None);
        let request = client.http.get(client.url("/api/admin/me"));
        assert!(client.authorized(request).is_err());
    }
}
