//! HTTP client for the Atelier moderation API.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Default server URL when neither --server nor ATELIER_SERVER_URL is set.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Listing as returned by the API.
#[derive(Debug, Deserialize)]
pub struct ListingView {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub moderation_status: String,
    pub moderation_reason: Option<String>,
    #[serde(default)]
    pub moderation_logs: Vec<AuditLogView>,
    pub is_flagged: bool,
    pub revision: i64,
    pub updated_at: DateTime<Utc>,
}

/// Audit trail entry as returned by the API.
#[derive(Debug, Deserialize)]
pub struct AuditLogView {
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub status: String,
    pub reason: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HealthView {
    pub status: String,
    pub version: String,
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyView {
    pub ready: bool,
    pub catalog: String,
    pub classifier: String,
    pub message: Option<String>,
}

/// Error body the server returns on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[allow(dead_code)]
    code: Option<String>,
}

/// Thin client over the moderation endpoints.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn health(&self) -> Result<HealthView> {
        self.get_json("/health").await
    }

    pub async fn ready(&self) -> Result<ReadyView> {
        self.get_json("/ready").await
    }

    pub async fn queue(&self) -> Result<Vec<ListingView>> {
        self.get_json("/moderation/queue").await
    }

    pub async fn listing(&self, id: Uuid) -> Result<ListingView> {
        self.get_json(&format!("/listings/{}", id)).await
    }

    pub async fn review(&self, id: Uuid, verdict: &str, reason: &str) -> Result<ListingView> {
        self.post_json(
            &format!("/moderation/{}/action", id),
            &serde_json::json!({ "verdict": verdict, "reason": reason }),
        )
        .await
    }

    pub async fn report(&self, id: Uuid, reason: &str) -> Result<ListingView> {
        self.post_json(
            &format!("/listings/{}/report", id),
            &serde_json::json!({ "reason": reason }),
        )
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        Self::parse(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .context("Failed to parse server response");
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        bail!("Server returned {}: {}", status.as_u16(), message);
    }
}
