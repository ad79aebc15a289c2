//! Remote session store client
//!
//! Writes one JSON document per finished session to a cloud collection over
//! HTTP. Identity comes from config, with anonymous sign-in as fallback.
//! A failed save is logged and returned to the caller; the session stays
//! available in the local export for a retry, so nothing is retried here.

use crate::domain::session::SessionSummary;
use crate::infra::config::Config;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// One recorded pose inside the session document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseEntry {
    pub name: String,
    pub time: String,
    pub confidence: f64,
}

/// The document written to the remote collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub user_id: String,
    /// ISO 8601 session date
    pub date: String,
    /// "MM:SS"
    pub duration: String,
    pub total_poses: u64,
    /// Compact best-pose form, e.g. "Warrior"
    pub best_pose: String,
    /// "NN%"
    pub avg_confidence: String,
    pub poses: Vec<PoseEntry>,
}

impl SessionDocument {
    pub fn from_summary(user_id: &str, summary: &SessionSummary) -> Self {
        let best_pose = summary
            .stats
            .best_pose
            .as_deref()
            .and_then(|label| label.split_whitespace().next())
            .unwrap_or("-")
            .to_string();

        Self {
            user_id: user_id.to_string(),
            date: chrono::DateTime::from_timestamp_millis(summary.ended_at as i64)
                .unwrap_or_default()
                .to_rfc3339(),
            duration: summary.duration_mm_ss(),
            total_poses: summary.stats.count,
            best_pose,
            avg_confidence: format!("{}%", summary.stats.avg_confidence_pct()),
            poses: summary
                .poses
                .iter()
                .map(|p| PoseEntry {
                    name: p.name.clone(),
                    time: p.time.clone(),
                    confidence: p.confidence,
                })
                .collect(),
        }
    }
}

/// Anonymous sign-in response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnonymousIdentity {
    local_id: String,
}

/// Client for the remote session collection
pub struct CloudClient {
    base_url: String,
    collection: String,
    api_key: Option<String>,
    user_id: Option<String>,
    auth_url: Option<String>,
    http_client: reqwest::Client,
    #[cfg(test)]
    mock_enabled: bool,
}

impl CloudClient {
    pub fn new(config: &Config) -> Self {
        let timeout = Duration::from_millis(config.cloud_timeout_ms());

        // Create HTTP client once for reuse (connection pooling)
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.cloud_base_url().trim_end_matches('/').to_string(),
            collection: config.cloud_collection().to_string(),
            api_key: config.cloud_api_key().map(str::to_string),
            user_id: config.cloud_user_id().map(str::to_string),
            auth_url: config.cloud_auth_url().map(str::to_string),
            http_client,
            #[cfg(test)]
            mock_enabled: true,
        }
    }

    /// Write one session document. Returns the signed-in user id on success.
    pub async fn save_session(&self, summary: &SessionSummary) -> anyhow::Result<String> {
        let start = Instant::now();

        let user_id = self.resolve_user().await?;
        let document = SessionDocument::from_summary(&user_id, summary);

        #[cfg(test)]
        if self.mock_enabled {
            info!(
                sid = %summary.sid,
                user_id = %user_id,
                mock = true,
                "cloud_save_ok"
            );
            return Ok(user_id);
        }

        let mut url = format!("{}/{}", self.base_url, self.collection);
        if let Some(key) = &self.api_key {
            url = format!("{url}?key={key}");
        }

        let response = self
            .http_client
            .post(&url)
            .json(&document)
            .send()
            .await
            .context("cloud request failed")?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            error!(
                sid = %summary.sid,
                status = %status.as_u16(),
                latency_ms = %latency_ms,
                "cloud_save_rejected"
            );
            anyhow::bail!("cloud save rejected with status {}", status.as_u16());
        }

        info!(
            sid = %summary.sid,
            user_id = %user_id,
            status = %status.as_u16(),
            latency_ms = %latency_ms,
            "cloud_save_ok"
        );

        Ok(user_id)
    }

    /// Resolve the identity to save under: the configured user, else an
    /// anonymous sign-in against the auth endpoint
    async fn resolve_user(&self) -> anyhow::Result<String> {
        if let Some(user_id) = &self.user_id {
            return Ok(user_id.clone());
        }

        let Some(auth_url) = &self.auth_url else {
            anyhow::bail!("no user id configured and no auth endpoint for anonymous sign-in");
        };

        #[cfg(test)]
        if self.mock_enabled {
            return Ok("anonymous-mock".to_string());
        }

        let mut url = auth_url.clone();
        if let Some(key) = &self.api_key {
            url = format!("{url}?key={key}");
        }

        let identity: AnonymousIdentity = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "returnSecureToken": true }))
            .send()
            .await
            .context("anonymous sign-in request failed")?
            .error_for_status()
            .context("anonymous sign-in rejected")?
            .json()
            .await
            .context("anonymous sign-in response malformed")?;

        info!(user_id = %identity.local_id, "anonymous_sign_in");
        Ok(identity.local_id)
    }
}
