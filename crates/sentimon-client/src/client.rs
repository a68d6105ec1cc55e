//! HTTP client for the sentiment platform REST API.
//!
//! Wraps `reqwest` with typed response decoding, non-2xx status mapping, and
//! optional retry on transient failures.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use sentimon_core::{AppConfig, Post};

use crate::error::ClientError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{
    AggregatePeriod, AggregateReport, AlertsPage, DistributionSnapshot, HealthReport,
    MetricsReport, PostsPage, RawPostsPage,
};

/// Client for the sentiment REST API.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client rooted at `base_url` with retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash makes `Url::join` append to the base path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ClientError::InvalidUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Builds a client from application configuration, including its retry policy.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(
            Self::new(&config.api_url, config.request_timeout_secs, &config.user_agent)?
                .with_retry(config.max_retries, config.retry_backoff_base_ms),
        )
    }

    /// Enables retry on transient failures: up to `max_retries` extra attempts
    /// with exponential back-off starting at `backoff_base_ms`.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy {
            max_retries,
            backoff_base_ms,
        };
        self
    }

    /// Fetches the sentiment distribution over the last `hours` hours
    /// (server default 24 when `None`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_distribution(
        &self,
        hours: Option<u32>,
    ) -> Result<DistributionSnapshot, ClientError> {
        let hours_param = hours.map(|h| h.to_string());
        let mut query = Vec::new();
        if let Some(h) = &hours_param {
            query.push(("hours", h.as_str()));
        }
        let url = self.build_url("api/sentiment/distribution", &query)?;
        self.get_json(&url, "sentiment/distribution").await
    }

    /// Fetches one page of the most recent analyzed posts.
    ///
    /// Posts that fail to decode (unknown label, unparseable timestamp) are
    /// logged and skipped rather than failing the page.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the envelope does not match the expected shape.
    pub async fn get_posts(&self, limit: u32, offset: u32) -> Result<PostsPage, ClientError> {
        let limit_param = limit.to_string();
        let offset_param = offset.to_string();
        let url = self.build_url(
            "api/posts",
            &[("limit", &limit_param), ("offset", &offset_param)],
        )?;
        let raw: RawPostsPage = self
            .get_json(&url, &format!("posts(limit={limit}, offset={offset})"))
            .await?;

        let received = raw.posts.len();
        let posts: Vec<Post> = raw
            .posts
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Post>(value) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable post");
                    None
                }
            })
            .collect();
        if posts.len() != received {
            tracing::debug!(received, kept = posts.len(), "dropped undecodable posts");
        }

        Ok(PostsPage {
            posts,
            total: raw.total,
            limit: raw.limit,
            offset: raw.offset,
        })
    }

    /// Fetches the server-side sentiment trend, bucketed by `period`.
    ///
    /// The server defaults `end` to now and `start` to 24 hours before `end`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_distribution`].
    pub async fn get_aggregate(
        &self,
        period: AggregatePeriod,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<AggregateReport, ClientError> {
        let start_param = start.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
        let end_param = end.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
        let mut query = vec![("period", period.as_str())];
        if let Some(s) = &start_param {
            query.push(("start_date", s.as_str()));
        }
        if let Some(e) = &end_param {
            query.push(("end_date", e.as_str()));
        }
        let url = self.build_url("api/sentiment/aggregate", &query)?;
        self.get_json(&url, &format!("sentiment/aggregate(period={period})"))
            .await
    }

    /// Fetches processing metrics: totals, the last hour's breakdown, and
    /// model usage.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_distribution`].
    pub async fn get_metrics(&self) -> Result<MetricsReport, ClientError> {
        let url = self.build_url("api/metrics", &[])?;
        self.get_json(&url, "metrics").await
    }

    /// Fetches the backend health report.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_distribution`].
    pub async fn get_health(&self) -> Result<HealthReport, ClientError> {
        let url = self.build_url("api/health", &[])?;
        self.get_json(&url, "health").await
    }

    /// Fetches triggered alerts, newest first, optionally filtered by type.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_distribution`].
    pub async fn get_alerts(
        &self,
        limit: u32,
        offset: u32,
        alert_type: Option<&str>,
    ) -> Result<AlertsPage, ClientError> {
        let limit_param = limit.to_string();
        let offset_param = offset.to_string();
        let mut query = vec![("limit", limit_param.as_str()), ("offset", offset_param.as_str())];
        if let Some(kind) = alert_type {
            query.push(("alert_type", kind));
        }
        let url = self.build_url("api/alerts", &query)?;
        self.get_json(&url, "alerts").await
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("'{path}': {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET (with the configured retry policy), requires a 2xx status,
    /// and decodes the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = retry_with_backoff(self.retry, context, || async move {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(response.text().await?)
        })
        .await?;

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
