//! Analyzed posts as returned by the posts endpoint.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

use crate::sentiment::SentimentLabel;

/// Sentiment assigned to a post by the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "post_id", alias = "id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Creation time. Timestamps without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<FixedOffset>,
    pub sentiment: SentimentResult,
}

impl Post {
    #[must_use]
    pub fn label(&self) -> SentimentLabel {
        self.sentiment.label
    }

    /// Hour-of-day (0–23) of `created_at`, in the timestamp's own offset.
    #[must_use]
    pub fn hour_of_day(&self) -> u8 {
        // `hour()` is always < 24.
        #[allow(clippy::cast_possible_truncation)]
        let hour = self.created_at.hour() as u8;
        hour
    }
}

/// Parses RFC 3339 timestamps, falling back to naive ISO 8601 (as emitted by
/// the backend for `timestamp without time zone` columns) interpreted as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp '{raw}'")))
}
