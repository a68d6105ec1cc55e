//! Hourly trend buckets derived from a post batch.
//!
//! Buckets are keyed by bare hour-of-day, so posts from different calendar
//! days that share an hour number land in the same bucket.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::posts::Post;
use crate::sentiment::SentimentDistribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    /// Hour of day, 0–23.
    pub hour: u8,
    pub counts: SentimentDistribution,
}

/// Groups `posts` by the hour-of-day of their creation timestamp and counts
/// labels within each group.
///
/// Returns one bucket per distinct hour present, sorted by hour. Pure: the
/// same input always produces the same output.
#[must_use]
pub fn compute_trend_buckets(posts: &[Post]) -> Vec<TrendBucket> {
    let mut by_hour: BTreeMap<u8, SentimentDistribution> = BTreeMap::new();
    for post in posts {
        by_hour
            .entry(post.hour_of_day())
            .or_default()
            .increment(post.label());
    }

    by_hour
        .into_iter()
        .map(|(hour, counts)| TrendBucket { hour, counts })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::posts::SentimentResult;
    use crate::sentiment::SentimentLabel;

    fn post(id: &str, created_at: &str, label: SentimentLabel) -> Post {
        Post {
            id: id.to_string(),
            content: format!("content of {id}"),
            source: None,
            author: None,
            created_at: DateTime::parse_from_rfc3339(created_at).expect("valid timestamp"),
            sentiment: SentimentResult {
                label,
                confidence: Some(0.9),
                emotion: None,
                model_name: None,
            },
        }
    }

    fn sample_batch() -> Vec<Post> {
        vec![
            post("a", "2025-03-01T10:05:00Z", SentimentLabel::Positive),
            post("b", "2025-03-01T14:40:00Z", SentimentLabel::Neutral),
            post("c", "2025-03-01T10:59:59Z", SentimentLabel::Negative),
        ]
    }

    #[test]
    fn empty_batch_yields_no_buckets() {
        assert!(compute_trend_buckets(&[]).is_empty());
    }

    #[test]
    fn two_hours_produce_two_buckets() {
        let buckets = compute_trend_buckets(&sample_batch());
        assert_eq!(
            buckets,
            vec![
                TrendBucket {
                    hour: 10,
                    counts: SentimentDistribution::new(1, 1, 0),
                },
                TrendBucket {
                    hour: 14,
                    counts: SentimentDistribution::new(0, 0, 1),
                },
            ]
        );
    }

    #[test]
    fn computation_is_idempotent() {
        let batch = sample_batch();
        assert_eq!(compute_trend_buckets(&batch), compute_trend_buckets(&batch));
    }

    #[test]
    fn bucket_totals_equal_batch_length() {
        let mut batch = sample_batch();
        batch.push(post("d", "2025-03-01T00:00:00Z", SentimentLabel::Positive));
        batch.push(post("e", "2025-03-01T23:59:00Z", SentimentLabel::Negative));
        batch.push(post("f", "2025-03-01T23:01:00Z", SentimentLabel::Negative));

        let total: u64 = compute_trend_buckets(&batch)
            .iter()
            .map(|b| b.counts.total())
            .sum();
        assert_eq!(total, batch.len() as u64);
    }

    #[test]
    fn same_hour_on_different_days_shares_a_bucket() {
        let batch = vec![
            post("a", "2025-03-01T09:00:00Z", SentimentLabel::Positive),
            post("b", "2025-03-02T09:30:00Z", SentimentLabel::Positive),
        ];
        let buckets = compute_trend_buckets(&batch);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].hour, 9);
        assert_eq!(buckets[0].counts.positive, 2);
    }

    #[test]
    fn buckets_are_sorted_by_hour_regardless_of_input_order() {
        let batch = vec![
            post("a", "2025-03-01T22:00:00Z", SentimentLabel::Neutral),
            post("b", "2025-03-01T03:00:00Z", SentimentLabel::Neutral),
            post("c", "2025-03-01T12:00:00Z", SentimentLabel::Neutral),
        ];
        let hours: Vec<u8> = compute_trend_buckets(&batch)
            .iter()
            .map(|b| b.hour)
            .collect();
        assert_eq!(hours, vec![3, 12, 22]);
    }
}
