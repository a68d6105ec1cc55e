//! Sentiment labels, per-label counts, and the percentage breakdown shown by
//! the distribution chart.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post counts keyed by sentiment label.
///
/// Used both for the server's distribution snapshot and for the per-hour
/// counts inside a trend bucket. Absent labels deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    #[serde(default)]
    pub neutral: u64,
}

impl SentimentDistribution {
    #[must_use]
    pub fn new(positive: u64, negative: u64, neutral: u64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Sum of the three counts, saturating at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.positive
            .saturating_add(self.negative)
            .saturating_add(self.neutral)
    }

    #[must_use]
    pub fn count(&self, label: SentimentLabel) -> u64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn increment(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive = self.positive.saturating_add(1),
            SentimentLabel::Negative => self.negative = self.negative.saturating_add(1),
            SentimentLabel::Neutral => self.neutral = self.neutral.saturating_add(1),
        }
    }
}

/// Relative share of each label, in percent, or an explicit empty state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentageBreakdown {
    /// The distribution total is zero; there is nothing to chart.
    NoData,
    Shares {
        positive: f64,
        negative: f64,
        neutral: f64,
    },
}

impl PercentageBreakdown {
    /// Share for one label; `None` for the empty state.
    #[must_use]
    pub fn share(&self, label: SentimentLabel) -> Option<f64> {
        match self {
            PercentageBreakdown::NoData => None,
            PercentageBreakdown::Shares {
                positive,
                negative,
                neutral,
            } => Some(match label {
                SentimentLabel::Positive => *positive,
                SentimentLabel::Negative => *negative,
                SentimentLabel::Neutral => *neutral,
            }),
        }
    }
}

/// Computes each label's share of the total as `100 * count / total`,
/// rounded to two decimal places (half away from zero).
///
/// A zero total yields [`PercentageBreakdown::NoData`] rather than dividing.
#[must_use]
pub fn compute_percentage_breakdown(distribution: &SentimentDistribution) -> PercentageBreakdown {
    // Summed wide so counts near `u64::MAX` still yield exact proportions.
    let total = u128::from(distribution.positive)
        + u128::from(distribution.negative)
        + u128::from(distribution.neutral);
    if total == 0 {
        return PercentageBreakdown::NoData;
    }

    #[allow(clippy::cast_precision_loss)]
    let share = |count: u64| round_2dp(100.0 * count as f64 / total as f64);

    PercentageBreakdown::Shares {
        positive: share(distribution.positive),
        negative: share(distribution.negative),
        neutral: share(distribution.neutral),
    }
}

/// `f64::round` rounds half away from zero, which is the rounding we want.
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
