//! Plain-text rendering of dashboard state for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use sentimon_client::{AggregateReport, Alert, HealthReport, MetricsReport};
use sentimon_core::{
    compute_percentage_breakdown, ConnectionStatus, PercentageBreakdown, Post,
    SentimentDistribution, SentimentLabel, TrendBucket,
};
use sentimon_dashboard::DashboardView;

const CONTENT_WIDTH: usize = 60;

pub(crate) fn render_status(
    status: ConnectionStatus,
    last_update: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    match last_update {
        Some(at) => {
            let ago = (now - at).num_seconds().max(0);
            format!("status: {status} (last update {ago}s ago)")
        }
        None => format!("status: {status}"),
    }
}

pub(crate) fn render_breakdown(distribution: &SentimentDistribution) -> String {
    match compute_percentage_breakdown(distribution) {
        PercentageBreakdown::NoData => "no data".to_string(),
        breakdown @ PercentageBreakdown::Shares { .. } => {
            let mut out = String::new();
            for label in SentimentLabel::ALL {
                let share = breakdown.share(label).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<10}{:>8}{:>9.2}%",
                    label.as_str(),
                    distribution.count(label),
                    share
                );
            }
            out.trim_end().to_string()
        }
    }
}

pub(crate) fn render_trend(buckets: &[TrendBucket]) -> String {
    if buckets.is_empty() {
        return "no posts".to_string();
    }
    let mut out = format!("{:<8}{:>6}{:>6}{:>6}", "HOUR", "POS", "NEG", "NEU");
    for bucket in buckets {
        let _ = write!(
            out,
            "\n{:<8}{:>6}{:>6}{:>6}",
            format!("{:02}:00", bucket.hour),
            bucket.counts.positive,
            bucket.counts.negative,
            bucket.counts.neutral
        );
    }
    out
}

pub(crate) fn render_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "no posts".to_string();
    }
    let mut out = format!("{:<18}{:<10}{:<7}CONTENT", "CREATED", "LABEL", "CONF");
    for post in posts {
        let confidence = post
            .sentiment
            .confidence
            .map_or_else(|| "-".to_string(), |c| format!("{c:.2}"));
        let _ = write!(
            out,
            "\n{:<18}{:<10}{:<7}{}",
            post.created_at.format("%Y-%m-%d %H:%M"),
            post.label().as_str(),
            confidence,
            truncate(&post.content, CONTENT_WIDTH)
        );
    }
    out
}

pub(crate) fn render_view(view: &DashboardView, now: DateTime<Utc>) -> String {
    let mut sections = vec![render_status(view.status, view.last_update, now)];

    sections.push(format!(
        "DISTRIBUTION\n{}",
        render_breakdown(&view.distribution)
    ));
    if let Some(e) = &view.distribution_error {
        sections.push(format!("! distribution fetch failed: {e}"));
    }

    sections.push(format!("HOURLY TREND\n{}", render_trend(&view.trend)));
    sections.push(format!("RECENT POSTS\n{}", render_posts(&view.posts)));
    if let Some(e) = &view.posts_error {
        sections.push(format!("! posts fetch failed: {e}"));
    }

    sections.join("\n\n")
}

pub(crate) fn render_health(report: &HealthReport) -> String {
    format!(
        "status:    {}\ndatabase:  {}\nredis:     {}\nposts:     {}\nanalyses:  {}\nlast hour: {}",
        report.status,
        report.services.database,
        report.services.redis,
        report.stats.total_posts,
        report.stats.total_analyses,
        report.stats.recent_posts_1h
    )
}

pub(crate) fn render_alerts(alerts: &[Alert]) -> String {
    let mut out = format!(
        "{:<8}{:<24}{:<22}{:>10}{:>10}",
        "ID", "TYPE", "TRIGGERED", "THRESHOLD", "ACTUAL"
    );
    let fmt_value = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
    for alert in alerts {
        let _ = write!(
            out,
            "\n{:<8}{:<24}{:<22}{:>10}{:>10}",
            alert.id,
            truncate(&alert.alert_type, 23),
            truncate(&alert.triggered_at, 21),
            fmt_value(alert.threshold_value),
            fmt_value(alert.actual_value)
        );
    }
    out
}

pub(crate) fn render_aggregate(report: &AggregateReport) -> String {
    let mut out = format!(
        "{:<21}{:>6}{:>6}{:>6}{:>7}{:>8}{:>7}",
        "TIME", "POS", "NEG", "NEU", "TOTAL", "NEG%", "CONF"
    );
    for bucket in &report.data {
        let negative_share = compute_percentage_breakdown(&bucket.counts())
            .share(SentimentLabel::Negative)
            .map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
        let _ = write!(
            out,
            "\n{:<21}{:>6}{:>6}{:>6}{:>7}{:>8}{:>7.2}",
            truncate(&bucket.timestamp, 20),
            bucket.positive_count,
            bucket.negative_count,
            bucket.neutral_count,
            bucket.total_count,
            negative_share,
            bucket.average_confidence
        );
    }
    let summary = &report.summary;
    let _ = write!(
        out,
        "\n\n{} posts: {} positive, {} negative, {} neutral",
        summary.total_posts, summary.positive_total, summary.negative_total, summary.neutral_total
    );
    out
}

pub(crate) fn render_metrics(metrics: &MetricsReport) -> String {
    let mut out = format!(
        "posts:     {}\nanalyses:  {}\nalerts:    {}\n\nLAST HOUR ({} processed, avg confidence {:.2})\n{}",
        metrics.totals.posts,
        metrics.totals.analyses,
        metrics.totals.alerts,
        metrics.last_hour.total_processed,
        metrics.last_hour.avg_confidence,
        render_breakdown(&metrics.last_hour.sentiment_breakdown)
    );
    if !metrics.models.is_empty() {
        let _ = write!(out, "\n\n{:<30}{:>8}", "MODEL", "USES");
        for model in &metrics.models {
            let _ = write!(
                out,
                "\n{:<30}{:>8}",
                truncate(model.name.as_deref().unwrap_or("(unnamed)"), 29),
                model.usage_count
            );
        }
    }
    out
}

/// Cuts `text` to at most `max` characters on a char boundary, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
