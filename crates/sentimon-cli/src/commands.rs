//! Command handlers.

use std::sync::Arc;

use chrono::{Duration, Utc};

use sentimon_client::{AggregatePeriod, ApiClient};
use sentimon_core::compute_trend_buckets;
use sentimon_dashboard::{Dashboard, DashboardOptions};

use crate::render;

/// Mount the dashboard and redraw on every view change until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed or the
/// dashboard's event loop stops on its own.
pub(crate) async fn run_watch(
    client: Arc<ApiClient>,
    options: DashboardOptions,
) -> anyhow::Result<()> {
    let dashboard = Dashboard::mount(client, options);
    let mut rx = dashboard.subscribe();

    println!("{}", render::render_view(&rx.borrow_and_update(), Utc::now()));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            result = &mut ctrl_c => break result.map_err(anyhow::Error::from),
            changed = rx.changed() => {
                if changed.is_err() {
                    break Err(anyhow::anyhow!("dashboard stopped unexpectedly"));
                }
                let view = rx.borrow_and_update().clone();
                println!("{}", render::render_view(&view, Utc::now()));
            }
        }
    };

    dashboard.unmount().await;
    outcome
}

/// Fetch the distribution and the posts page once, concurrently, and print
/// whatever succeeded. A failed fetch is reported inline, not as an error.
pub(crate) async fn run_snapshot(client: &ApiClient, options: &DashboardOptions) {
    let (distribution, posts) = tokio::join!(
        client.get_distribution(options.distribution_hours),
        client.get_posts(options.posts_limit, options.posts_offset),
    );

    match distribution {
        Ok(snapshot) => {
            println!("DISTRIBUTION (last {}h)", snapshot.timeframe_hours);
            println!("{}", render::render_breakdown(&snapshot.distribution));
        }
        Err(e) => {
            tracing::warn!(error = %e, "distribution fetch failed");
            println!("distribution unavailable: {e}");
        }
    }

    match posts {
        Ok(page) => {
            println!("HOURLY TREND");
            println!("{}", render::render_trend(&compute_trend_buckets(&page.posts)));
            println!("RECENT POSTS ({} of {})", page.posts.len(), page.total);
            println!("{}", render::render_posts(&page.posts));
        }
        Err(e) => {
            tracing::warn!(error = %e, "posts fetch failed");
            println!("posts unavailable: {e}");
        }
    }
}

/// Print the server-side trend for the last `hours` hours.
///
/// # Errors
///
/// Returns an error if the aggregate endpoint cannot be reached or decoded.
pub(crate) async fn run_trend(
    client: &ApiClient,
    period: AggregatePeriod,
    hours: u32,
) -> anyhow::Result<()> {
    let end = Utc::now();
    let start = end - Duration::hours(i64::from(hours));
    let report = client.get_aggregate(period, Some(start), Some(end)).await?;
    println!(
        "SENTIMENT BY {} ({} to {})",
        report.period.as_str().to_uppercase(),
        report.start_date,
        report.end_date
    );
    println!("{}", render::render_aggregate(&report));
    Ok(())
}

/// Print processing metrics.
///
/// # Errors
///
/// Returns an error if the metrics endpoint cannot be reached or decoded.
pub(crate) async fn run_metrics(client: &ApiClient) -> anyhow::Result<()> {
    let metrics = client.get_metrics().await?;
    println!("{}", render::render_metrics(&metrics));
    Ok(())
}

/// Print the backend health report.
///
/// # Errors
///
/// Returns an error if the health endpoint cannot be reached or decoded.
pub(crate) async fn run_health(client: &ApiClient) -> anyhow::Result<()> {
    let report = client.get_health().await?;
    println!("{}", render::render_health(&report));
    Ok(())
}

/// Print the most recent triggered alerts.
///
/// # Errors
///
/// Returns an error if the alerts endpoint cannot be reached or decoded.
pub(crate) async fn run_alerts(
    client: &ApiClient,
    limit: u32,
    alert_type: Option<&str>,
) -> anyhow::Result<()> {
    let page = client.get_alerts(limit, 0, alert_type).await?;
    if page.alerts.is_empty() {
        println!(
            "no alerts found{}",
            alert_type
                .map(|t| format!(" of type '{t}'"))
                .unwrap_or_default()
        );
        return Ok(());
    }
    println!("{}", render::render_alerts(&page.alerts));
    Ok(())
}
