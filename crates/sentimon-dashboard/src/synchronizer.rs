//! Mount/unmount lifecycle and the single-writer event loop.
//!
//! [`Dashboard::mount`] starts three independent producers (distribution
//! fetch, posts fetch, push channel) and one event loop that owns the
//! [`DashboardState`]. Producers send [`DashboardEvent`]s over an unbounded
//! queue; the loop applies them in arrival order and publishes a fresh
//! [`DashboardView`] on a `watch` channel after each change.
//!
//! Unmount stops the loop, closes the push channel, and drops the queue
//! receiver, so fetches that complete later have nowhere to deliver and are
//! discarded.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use sentimon_client::{ApiClient, ChannelSignal, PushChannel};
use sentimon_core::AppConfig;

use crate::state::{DashboardEvent, DashboardState, DashboardView};

const DEFAULT_POSTS_LIMIT: u32 = 20;
const DEFAULT_DISTRIBUTION_HOURS: u32 = 24;

/// What to fetch on mount and where the push channel lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub ws_url: String,
    pub posts_limit: u32,
    pub posts_offset: u32,
    /// Look-back window for the distribution; `None` lets the server decide.
    pub distribution_hours: Option<u32>,
}

impl DashboardOptions {
    /// Options with the standard dashboard defaults: 20 most recent posts and
    /// a 24 hour distribution window.
    #[must_use]
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            posts_limit: DEFAULT_POSTS_LIMIT,
            posts_offset: 0,
            distribution_hours: Some(DEFAULT_DISTRIBUTION_HOURS),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            ws_url: config.ws_url.clone(),
            posts_limit: config.posts_limit,
            posts_offset: 0,
            distribution_hours: Some(config.distribution_hours),
        }
    }
}

/// A mounted dashboard.
///
/// Holds the push channel (through its task) for as long as it is mounted.
/// Prefer [`Dashboard::unmount`], which waits for the channel to close;
/// dropping the handle also stops the loop but does not wait.
pub struct Dashboard {
    view_rx: watch::Receiver<DashboardView>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    event_loop: Option<JoinHandle<()>>,
}

impl Dashboard {
    /// Mounts the dashboard: issues both REST fetches concurrently, opens the
    /// push channel, and starts the event loop.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn mount(client: Arc<ApiClient>, options: DashboardOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(DashboardView::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (channel_stop_tx, channel_stop_rx) = oneshot::channel();

        tracing::info!(
            ws_url = %options.ws_url,
            posts_limit = options.posts_limit,
            distribution_hours = ?options.distribution_hours,
            "mounting dashboard"
        );

        spawn_distribution_fetch(
            Arc::clone(&client),
            options.distribution_hours,
            events_tx.clone(),
        );
        spawn_posts_fetch(
            client,
            options.posts_limit,
            options.posts_offset,
            events_tx.clone(),
        );
        let channel_task = tokio::spawn(run_push_channel(
            options.ws_url,
            events_tx,
            channel_stop_rx,
        ));

        let event_loop = tokio::spawn(run_event_loop(
            events_rx,
            view_tx,
            shutdown_rx,
            channel_stop_tx,
            channel_task,
        ));

        Self {
            view_rx,
            shutdown_tx: Some(shutdown_tx),
            event_loop: Some(event_loop),
        }
    }

    /// The most recently published view.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.view_rx.borrow().clone()
    }

    /// A receiver notified after every view change. It keeps returning the
    /// last view after unmount.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view_rx.clone()
    }

    /// Stops the event loop and waits until the push channel is closed. No
    /// state changes are published after this returns.
    pub async fn unmount(mut self) {
        self.signal_shutdown();
        if let Some(handle) = self.event_loop.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "dashboard event loop ended abnormally");
            }
        }
        tracing::info!("dashboard unmounted");
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The loop may already be gone if its task panicked.
            let _ = tx.send(());
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

fn spawn_distribution_fetch(
    client: Arc<ApiClient>,
    hours: Option<u32>,
    events: mpsc::UnboundedSender<DashboardEvent>,
) {
    tokio::spawn(async move {
        let result = client
            .get_distribution(hours)
            .await
            .map(|snapshot| snapshot.distribution);
        if events.send(DashboardEvent::Distribution(result)).is_err() {
            tracing::debug!("distribution arrived after unmount, discarded");
        }
    });
}

fn spawn_posts_fetch(
    client: Arc<ApiClient>,
    limit: u32,
    offset: u32,
    events: mpsc::UnboundedSender<DashboardEvent>,
) {
    tokio::spawn(async move {
        let result = client.get_posts(limit, offset).await.map(|page| page.posts);
        if events.send(DashboardEvent::Posts(result)).is_err() {
            tracing::debug!("posts arrived after unmount, discarded");
        }
    });
}

/// Opens the push channel once and forwards its signals until it ends or
/// `stop` fires. Never reconnects.
async fn run_push_channel(
    url: String,
    events: mpsc::UnboundedSender<DashboardEvent>,
    mut stop: oneshot::Receiver<()>,
) {
    let mut channel = tokio::select! {
        _ = &mut stop => return,
        result = PushChannel::connect(&url) => match result {
            Ok(channel) => channel,
            Err(e) => {
                let _ = events.send(DashboardEvent::Channel(ChannelSignal::Error(e.to_string())));
                return;
            }
        },
    };

    loop {
        tokio::select! {
            _ = &mut stop => break,
            signal = channel.next_signal() => {
                let terminal = matches!(signal, ChannelSignal::Closed | ChannelSignal::Error(_));
                if events.send(DashboardEvent::Channel(signal)).is_err() || terminal {
                    break;
                }
            }
        }
    }

    if let Err(e) = channel.close().await {
        tracing::debug!(error = %e, "push channel close failed");
    }
}

async fn run_event_loop(
    mut events: mpsc::UnboundedReceiver<DashboardEvent>,
    view_tx: watch::Sender<DashboardView>,
    mut shutdown: oneshot::Receiver<()>,
    channel_stop: oneshot::Sender<()>,
    channel_task: JoinHandle<()>,
) {
    let mut state = DashboardState::default();

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            Some(event) = events.recv() => {
                if state.apply(event, Utc::now()) {
                    view_tx.send_replace(state.view().clone());
                }
            }
        }
    }

    // Dropping the receiver first makes any in-flight producer's send fail.
    drop(events);
    let _ = channel_stop.send(());
    if let Err(e) = channel_task.await {
        tracing::error!(error = %e, "push channel task ended abnormally");
    }
}
