//! Dashboard state synchronizer.
//!
//! Bootstraps a view of the sentiment platform from two REST snapshots
//! (distribution and recent posts) and tracks push channel liveness. All
//! state lives in one event-loop task; fetches and the channel deliver their
//! results to it through a queue, so there is exactly one writer.

pub mod state;
pub mod synchronizer;

pub use state::{DashboardEvent, DashboardState, DashboardView};
pub use synchronizer::{Dashboard, DashboardOptions};
