//! Metric names recorded by the [`Store`](crate::Store).
//!
//! The store only talks to the `metrics` facade. Nothing is exported unless
//! the host application installs a recorder.

use metrics::{describe_counter, describe_histogram, Unit};
use std::sync::Once;

/// Actions accepted by `dispatch`
pub const ACTIONS_TOTAL: &str = "store.actions.total";
/// Actions rejected because the store is shutting down
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";
/// Time spent inside the reducer per action
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";
/// Number of effects returned per action
pub const EFFECTS_COUNT: &str = "store.effects.count";
/// Effects started, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";
/// Subscriber notifications sent
pub const NOTIFICATIONS_TOTAL: &str = "store.subscribers.notified";

static DESCRIBE: Once = Once::new();

/// Register descriptions for every store metric.
///
/// Safe to call repeatedly; descriptions are only registered once.
pub fn describe_store_metrics() {
    DESCRIBE.call_once(|| {
        describe_counter!(ACTIONS_TOTAL, "Actions dispatched to the store");
        describe_counter!(ACTIONS_REJECTED, "Actions rejected during shutdown");
        describe_histogram!(
            REDUCER_DURATION,
            Unit::Seconds,
            "Reducer execution time per action"
        );
        describe_histogram!(EFFECTS_COUNT, "Effects returned by the reducer per action");
        describe_counter!(EFFECTS_EXECUTED, "Effects started by the store");
        describe_counter!(NOTIFICATIONS_TOTAL, "State notifications delivered to subscribers");
    });
}
