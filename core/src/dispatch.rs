//! Dispatch sink seam.

use crate::action::Action;

/// Injects an action into the dispatch pipeline.
///
/// Called synchronously for request-phase notifications and from spawned
/// tasks for completions, so implementations must tolerate concurrent calls
/// in any order.
pub trait Dispatch: Send + Sync {
    /// Dispatch one action.
    fn dispatch(&self, action: Action);
}

impl<F> Dispatch for F
where
    F: Fn(Action) + Send + Sync,
{
    fn dispatch(&self, action: Action) {
        self(action);
    }
}
