//! Channel-backed dispatch sink.
//!
//! Lets the interceptor feed actions into a pipeline that consumes them from
//! a tokio channel (e.g. a store's background loop).

use http_lifecycle_core::{Action, Dispatch};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Sends dispatched actions into an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelDispatcher {
    action_tx: UnboundedSender<Action>,
}

impl ChannelDispatcher {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    /// Create a dispatcher and the receiver its actions arrive on.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = unbounded_channel();
        (Self::new(action_tx), action_rx)
    }
}

impl Dispatch for ChannelDispatcher {
    fn dispatch(&self, action: Action) {
        if let Err(e) = self.action_tx.send(action) {
            tracing::warn!(
                action_type = %e.0.action_type,
                "Dispatch channel closed, dropping action"
            );
        }
    }
}
