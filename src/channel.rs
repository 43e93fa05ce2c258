//! Outbound side of the realtime channel.
//!
//! The view never talks to a transport directly; it pushes typed
//! [`Outbound`] events into whatever [`EventSink`] the host injected.

use tokio::sync::mpsc::UnboundedSender;

use crate::error::GridError;
use crate::event::Outbound;

/// Receiver of events the view emits.
pub trait EventSink {
    /// Push one event to the channel.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ChannelClosed`] when the transport has gone away.
    fn push(&mut self, event: Outbound) -> Result<(), GridError>;
}

/// Collects events in memory, in emission order.
impl EventSink for Vec<Outbound> {
    fn push(&mut self, event: Outbound) -> Result<(), GridError> {
        Vec::push(self, event);
        Ok(())
    }
}

/// Forwards events to a task draining the receiving half.
impl EventSink for UnboundedSender<Outbound> {
    fn push(&mut self, event: Outbound) -> Result<(), GridError> {
        self.send(event).map_err(|_| GridError::ChannelClosed)
    }
}
