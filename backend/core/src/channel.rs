use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::message::IncomingMessage;

/// Default buffer size for the inbound event channel.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// Channel carrying inbound chat events from the platform adapter to the
/// response router.
///
/// Built on a bounded Tokio mpsc channel, so a flooded router applies
/// backpressure to the adapter instead of growing without limit.
pub struct EventBus {
    pub inbound_tx: mpsc::Sender<IncomingMessage>,
    pub inbound_rx: Option<mpsc::Receiver<IncomingMessage>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer: usize) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(buffer);
        info!(buffer_size = buffer, "EventBus initialized");
        Self {
            inbound_tx,
            inbound_rx: Some(inbound_rx),
        }
    }

    /// Take the inbound receiver (can only be called once).
    pub fn take_inbound_rx(&mut self) -> Option<mpsc::Receiver<IncomingMessage>> {
        debug!("Inbound receiver taken");
        self.inbound_rx.take()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
