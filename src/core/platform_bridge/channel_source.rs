//=========================================================================
// Channel Event Source
//=========================================================================
//
// `EventSource` backed by a crossbeam channel.
//
// Architecture:
//   host glue thread ──Sender<PlatformEvent>──► ChannelEventSource
//                                                  └─ poll_event(timeout)
//
// The receiving side lives on the game loop thread; producers can live on
// any thread. Disconnection of every sender is reported as a platform
// error because the loop can never be woken again.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{
    unbounded, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError,
};
use log::trace;

//=== Internal Dependencies ===============================================

use super::{EventSource, PlatformError, PlatformEvent};

//=== ChannelEventSource ==================================================

/// Event source fed through a channel.
#[derive(Debug)]
pub struct ChannelEventSource {
    receiver: Receiver<PlatformEvent>,
}

impl ChannelEventSource {
    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self { receiver }
    }

    /// Creates an unbounded channel and returns both ends.
    pub fn channel() -> (Sender<PlatformEvent>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self::new(rx))
    }

    /// Number of events waiting to be polled.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl EventSource for ChannelEventSource {
    fn poll_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<PlatformEvent>, PlatformError> {
        let event = match timeout {
            None => match self.receiver.recv() {
                Ok(event) => Some(event),
                Err(RecvError) => return Err(PlatformError::Disconnected),
            },
            Some(timeout) if timeout.is_zero() => match self.receiver.try_recv() {
                Ok(event) => Some(event),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => return Err(PlatformError::Disconnected),
            },
            Some(timeout) => match self.receiver.recv_timeout(timeout) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return Err(PlatformError::Disconnected),
            },
        };

        if let Some(event) = &event {
            trace!(target: "platform", "Polled {:?}", event);
        }
        Ok(event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
