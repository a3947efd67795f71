//=========================================================================
// Event Source
//=========================================================================
//
// Pull interface over whatever produces native events.
//
// Architecture:
//   backend thread / test ──► Sender<NativeEvent> ──► ChannelSource ──► Context
//
// `poll` never blocks; `wait` blocks until an event arrives and fails
// only when every producer is gone.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::error;

//=== Internal Dependencies ===============================================

use super::interface::NativeEvent;
use crate::core::error::{Error, Result};

//=== EventSource =========================================================

/// Producer of native events, in arrival order.
pub trait EventSource {
    /// Next queued event, if any, without blocking.
    fn poll(&mut self) -> Option<NativeEvent>;

    /// Next event, blocking until one is available.
    fn wait(&mut self) -> Result<NativeEvent>;
}

//=== ChannelSource =======================================================

/// Event source fed through a crossbeam channel.
pub struct ChannelSource {
    receiver: Receiver<NativeEvent>,
}

impl ChannelSource {
    pub fn new(receiver: Receiver<NativeEvent>) -> Self {
        Self { receiver }
    }

    /// Events currently queued.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl EventSource for ChannelSource {
    fn poll(&mut self) -> Option<NativeEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn wait(&mut self) -> Result<NativeEvent> {
        self.receiver.recv().map_err(|_| {
            error!(target: "platform", "Native event source disconnected");
            Error::SourceDisconnected
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
