//! Cross-thread posting onto the owning context.
//!
//! The bus itself is single-threaded. Worker threads (e.g. a GPU completion
//! callback or a screen-capture thread) never touch view state directly;
//! they post a [`Signal`] through a [`SignalPoster`] and the owning context
//! delivers it on its next [`SignalBus::pump`](super::SignalBus::pump).
//!
//! Uses a multi-producer, single-consumer (mpsc) channel internally.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::types::Signal;

/// Receiving side, owned by the bus.
pub(crate) struct SignalInbox {
    sender: Sender<Signal>,
    receiver: Receiver<Signal>,
}

impl SignalInbox {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub(crate) fn poster(&self) -> SignalPoster {
        SignalPoster {
            sender: self.sender.clone(),
        }
    }

    /// Drain all pending signals into a Vec.
    ///
    /// Collecting first lets the caller publish without holding any borrow
    /// of the inbox, so handlers may post again; those land in the next
    /// drain.
    pub(crate) fn drain(&self) -> Vec<Signal> {
        let mut signals = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(signal) => signals.push(signal),
                Err(TryRecvError::Empty) => break,
                // The inbox holds a sender itself, so this cannot happen
                // while the bus is alive.
                Err(TryRecvError::Disconnected) => break,
            }
        }
        signals
    }
}

/// A cloneable, thread-safe handle for posting signals to a bus.
///
/// Cloning a poster is cheap (just clones the internal Sender).
#[derive(Clone)]
pub struct SignalPoster {
    sender: Sender<Signal>,
}

impl SignalPoster {
    /// Queue a signal for delivery on the owning context.
    ///
    /// Non-blocking. Returns `false` if the bus has been dropped, in which
    /// case the signal is discarded.
    pub fn post(&self, signal: Signal) -> bool {
        self.sender.send(signal).is_ok()
    }
}
