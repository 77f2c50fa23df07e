//! The send side of a notification channel.
//!
//! [`Transport`] is the seam between the registry and the network: the
//! registry only needs to know whether a channel is open, how to hand it a
//! text frame, and how to be told when it closes. [`ChannelTransport`] is
//! the production implementation; it queues frames on a bounded channel
//! drained by the socket task in [`super::connection`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Callback fired once when a transport closes.
pub type CloseObserver = Box<dyn FnOnce() + Send + 'static>;

/// Open/closed state as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Frames can be sent.
    Open,
    /// The peer is gone; sends are refused.
    Closed,
}

/// Why a frame was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The transport has closed.
    #[error("transport closed")]
    Closed,
    /// The outbound queue is full.
    #[error("outbound buffer full")]
    Full,
}

/// A one-way text channel to a connected client.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Current state.
    fn state(&self) -> TransportState;

    /// Hands a text frame to the transport without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] if the frame could not be queued.
    fn send(&self, message: &str) -> Result<(), SendError>;

    /// Registers `observer` to run once when the transport closes. If it is
    /// already closed the observer runs immediately.
    fn on_close(&self, observer: CloseObserver);
}

/// [`Transport`] backed by a bounded `mpsc` queue.
pub struct ChannelTransport {
    tx: mpsc::Sender<String>,
    closed: AtomicBool,
    observers: Mutex<Vec<CloseObserver>>,
}

impl fmt::Debug for ChannelTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTransport")
            .field("closed", &self.closed.load(Ordering::Acquire))
            .field("queued", &(self.tx.max_capacity() - self.tx.capacity()))
            .finish_non_exhaustive()
    }
}

impl ChannelTransport {
    /// Creates a transport and the receiver the socket task drains.
    ///
    /// `buffer` is clamped to at least 1.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                tx,
                closed: AtomicBool::new(false),
                observers: Mutex::new(Vec::new()),
            },
            rx,
        )
    }

    /// Marks the transport closed and fires every registered observer.
    /// Subsequent calls do nothing.
    pub fn close(&self) {
        let observers = {
            let mut guard = self
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if self.closed.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut *guard)
        };
        for observer in observers {
            observer();
        }
    }
}

impl Transport for ChannelTransport {
    fn state(&self) -> TransportState {
        if self.closed.load(Ordering::Acquire) || self.tx.is_closed() {
            TransportState::Closed
        } else {
            TransportState::Open
        }
    }

    fn send(&self, message: &str) -> Result<(), SendError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SendError::Closed);
        }
        self.tx.try_send(message.to_owned()).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }

    fn on_close(&self, observer: CloseObserver) {
        {
            let mut guard = self
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !self.closed.load(Ordering::Acquire) {
                guard.push(observer);
                return;
            }
        }
        observer();
    }
}
