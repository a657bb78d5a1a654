//! UI queue - Hop from background threads onto the UI context.
//!
//! Proxies, coordinators and views are `!Send` and must only be touched on
//! the UI context. Background work sends plain data through a [`UiSender`];
//! the UI context drains the [`UiQueue`] and applies it.
//!
//! ```text
//! worker thread ──try_send(msg)──┐
//! worker thread ──try_send(msg)──┼─→ bounded mpsc ─→ UiQueue::drain(handler)
//! worker thread ──send(msg)──────┘
//! ```
//!
//! The queue does not check which thread calls into the bridge. Calling a
//! proxy from the wrong context is a caller bug; the type system already
//! rules out moving one to another thread.

use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::time::Duration;

use tracing::trace;

use crate::error::{HostError, Result};

use super::config::HostConfig;

/// Receiving end, pinned to the UI context.
pub struct UiQueue<M> {
    rx: Receiver<M>,
    capacity: usize,
    // Rc makes the queue !Send
    _ui_context: PhantomData<Rc<()>>,
}

/// Sending end. Clone it freely and move it to any thread.
pub struct UiSender<M> {
    tx: SyncSender<M>,
}

impl<M> UiQueue<M> {
    /// Create a queue holding up to `capacity` undelivered messages.
    pub fn new(capacity: usize) -> (Self, UiSender<M>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (
            Self {
                rx,
                capacity,
                _ui_context: PhantomData,
            },
            UiSender { tx },
        )
    }

    pub fn from_config(config: &HostConfig) -> (Self, UiSender<M>) {
        Self::new(config.queue_capacity)
    }

    /// Deliver pending messages to `handler` without blocking.
    ///
    /// Delivers at most `capacity` messages per call, so producers that keep
    /// refilling the queue cannot hold the UI context here. Returns the
    /// number of messages delivered.
    pub fn drain(&self, mut handler: impl FnMut(M)) -> usize {
        let limit = self.capacity.max(1);
        let mut delivered = 0;
        while delivered < limit {
            match self.rx.try_recv() {
                Ok(message) => {
                    handler(message);
                    delivered += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if delivered > 0 {
            trace!(delivered, "drained UI queue");
        }
        delivered
    }

    /// Block until a message arrives.
    ///
    /// Fails with [`HostError::QueueClosed`] once every sender is gone and
    /// the queue is empty.
    pub fn recv(&self) -> Result<M> {
        self.rx.recv().map_err(|_| HostError::QueueClosed)
    }

    /// Block for at most `timeout`. `Ok(None)` means nothing arrived.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<M>> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(HostError::QueueClosed),
        }
    }
}

impl<M> UiSender<M> {
    /// Queue `message` without blocking.
    pub fn try_send(&self, message: M) -> Result<()> {
        self.tx.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => HostError::QueueFull,
            TrySendError::Disconnected(_) => HostError::QueueClosed,
        })
    }

    /// Queue `message`, waiting while the queue is full.
    pub fn send(&self, message: M) -> Result<()> {
        self.tx.send(message).map_err(|_| HostError::QueueClosed)
    }
}

impl<M> Clone for UiSender<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
