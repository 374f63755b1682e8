//! Mailbox for selective receive.
//!
//! Messages are delivered over an unbounded MPSC channel and moved into an
//! ordered pending queue when the owner looks at the mailbox. Matching
//! happens on the pending queue, so a receive can take any message out of
//! the middle while the rest keep their arrival order.

use std::collections::VecDeque;
use std::time::Instant;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use forma_value::Value;

/// The receiving end of a mailbox, owned by one unit of execution.
#[derive(Debug)]
pub struct Mailbox {
    pending: VecDeque<Value>,
    rx: Receiver<Value>,
}

/// Outcome of waiting for a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wait {
    /// A message was appended to the pending queue.
    Delivered,
    TimedOut,
    /// Every sender was dropped and the channel is empty.
    Closed,
}

impl Mailbox {
    /// Creates a new mailbox, returning the mailbox and its sender.
    pub fn new() -> (Self, MailboxSender) {
        let (tx, rx) = channel::unbounded();
        (
            Self {
                pending: VecDeque::new(),
                rx,
            },
            MailboxSender { tx },
        )
    }

    /// All pending messages in arrival order.
    pub fn peek_all(&mut self) -> impl ExactSizeIterator<Item = &Value> + '_ {
        self.drain();
        self.pending.iter()
    }

    /// Remove and return the pending message at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        self.pending.remove(index)
    }

    /// Number of pending messages, including ones delivered since the last look.
    pub fn len(&mut self) -> usize {
        self.drain();
        self.pending.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    pub(crate) fn pending(&self) -> &VecDeque<Value> {
        &self.pending
    }

    /// Move every delivered message into the pending queue without blocking.
    pub(crate) fn drain(&mut self) {
        self.pending.extend(self.rx.try_iter());
    }

    /// Block until one more message is delivered or `deadline` passes.
    /// `None` waits without a deadline.
    pub(crate) fn wait(&mut self, deadline: Option<Instant>) -> Wait {
        let received = match deadline {
            Some(deadline) => self.rx.recv_deadline(deadline).map_err(|e| match e {
                RecvTimeoutError::Timeout => Wait::TimedOut,
                RecvTimeoutError::Disconnected => Wait::Closed,
            }),
            None => self.rx.recv().map_err(|_| Wait::Closed),
        };
        match received {
            Ok(message) => {
                self.pending.push_back(message);
                Wait::Delivered
            }
            Err(wait) => wait,
        }
    }
}

/// The sending end of a mailbox.
///
/// This can be cloned and handed to other threads to send messages to the
/// mailbox owner.
#[derive(Clone, Debug)]
pub struct MailboxSender {
    tx: Sender<Value>,
}

impl MailboxSender {
    /// Sends a message to the mailbox.
    ///
    /// Returns `Err(message)` if the mailbox was dropped.
    pub fn send(&self, message: Value) -> Result<(), Value> {
        self.tx.send(message).map_err(|e| e.into_inner())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap to panic on unexpected state and compute deadlines"
)]
