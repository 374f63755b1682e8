//! Selective receive.
//!
//! A receive scans the mailbox oldest message first, trying every clause
//! against each message; the first message some clause accepts is removed
//! and that clause's handler runs. Messages no clause accepts stay in the
//! mailbox in their original order.
//!
//! When nothing matches, the receive blocks until a new message arrives or
//! the timeout elapses. Messages already scanned are not scanned again; a
//! delivery only triggers a scan of the new messages.

use std::time::{Duration, Instant};

use forma_patterns::{defmatch, Bindings, Clause};
use forma_value::{mailbox_closed, FormResult, Value};

use crate::mailbox::{Mailbox, Wait};

/// How long a receive waits for a matching message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeout {
    After(Duration),
    Infinity,
}

impl Default for Timeout {
    /// Check the messages already delivered, then give up.
    fn default() -> Self {
        Timeout::After(Duration::ZERO)
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::After(duration)
    }
}

/// A `receive` expression.
pub struct Receive<'r, 'a> {
    clauses: &'r [Clause<'a>],
    timeout: Timeout,
    on_timeout: Option<Box<dyn FnOnce() -> FormResult + 'r>>,
}

impl<'r, 'a> Receive<'r, 'a> {
    /// A receive over `clauses` with the default timeout. On timeout it
    /// evaluates to `true`.
    pub fn new(clauses: &'r [Clause<'a>]) -> Self {
        Receive {
            clauses,
            timeout: Timeout::default(),
            on_timeout: None,
        }
    }

    /// Give up after `timeout` and run `on_timeout` instead.
    #[must_use]
    pub fn after(
        mut self,
        timeout: impl Into<Timeout>,
        on_timeout: impl FnOnce() -> FormResult + 'r,
    ) -> Self {
        self.timeout = timeout.into();
        self.on_timeout = Some(Box::new(on_timeout));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait until a message matches, however long it takes.
    #[must_use]
    pub fn forever(self) -> Self {
        self.with_timeout(Timeout::Infinity)
    }

    /// Run the receive against `mailbox`.
    ///
    /// If every sender is dropped while waiting, no message can arrive: a
    /// finite timeout runs the timeout handler immediately, and
    /// `Timeout::Infinity` fails with `MailboxClosed`.
    #[tracing::instrument(level = "debug", skip_all, fields(clauses = self.clauses.len()))]
    pub fn run(self, mailbox: &mut Mailbox) -> FormResult {
        // Outer `Some` marks a finite timeout. A deadline past the end of
        // `Instant` waits without one.
        let deadline = match self.timeout {
            Timeout::After(duration) => Some(Instant::now().checked_add(duration)),
            Timeout::Infinity => None,
        };

        let mut scanned = 0;
        loop {
            mailbox.drain();
            if let Some((index, clause, bindings)) =
                find_match(mailbox, scanned, self.clauses)
            {
                mailbox.remove_at(index);
                tracing::trace!(index, "message received");
                return clause.invoke(&bindings);
            }
            scanned = mailbox.pending().len();

            tracing::debug!(pending = scanned, "receive suspended");
            match mailbox.wait(deadline.flatten()) {
                Wait::Delivered => {}
                Wait::TimedOut => break,
                Wait::Closed => {
                    tracing::debug!(pending = scanned, "mailbox closed");
                    if deadline.is_some() {
                        break;
                    }
                    return Err(mailbox_closed());
                }
            }
        }

        tracing::debug!(pending = scanned, "receive timed out");
        match self.on_timeout {
            Some(on_timeout) => on_timeout(),
            None => Ok(Value::Bool(true)),
        }
    }
}

impl std::fmt::Debug for Receive<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receive")
            .field("clauses", &self.clauses.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// The first pending message at or after `from` that a clause accepts.
fn find_match<'r, 'a>(
    mailbox: &Mailbox,
    from: usize,
    clauses: &'r [Clause<'a>],
) -> Option<(usize, &'r Clause<'a>, Bindings)> {
    let matcher = defmatch(clauses);
    mailbox
        .pending()
        .iter()
        .enumerate()
        .skip(from)
        .find_map(|(index, message)| {
            let (clause, bindings) = matcher.find(message)?;
            Some((index, clause, bindings))
        })
}

/// Receive from `mailbox` with the default timeout and timeout handler.
pub fn receive(mailbox: &mut Mailbox, clauses: &[Clause<'_>]) -> FormResult {
    Receive::new(clauses).run(mailbox)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
