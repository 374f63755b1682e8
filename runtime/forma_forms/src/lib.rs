#![deny(clippy::arithmetic_side_effects)]
//! Forma Forms - the special forms of the forma runtime.
//!
//! This crate provides one engine per special form, all built on the
//! matching facade in `forma_patterns`:
//! - `case` and `cond` (dispatch)
//! - `for` comprehensions over generators into a collectable (`comprehend`)
//! - `try` with rescue/catch/else/after (`Try`)
//! - `with` binding pipelines (`With`)
//! - selective `receive` over a mailbox (`Receive`, `Mailbox`)
//!
//! # Failures
//!
//! Every engine returns `FormResult`. Failures raised by user handlers
//! propagate unchanged; the engines raise their own failures only through
//! the `forma_value` factory functions.
//!
//! # Tracing
//!
//! Engines emit `tracing` events at `trace`/`debug` level. Call
//! [`init_tracing`] and set `RUST_LOG=forma_forms=debug` to see them.

mod binding;
mod collectable;
mod comprehension;
mod dispatch;
mod exception;
mod mailbox;
mod receive;

pub use binding::With;
pub use collectable::{Collect, Collectable, StepFn, ValueCollectable};
pub use comprehension::{comprehend, ForExpr, Generator};
pub use dispatch::{case, cond, CondClause, Condition};
pub use exception::Try;
pub use mailbox::{Mailbox, MailboxSender};
pub use receive::{receive, Receive, Timeout};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for the engines' spans and events.
///
/// Does nothing unless `RUST_LOG` holds a valid filter, for example
/// `RUST_LOG=forma_forms=debug`. Only the first call can install the
/// subscriber; later calls return immediately.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}
