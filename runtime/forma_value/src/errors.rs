//! Failure types raised through the special forms.
//!
//! A `Failure` is what travels along the `Err` side of every form. It carries:
//! - a structured `FailureKind` for programmatic matching,
//! - a human-readable message (always `kind.to_string()`),
//! - the raw payload `Value` a `catch` handler receives,
//! - an optional explicit reason.
//!
//! Factory functions (`no_clause_match`, `raise`, `throw`, ...) are the public
//! construction API. They populate `kind`, `message` and `payload` together.
//!
//! # Reasons
//!
//! A raised value may expose its semantic cause in a `__reason` field (a map
//! entry keyed by the string or atom `__reason`), or the failure may be built
//! with an explicit reason via `Failure::with_reason`. `Failure::rescued`
//! resolves the reason once and returns an immutable `FailureWithReason`;
//! neither the failure nor its payload is modified.

use std::fmt;

use crate::property::call_property;
use crate::value::Value;

/// Result of running a form or one of its handlers.
pub type FormResult<T = Value> = Result<T, Failure>;

/// Field name under which a raised value exposes its reason.
pub const REASON_KEY: &str = "__reason";

/// How a failure was raised, in the source language's terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaiseKind {
    /// `raise` (an error/exception).
    Error,
    /// `throw` (a non-local return of a value).
    Throw,
    /// `exit` (a unit of execution terminating).
    Exit,
}

impl RaiseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RaiseKind::Error => "error",
            RaiseKind::Throw => "throw",
            RaiseKind::Exit => "exit",
        }
    }
}

/// Typed failure category.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FailureKind {
    // Dispatch
    /// No clause of a compiled matcher accepted the value.
    #[error("no clause matching: {value}")]
    NoClauseMatch { value: Value },
    /// Every `cond` condition was falsy.
    #[error("no cond clause evaluated to a truthy value")]
    NoConditionTrue,
    /// A single pattern did not match (`pattern = value`).
    #[error("no match of right hand side value: {value}")]
    BadMatch { value: Value },

    // Exception combinator
    /// The `else` clauses of a `try` did not match the block's result.
    #[error("no match found in else: {value}")]
    NoMatchInElse { value: Value },

    // User raised
    #[error("{} {value}", .kind.as_str())]
    Raised { kind: RaiseKind, value: Value },

    // Collector protocol
    #[error("{type_name} is not collectable")]
    NotCollectable { type_name: &'static str },
    #[error("cannot collect {value} into a {target}")]
    InvalidCollectElement { target: &'static str, value: Value },

    // Property access
    #[error("property {name} not found in {item}")]
    PropertyNotFound { name: String, item: Value },

    // Mailbox
    /// Every sender is gone and the receive has no timeout.
    #[error("mailbox closed while waiting for a message")]
    MailboxClosed,
}

/// A failure raised through a form.
#[derive(Clone, Debug, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
    /// The raw failure value handed to `catch`.
    pub payload: Value,
    reason: Option<Value>,
}

impl Failure {
    fn from_kind(kind: FailureKind, payload: Value) -> Self {
        let message = kind.to_string();
        Failure {
            kind,
            message,
            payload,
            reason: None,
        }
    }

    /// Attach an explicit reason, taking priority over a `__reason` field.
    #[must_use]
    pub fn with_reason(mut self, reason: Value) -> Self {
        self.reason = Some(reason);
        self
    }

    /// The semantic cause, if the failure exposes one.
    pub fn reason(&self) -> Option<Value> {
        self.reason
            .clone()
            .or_else(|| call_property(&self.payload, REASON_KEY).ok())
    }

    /// Normalize this failure for a `rescue` handler.
    ///
    /// The reason is the exposed reason when there is one, otherwise the
    /// payload itself.
    pub fn rescued(self) -> FailureWithReason {
        let reason = self.reason().unwrap_or_else(|| self.payload.clone());
        FailureWithReason {
            original: self,
            reason,
        }
    }

    /// Whether this failure means "a pattern did not match".
    ///
    /// The `else` branch of a `try` reclassifies exactly these.
    pub fn is_match_error(&self) -> bool {
        matches!(
            self.kind,
            FailureKind::NoClauseMatch { .. } | FailureKind::BadMatch { .. }
        )
    }

    /// The raise kind, for failures created by `raise`/`throw`/`exit`.
    pub fn raise_kind(&self) -> Option<RaiseKind> {
        match self.kind {
            FailureKind::Raised { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// A failure paired with its normalized reason, as seen by `rescue`.
///
/// Built once by `Failure::rescued` and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureWithReason {
    pub original: Failure,
    pub reason: Value,
}

// Dispatch Failures

/// No clause matched `value`.
#[cold]
pub fn no_clause_match(value: Value) -> Failure {
    let payload = Value::tuple(vec![Value::atom("no_clause_match"), value.clone()]);
    Failure::from_kind(FailureKind::NoClauseMatch { value }, payload)
}

/// Every `cond` condition was falsy.
#[cold]
pub fn no_condition_true() -> Failure {
    Failure::from_kind(FailureKind::NoConditionTrue, Value::atom("no_condition_true"))
}

/// A single pattern did not match `value`.
#[cold]
pub fn bad_match(value: Value) -> Failure {
    let payload = Value::tuple(vec![Value::atom("badmatch"), value.clone()]);
    Failure::from_kind(FailureKind::BadMatch { value }, payload)
}

/// The `else` clauses of a `try` did not match `value`.
#[cold]
pub fn no_match_in_else(value: Value) -> Failure {
    let payload = Value::tuple(vec![Value::atom("try_else_clause"), value.clone()]);
    Failure::from_kind(FailureKind::NoMatchInElse { value }, payload)
}

// User-raised Failures

/// Raise `value` as an error.
#[cold]
pub fn raise(value: Value) -> Failure {
    raised(RaiseKind::Error, value)
}

/// Throw `value`.
#[cold]
pub fn throw(value: Value) -> Failure {
    raised(RaiseKind::Throw, value)
}

/// Exit with `reason`.
#[cold]
pub fn exit(reason: Value) -> Failure {
    raised(RaiseKind::Exit, reason)
}

fn raised(kind: RaiseKind, value: Value) -> Failure {
    Failure::from_kind(
        FailureKind::Raised {
            kind,
            value: value.clone(),
        },
        value,
    )
}

// Collector Failures

/// The collect target is not a collectable value.
#[cold]
pub fn not_collectable(target: &Value) -> Failure {
    Failure::from_kind(
        FailureKind::NotCollectable {
            type_name: target.type_name(),
        },
        target.clone(),
    )
}

/// `value` cannot be stored into a collect target of kind `target`.
#[cold]
pub fn invalid_collect_element(target: &'static str, value: Value) -> Failure {
    Failure::from_kind(
        FailureKind::InvalidCollectElement {
            target,
            value: value.clone(),
        },
        value,
    )
}

// Property Failures

/// `item` has no property `name`.
#[cold]
pub fn property_not_found(name: &str, item: &Value) -> Failure {
    Failure::from_kind(
        FailureKind::PropertyNotFound {
            name: name.to_string(),
            item: item.clone(),
        },
        Value::tuple(vec![Value::atom("property_not_found"), Value::string(name)]),
    )
}

// Mailbox Failures

/// The mailbox lost all senders while a receive was waiting forever.
#[cold]
pub fn mailbox_closed() -> Failure {
    Failure::from_kind(FailureKind::MailboxClosed, Value::atom("mailbox_closed"))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
