#![deny(clippy::arithmetic_side_effects)]
//! Forma Value - runtime values for the forma special-forms runtime.
//!
//! This crate provides:
//! - Immutable runtime values (`Value`, `Heap`, `MapKey`) that patterns match against
//! - Interned atoms (`Atom`)
//! - Failure types (`Failure`, `FailureKind`, `FailureWithReason`, `FormResult`)
//! - Named property lookup (`call_property`)
//!
//! # Value Types
//!
//! All heap allocations go through `Value::` factory methods; `Heap<T>`
//! enforces this invariant and makes every value cheap to clone and safe to
//! send to another thread's mailbox.

mod atom;
mod errors;
mod property;
mod value;

pub use atom::Atom;
pub use errors::{
    Failure, FailureKind, FailureWithReason, FormResult, RaiseKind, REASON_KEY,
};
pub use property::call_property;
pub use value::{Heap, MapKey, Value};

// Re-export failure constructors for use by other crates
pub use errors::{
    // Dispatch
    bad_match,
    // User raised
    exit,
    // Collector protocol
    invalid_collect_element,
    // Mailbox
    mailbox_closed,
    no_clause_match,
    no_condition_true,
    // Exception combinator
    no_match_in_else,
    not_collectable,
    // Property access
    property_not_found,
    raise,
    throw,
};
