#![deny(clippy::arithmetic_side_effects)]
//! Forma Patterns - the structural matching facade.
//!
//! This crate provides:
//! - Pattern descriptors (`Pattern`)
//! - The matching primitive (`match_value`, `match_strict`, `MatchOutcome`)
//! - Clauses and compiled multi-clause matchers (`Clause`, `defmatch`, `match_any`)
//!
//! # Architecture
//!
//! Every special form talks to matching through this crate only. Patterns
//! bind positionally: a successful match yields exactly
//! `pattern.capture_count()` values in left-to-right capture order, and
//! guards and handlers receive those values as a slice.

mod clause;
mod matching;
mod pattern;

pub use clause::{defmatch, match_any, Clause, Defmatch, Handler};
pub use matching::{match_strict, match_value, Bindings, Guard, MatchOutcome};
pub use pattern::{Alternatives, Pattern, UnevenAlternatives};
