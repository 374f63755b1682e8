//! `case` and `cond`.
//!
//! `case` applies an ordered clause list to one subject through `defmatch`.
//! `cond` evaluates conditions in order and runs the body of the first
//! truthy one; conditions after it are never evaluated.

use forma_patterns::{defmatch, Clause};
use forma_value::{no_condition_true, FormResult, Value};

/// Match `subject` against `clauses` and run the first accepting handler.
///
/// Fails with `NoClauseMatch` carrying `subject` when no clause accepts it.
#[tracing::instrument(level = "trace", skip_all, fields(clauses = clauses.len()))]
pub fn case(subject: &Value, clauses: &[Clause<'_>]) -> FormResult {
    defmatch(clauses).call(subject)
}

/// The condition of one `cond` clause.
pub enum Condition<'a> {
    /// An already computed value.
    Value(Value),
    /// Evaluated only when every earlier condition was falsy.
    Lazy(Box<dyn FnOnce() -> FormResult + 'a>),
}

impl Condition<'_> {
    fn evaluate(self) -> FormResult {
        match self {
            Condition::Value(value) => Ok(value),
            Condition::Lazy(f) => f(),
        }
    }
}

impl From<Value> for Condition<'_> {
    fn from(value: Value) -> Self {
        Condition::Value(value)
    }
}

impl From<bool> for Condition<'_> {
    fn from(b: bool) -> Self {
        Condition::Value(Value::Bool(b))
    }
}

impl std::fmt::Debug for Condition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Condition::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// One `condition -> body` branch of a `cond`.
pub struct CondClause<'a> {
    condition: Condition<'a>,
    body: Box<dyn FnOnce() -> FormResult + 'a>,
}

impl<'a> CondClause<'a> {
    pub fn new(
        condition: impl Into<Condition<'a>>,
        body: impl FnOnce() -> FormResult + 'a,
    ) -> Self {
        CondClause {
            condition: condition.into(),
            body: Box::new(body),
        }
    }

    /// A clause whose condition is computed on demand.
    pub fn when(
        condition: impl FnOnce() -> FormResult + 'a,
        body: impl FnOnce() -> FormResult + 'a,
    ) -> Self {
        CondClause {
            condition: Condition::Lazy(Box::new(condition)),
            body: Box::new(body),
        }
    }
}

/// Run the body of the first clause whose condition is truthy.
///
/// Only `nil` and `false` are falsy. A failing condition propagates and
/// stops evaluation. Fails with `NoConditionTrue` when every condition is
/// falsy, including for an empty clause list.
#[tracing::instrument(level = "trace", skip_all)]
pub fn cond<'a>(clauses: impl IntoIterator<Item = CondClause<'a>>) -> FormResult {
    for (index, clause) in clauses.into_iter().enumerate() {
        if clause.condition.evaluate()?.is_truthy() {
            tracing::trace!(clause = index, "cond condition truthy");
            return (clause.body)();
        }
    }
    Err(no_condition_true())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap to panic on unexpected state and count calls"
)]
