//! Clauses and compiled multi-clause matchers.
//!
//! A `Clause` is a (pattern, optional guard, handler) triple. `defmatch`
//! turns an ordered clause list into a single matcher: the first clause whose
//! pattern matches and whose guard passes wins, and its handler receives the
//! bound values.

use forma_value::{no_clause_match, FormResult, Value};

use crate::matching::{match_value, Bindings, Guard, MatchOutcome};
use crate::pattern::Pattern;

/// Handler invoked with the bound values of a matched clause.
pub type Handler<'a> = dyn Fn(&[Value]) -> FormResult + 'a;

/// One branch of a dispatch.
pub struct Clause<'a> {
    pattern: Pattern,
    guard: Option<Box<Guard<'a>>>,
    body: Box<Handler<'a>>,
}

impl<'a> Clause<'a> {
    pub fn new(pattern: Pattern, body: impl Fn(&[Value]) -> FormResult + 'a) -> Self {
        Clause {
            pattern,
            guard: None,
            body: Box::new(body),
        }
    }

    /// Gate this clause on a guard over its bound values.
    #[must_use]
    pub fn when(mut self, guard: impl Fn(&[Value]) -> bool + 'a) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Match this clause's pattern and guard without running the handler.
    pub fn try_match(&self, value: &Value) -> MatchOutcome {
        match_value(&self.pattern, value, self.guard.as_deref())
    }

    /// Run the handler with previously bound values.
    pub fn invoke(&self, bound: &[Value]) -> FormResult {
        (self.body)(bound)
    }
}

impl std::fmt::Debug for Clause<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clause")
            .field("pattern", &self.pattern)
            .field("guarded", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

/// An ordered clause list compiled into one matcher.
#[derive(Clone, Copy, Debug)]
pub struct Defmatch<'c, 'a> {
    clauses: &'c [Clause<'a>],
}

/// Compile `clauses` into a matcher. Order is significant: first match wins.
pub fn defmatch<'c, 'a>(clauses: &'c [Clause<'a>]) -> Defmatch<'c, 'a> {
    Defmatch { clauses }
}

impl<'c, 'a> Defmatch<'c, 'a> {
    /// Find the first clause accepting `value`, without running it.
    pub fn find(&self, value: &Value) -> Option<(&'c Clause<'a>, Bindings)> {
        self.clauses.iter().enumerate().find_map(|(index, clause)| {
            let bindings = clause.try_match(value).into_bound()?;
            tracing::trace!(clause = index, %value, "clause matched");
            Some((clause, bindings))
        })
    }

    /// Apply the matcher. Fails with `NoClauseMatch` when no clause accepts
    /// `value`; handler failures propagate unchanged.
    pub fn call(&self, value: &Value) -> FormResult {
        match self.find(value) {
            Some((clause, bindings)) => clause.invoke(&bindings),
            None => Err(no_clause_match(value.clone())),
        }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Apply `clauses` to `value` as one compiled matcher.
pub fn match_any(clauses: &[Clause<'_>], value: &Value) -> FormResult {
    defmatch(clauses).call(value)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap to panic on unexpected state and count calls"
)]
mod tests;
