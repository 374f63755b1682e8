//! `with` binding pipelines.
//!
//! Steps run in order. Each step receives every value bound so far and its
//! result is matched against the step's pattern; the captures are appended
//! to the accumulated bindings. The first mismatch short-circuits: the
//! mismatched value goes to the `else` branch, or is returned as-is when
//! there is none. When every step matches, the success handler receives
//! all bindings.

use forma_patterns::{match_value, Bindings, Clause, Pattern};
use forma_value::{FormResult, Value};

use crate::dispatch::case;

struct Step<'a> {
    pattern: Pattern,
    guard: Option<Box<dyn Fn(&[Value]) -> bool + 'a>>,
    run: Box<dyn FnOnce(&[Value]) -> FormResult + 'a>,
}

/// A `with` expression.
#[derive(Default)]
pub struct With<'a> {
    steps: Vec<Step<'a>>,
    else_branch: Option<Box<dyn FnOnce(Value) -> FormResult + 'a>>,
}

impl<'a> With<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `pattern <- run(bindings)`.
    #[must_use]
    pub fn step(self, pattern: Pattern, run: impl FnOnce(&[Value]) -> FormResult + 'a) -> Self {
        self.push(pattern, None, Box::new(run))
    }

    /// Add `pattern when guard <- run(bindings)`. The guard sees only this
    /// step's captures.
    #[must_use]
    pub fn step_when(
        self,
        pattern: Pattern,
        guard: impl Fn(&[Value]) -> bool + 'a,
        run: impl FnOnce(&[Value]) -> FormResult + 'a,
    ) -> Self {
        self.push(pattern, Some(Box::new(guard)), Box::new(run))
    }

    fn push(
        mut self,
        pattern: Pattern,
        guard: Option<Box<dyn Fn(&[Value]) -> bool + 'a>>,
        run: Box<dyn FnOnce(&[Value]) -> FormResult + 'a>,
    ) -> Self {
        self.steps.push(Step { pattern, guard, run });
        self
    }

    #[must_use]
    pub fn with_else(mut self, else_branch: impl FnOnce(Value) -> FormResult + 'a) -> Self {
        self.else_branch = Some(Box::new(else_branch));
        self
    }

    /// Use `clauses` as the `else` branch. A mismatched value no clause
    /// accepts fails with `NoClauseMatch`.
    #[must_use]
    pub fn with_else_clauses(self, clauses: Vec<Clause<'a>>) -> Self {
        self.with_else(move |value| case(&value, &clauses))
    }

    /// Run the steps, then `success` with every binding.
    #[tracing::instrument(level = "trace", skip_all, fields(steps = self.steps.len()))]
    pub fn run(self, success: impl FnOnce(&[Value]) -> FormResult) -> FormResult {
        let mut bound = Bindings::new();
        for (index, step) in self.steps.into_iter().enumerate() {
            let result = (step.run)(&bound)?;
            match match_value(&step.pattern, &result, step.guard.as_deref()).into_bound() {
                Some(captures) => bound.extend(captures),
                None => {
                    tracing::trace!(step = index, %result, "with step mismatched");
                    return match self.else_branch {
                        Some(else_branch) => else_branch(result),
                        None => Ok(result),
                    };
                }
            }
        }
        success(&bound)
    }
}

impl std::fmt::Debug for With<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("With")
            .field("steps", &self.steps.len())
            .field("else", &self.else_branch.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap to panic on unexpected state and compute values"
)]
