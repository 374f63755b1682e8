//! `try` with `rescue`, `catch`, `else` and `after`.
//!
//! # Semantics
//!
//! - The block runs first.
//! - On failure, `rescue` handles it if present, else `catch`, else the
//!   failure propagates. `rescue` receives the failure with its reason
//!   resolved; `catch` receives the raw failure.
//! - On success, `else` (if present) receives the block's value. A match
//!   failure raised by `else` becomes `NoMatchInElse`.
//! - `after` runs exactly once on every path, after the branch that produced
//!   the outcome, including when a handler fails or a panic unwinds.
//!
//! # Usage
//!
//! ```text
//! Try::new(|| risky())
//!     .with_rescue(|failure| Ok(failure.reason))
//!     .with_after(|| cleanup())
//!     .run()
//! ```

use forma_patterns::Clause;
use forma_value::{no_match_in_else, Failure, FailureWithReason, FormResult, Value};

use crate::dispatch::case;

type Block<'a> = Box<dyn FnOnce() -> FormResult + 'a>;
type OnFailure<'a, F> = Box<dyn FnOnce(F) -> FormResult + 'a>;
type OnValue<'a> = Box<dyn FnOnce(Value) -> FormResult + 'a>;

/// A `try` expression, built up with `with_*` and run once.
pub struct Try<'a> {
    block: Block<'a>,
    rescue: Option<OnFailure<'a, FailureWithReason>>,
    catch: Option<OnFailure<'a, Failure>>,
    else_branch: Option<OnValue<'a>>,
    after: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> Try<'a> {
    pub fn new(block: impl FnOnce() -> FormResult + 'a) -> Self {
        Try {
            block: Box::new(block),
            rescue: None,
            catch: None,
            else_branch: None,
            after: None,
        }
    }

    #[must_use]
    pub fn with_rescue(mut self, rescue: impl FnOnce(FailureWithReason) -> FormResult + 'a) -> Self {
        self.rescue = Some(Box::new(rescue));
        self
    }

    #[must_use]
    pub fn with_catch(mut self, catch: impl FnOnce(Failure) -> FormResult + 'a) -> Self {
        self.catch = Some(Box::new(catch));
        self
    }

    #[must_use]
    pub fn with_else(mut self, else_branch: impl FnOnce(Value) -> FormResult + 'a) -> Self {
        self.else_branch = Some(Box::new(else_branch));
        self
    }

    /// Use `clauses` as the `else` branch. A block value no clause accepts
    /// fails with `NoMatchInElse`.
    #[must_use]
    pub fn with_else_clauses(self, clauses: Vec<Clause<'a>>) -> Self {
        self.with_else(move |value| case(&value, &clauses))
    }

    #[must_use]
    pub fn with_after(mut self, after: impl FnOnce() + 'a) -> Self {
        self.after = Some(Box::new(after));
        self
    }

    /// Run the expression.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn run(self) -> FormResult {
        let Try {
            block,
            rescue,
            catch,
            else_branch,
            after,
        } = self;
        // Declared first so it drops last, after whichever branch ran.
        let _after = AfterGuard { after };

        match block() {
            Ok(value) => match else_branch {
                Some(else_branch) => else_branch(value.clone()).map_err(|failure| {
                    if failure.is_match_error() {
                        no_match_in_else(value)
                    } else {
                        failure
                    }
                }),
                None => Ok(value),
            },
            Err(failure) => {
                tracing::debug!(%failure, "try block failed");
                if let Some(rescue) = rescue {
                    rescue(failure.rescued())
                } else if let Some(catch) = catch {
                    catch(failure)
                } else {
                    Err(failure)
                }
            }
        }
    }
}

impl std::fmt::Debug for Try<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Try")
            .field("rescue", &self.rescue.is_some())
            .field("catch", &self.catch.is_some())
            .field("else", &self.else_branch.is_some())
            .field("after", &self.after.is_some())
            .finish_non_exhaustive()
    }
}

/// Runs the `after` branch when dropped, even during unwinding.
struct AfterGuard<'a> {
    after: Option<Box<dyn FnOnce() + 'a>>,
}

impl Drop for AfterGuard<'_> {
    fn drop(&mut self) {
        if let Some(after) = self.after.take() {
            after();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap to panic on unexpected state and count calls"
)]
mod tests;
