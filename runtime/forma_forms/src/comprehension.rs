//! `for` comprehensions.
//!
//! Generators are combined right to left: the last generator is produced
//! first, and each earlier generator's values are prepended to every tuple
//! built so far. The result is the cartesian product with the leftmost
//! generator varying slowest, which is the source language's nesting order.
//! Each tuple is filtered by the guard, mapped by the body and fed to the
//! collector.

use forma_patterns::{match_value, Bindings, Guard, Handler, Pattern};
use forma_value::{FormResult, Value};
use smallvec::smallvec;

use crate::collectable::{Collect, Collectable};

type Tuples<'a> = Box<dyn Iterator<Item = Bindings> + 'a>;

/// A source of values for one generator position of a comprehension.
///
/// A generator is produced at most once, when the comprehension runs.
pub struct Generator<'a> {
    produce: Box<dyn FnOnce() -> FormResult<Tuples<'a>> + 'a>,
}

impl<'a> Generator<'a> {
    /// Each produced value binds one slot.
    pub fn values<I>(produce: impl FnOnce() -> FormResult<I> + 'a) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'a,
    {
        Generator {
            produce: Box::new(move || {
                let values = produce()?.into_iter().map(|v| smallvec![v]);
                Ok(Box::new(values) as Tuples<'a>)
            }),
        }
    }

    /// Each produced item is already a tuple of bound values.
    pub fn bindings<I>(produce: impl FnOnce() -> FormResult<I> + 'a) -> Self
    where
        I: IntoIterator<Item = Bindings>,
        I::IntoIter: 'a,
    {
        Generator {
            produce: Box::new(move || Ok(Box::new(produce()?.into_iter()) as Tuples<'a>)),
        }
    }

    /// Destructure each produced value with `pattern`, skipping values that
    /// do not match (`for {:ok, x} <- list`).
    pub fn matching<I>(pattern: Pattern, produce: impl FnOnce() -> FormResult<I> + 'a) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'a,
    {
        Generator {
            produce: Box::new(move || {
                let matched = produce()?
                    .into_iter()
                    .filter_map(move |v| match_value(&pattern, &v, None).into_bound());
                Ok(Box::new(matched) as Tuples<'a>)
            }),
        }
    }

    /// A generator over already computed values.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value> + 'a,
        I::IntoIter: 'a,
    {
        Generator::values(move || Ok(values))
    }

    fn produce(self) -> FormResult<Tuples<'a>> {
        (self.produce)()
    }
}

impl std::fmt::Debug for Generator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}

/// The per-tuple part of a comprehension: an optional filter and the body.
pub struct ForExpr<'a> {
    guard: Option<Box<Guard<'a>>>,
    body: Box<Handler<'a>>,
}

impl<'a> ForExpr<'a> {
    pub fn new(body: impl Fn(&[Value]) -> FormResult + 'a) -> Self {
        ForExpr {
            guard: None,
            body: Box::new(body),
        }
    }

    /// Keep only tuples for which `guard` holds.
    #[must_use]
    pub fn when(mut self, guard: impl Fn(&[Value]) -> bool + 'a) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    fn accepts(&self, tuple: &[Value]) -> bool {
        match &self.guard {
            Some(guard) => guard(tuple),
            None => true,
        }
    }
}

/// Run a comprehension and return the collector's final accumulator.
///
/// The collector is started before any generator is produced, so an
/// uncollectable `into` fails without running a generator. With no
/// generators nothing is produced and the result is the finished `into`.
/// Body, guard, generator and collector failures propagate.
#[tracing::instrument(level = "debug", skip_all, fields(generators = generators.len()))]
pub fn comprehend(
    expression: &ForExpr<'_>,
    mut generators: Vec<Generator<'_>>,
    collectable: &dyn Collectable,
    into: Value,
) -> FormResult {
    let (mut acc, mut step) = collectable.into_collector(into)?;

    let Some(innermost) = generators.pop() else {
        return step(acc, Collect::Done);
    };

    // The outermost generator is only iterated, never materialized; with a
    // single generator that is the innermost one.
    let inner: Vec<Bindings>;
    let tuples: Tuples<'_> = if generators.is_empty() {
        innermost.produce()?
    } else {
        let outermost = generators.remove(0);
        let mut combined: Vec<Bindings> = innermost.produce()?.collect();
        while let Some(generator) = generators.pop() {
            combined = prepend(generator.produce()?, &combined).collect();
        }
        inner = combined;
        Box::new(prepend(outermost.produce()?, &inner))
    };

    let mut emitted = 0_usize;
    for tuple in tuples {
        if !expression.accepts(&tuple) {
            continue;
        }
        let value = (expression.body)(&tuple)?;
        acc = step(acc, Collect::Cont(value))?;
        emitted = emitted.saturating_add(1);
    }
    tracing::debug!(emitted, "comprehension done");
    step(acc, Collect::Done)
}

/// Prepend every head tuple to every tail tuple, heads varying slowest.
fn prepend<'t>(
    heads: Tuples<'t>,
    tails: &'t [Bindings],
) -> impl Iterator<Item = Bindings> + 't {
    heads.flat_map(move |head| {
        tails.iter().map(move |tail| {
            let mut tuple = head.clone();
            tuple.extend(tail.iter().cloned());
            tuple
        })
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap to panic on unexpected state and compute expected values"
)]
mod tests;
