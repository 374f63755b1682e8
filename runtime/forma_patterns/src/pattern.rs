//! Pattern descriptors.
//!
//! Patterns are positional: a `Capture` binds the next slot, and bound values
//! come back in left-to-right order of the captures in the pattern. There are
//! no variable names at this level; the front end that produces calls into
//! the runtime maps slots to names.

use forma_value::{MapKey, Value};

/// Alternatives of an or-pattern, all binding the same number of values.
///
/// The field is private to this crate, so a value of this type has always
/// passed the arity check in [`Pattern::any_of`].
#[derive(Clone, Debug, PartialEq)]
pub struct Alternatives(Vec<Pattern>);

impl Alternatives {
    pub fn as_slice(&self) -> &[Pattern] {
        &self.0
    }
}

/// Alternatives given to [`Pattern::any_of`] bind different numbers of values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("pattern alternative {index} binds {found} values, expected {expected}")]
pub struct UnevenAlternatives {
    pub index: usize,
    pub expected: usize,
    pub found: usize,
}

/// A structural pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// Matches anything, binds nothing (`_`).
    Wildcard,
    /// Matches anything, binds the value to the next slot.
    Capture,
    /// Matches a value equal to this one.
    Literal(Value),
    /// Matches a tuple of exactly this arity.
    Tuple(Vec<Pattern>),
    /// Matches a list. Without a tail the length must be exact; with a tail
    /// (`[a, b | rest]`) the remaining elements are matched as a list.
    List {
        elements: Vec<Pattern>,
        tail: Option<Box<Pattern>>,
    },
    /// Matches a map containing at least these keys.
    Map(Vec<(MapKey, Pattern)>),
    /// Matches if any alternative matches; the first matching one binds.
    /// Built only through [`Pattern::any_of`].
    Or(Alternatives),
    /// Binds the whole value, then matches the inner pattern (`inner = name`).
    /// The whole value takes the first slot.
    As(Box<Pattern>),
}

impl Pattern {
    #[inline]
    pub fn wildcard() -> Self {
        Pattern::Wildcard
    }

    #[inline]
    pub fn capture() -> Self {
        Pattern::Capture
    }

    #[inline]
    pub fn literal(value: Value) -> Self {
        Pattern::Literal(value)
    }

    /// Literal atom pattern (`:ok`).
    pub fn atom(name: &str) -> Self {
        Pattern::Literal(Value::atom(name))
    }

    pub fn tuple(elements: Vec<Pattern>) -> Self {
        Pattern::Tuple(elements)
    }

    /// Exact-length list pattern.
    pub fn list(elements: Vec<Pattern>) -> Self {
        Pattern::List {
            elements,
            tail: None,
        }
    }

    /// List pattern with a tail (`[h | t]`).
    pub fn cons(elements: Vec<Pattern>, tail: Pattern) -> Self {
        Pattern::List {
            elements,
            tail: Some(Box::new(tail)),
        }
    }

    pub fn map(entries: Vec<(MapKey, Pattern)>) -> Self {
        Pattern::Map(entries)
    }

    /// Alternatives. Every alternative must declare the same number of
    /// captures, so a match always fills the same slots.
    pub fn any_of(alternatives: Vec<Pattern>) -> Result<Self, UnevenAlternatives> {
        if let Some((first, rest)) = alternatives.split_first() {
            let expected = first.capture_count();
            for (offset, alternative) in rest.iter().enumerate() {
                let found = alternative.capture_count();
                if found != expected {
                    return Err(UnevenAlternatives {
                        index: offset.saturating_add(1),
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(Pattern::Or(Alternatives(alternatives)))
    }

    pub fn bound_as(inner: Pattern) -> Self {
        Pattern::As(Box::new(inner))
    }

    /// `{:ok, inner}`.
    pub fn ok(inner: Pattern) -> Self {
        Pattern::Tuple(vec![Pattern::atom("ok"), inner])
    }

    /// `{:error, inner}`.
    pub fn error(inner: Pattern) -> Self {
        Pattern::Tuple(vec![Pattern::atom("error"), inner])
    }

    /// Number of slots a successful match binds.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "capture counts are bounded by pattern size"
    )]
    pub fn capture_count(&self) -> usize {
        match self {
            Pattern::Wildcard | Pattern::Literal(_) => 0,
            Pattern::Capture => 1,
            Pattern::Tuple(elements) => elements.iter().map(Pattern::capture_count).sum(),
            Pattern::List { elements, tail } => {
                elements.iter().map(Pattern::capture_count).sum::<usize>()
                    + tail.as_deref().map_or(0, Pattern::capture_count)
            }
            Pattern::Map(entries) => entries.iter().map(|(_, p)| p.capture_count()).sum(),
            Pattern::Or(alternatives) => alternatives.0.first().map_or(0, Pattern::capture_count),
            Pattern::As(inner) => 1 + inner.capture_count(),
        }
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Pattern::Literal(value)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
