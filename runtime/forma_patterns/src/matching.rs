//! The matching primitive: one pattern against one value.

use smallvec::SmallVec;

use forma_value::{bad_match, FormResult, Value};

use crate::pattern::Pattern;

/// Values bound by a successful match, in slot order.
pub type Bindings = SmallVec<[Value; 4]>;

/// Guard predicate over the bound values of a match.
pub type Guard<'a> = dyn Fn(&[Value]) -> bool + 'a;

/// Result of matching a pattern against a value.
///
/// Produced only by this module; a `Bound` outcome always carries exactly
/// `pattern.capture_count()` values.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    Bound(Bindings),
    NoMatch,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Bound(_))
    }

    pub fn into_bound(self) -> Option<Bindings> {
        match self {
            MatchOutcome::Bound(bindings) => Some(bindings),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// Match `value` against `pattern`, then run `guard` over the bindings.
///
/// A failing guard is reported as `NoMatch`.
pub fn match_value(pattern: &Pattern, value: &Value, guard: Option<&Guard<'_>>) -> MatchOutcome {
    let mut bindings = Bindings::new();
    if !bind(pattern, value, &mut bindings) {
        return MatchOutcome::NoMatch;
    }
    debug_assert_eq!(bindings.len(), pattern.capture_count());
    match guard {
        Some(guard) if !guard(&bindings) => MatchOutcome::NoMatch,
        _ => MatchOutcome::Bound(bindings),
    }
}

/// Match or fail with `BadMatch` (the `pattern = value` form).
pub fn match_strict(pattern: &Pattern, value: &Value) -> FormResult<Bindings> {
    match_value(pattern, value, None)
        .into_bound()
        .ok_or_else(|| bad_match(value.clone()))
}

/// Push the captures of `pattern` against `value` onto `out`.
///
/// On failure `out` may hold partial bindings; callers that retry (the `Or`
/// arm) truncate back to their starting length.
fn bind(pattern: &Pattern, value: &Value, out: &mut Bindings) -> bool {
    match pattern {
        Pattern::Wildcard => true,
        Pattern::Capture => {
            out.push(value.clone());
            true
        }
        Pattern::Literal(expected) => expected == value,
        Pattern::Tuple(elements) => match value {
            Value::Tuple(items) if items.len() == elements.len() => bind_all(elements, items, out),
            _ => false,
        },
        Pattern::List { elements, tail } => {
            let Value::List(items) = value else {
                return false;
            };
            match tail {
                None => items.len() == elements.len() && bind_all(elements, items, out),
                Some(tail) => {
                    if items.len() < elements.len() {
                        return false;
                    }
                    let (head, rest) = items.split_at(elements.len());
                    bind_all(elements, head, out) && bind(tail, &Value::list(rest.to_vec()), out)
                }
            }
        }
        Pattern::Map(entries) => entries.iter().all(|(key, inner)| {
            value
                .get(key)
                .is_some_and(|field| bind(inner, field, out))
        }),
        Pattern::Or(alternatives) => {
            let start = out.len();
            for alternative in alternatives.as_slice() {
                if bind(alternative, value, out) {
                    return true;
                }
                out.truncate(start);
            }
            false
        }
        Pattern::As(inner) => {
            out.push(value.clone());
            bind(inner, value, out)
        }
    }
}

fn bind_all(patterns: &[Pattern], values: &[Value], out: &mut Bindings) -> bool {
    patterns
        .iter()
        .zip(values)
        .all(|(pattern, value)| bind(pattern, value, out))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
