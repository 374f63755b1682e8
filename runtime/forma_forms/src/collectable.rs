//! The collector protocol used by `for` comprehensions.
//!
//! A collectable turns a target value into an initial accumulator and a step
//! function. The comprehension calls the step with `Collect::Cont(value)` for
//! every produced value, in order, and once with `Collect::Done` at the end;
//! the accumulator returned by that final call is the comprehension result.
//! The comprehension never inspects the accumulator.

use forma_value::{invalid_collect_element, not_collectable, FormResult, MapKey, Value};

/// Instruction passed to a step function.
#[derive(Clone, Debug, PartialEq)]
pub enum Collect {
    /// Add one produced value.
    Cont(Value),
    /// No more values; finish the accumulator.
    Done,
}

/// Step function of a collector: `(accumulator, instruction) -> accumulator`.
pub type StepFn<'a> = Box<dyn FnMut(Value, Collect) -> FormResult + 'a>;

/// Provider of collectors for comprehension targets.
pub trait Collectable {
    /// Begin collecting into `target`.
    ///
    /// Fails when `target` cannot be collected into.
    fn into_collector(&self, target: Value) -> FormResult<(Value, StepFn<'_>)>;
}

/// Collects into the runtime's own values.
///
/// - list: produced values are appended after the existing elements
/// - map: produced values must be `{key, value}` tuples; later keys overwrite
/// - string: produced values must be strings and are concatenated
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueCollectable;

impl Collectable for ValueCollectable {
    fn into_collector(&self, target: Value) -> FormResult<(Value, StepFn<'_>)> {
        let step: StepFn<'_> = match &target {
            Value::List(_) => Box::new(|acc: Value, instruction: Collect| match instruction {
                Collect::Cont(item) => acc.list_push(item).map_err(|acc| not_collectable(&acc)),
                Collect::Done => Ok(acc),
            }),
            Value::Map(_) => Box::new(|acc: Value, instruction: Collect| match instruction {
                Collect::Cont(item) => {
                    let (key, value) = map_entry(item)?;
                    acc.map_insert(key, value).map_err(|acc| not_collectable(&acc))
                }
                Collect::Done => Ok(acc),
            }),
            Value::Str(_) => Box::new(|acc: Value, instruction: Collect| match instruction {
                Collect::Cont(Value::Str(s)) => {
                    acc.str_push(&s).map_err(|acc| not_collectable(&acc))
                }
                Collect::Cont(other) => Err(invalid_collect_element("string", other)),
                Collect::Done => Ok(acc),
            }),
            _ => return Err(not_collectable(&target)),
        };
        tracing::trace!(target_type = target.type_name(), "collecting");
        Ok((target, step))
    }
}

/// Split a `{key, value}` tuple into a map entry.
fn map_entry(item: Value) -> FormResult<(MapKey, Value)> {
    if let Some([key, value]) = item.as_tuple() {
        if let Some(key) = MapKey::from_value(key) {
            return Ok((key, value.clone()));
        }
    }
    Err(invalid_collect_element("map", item))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
