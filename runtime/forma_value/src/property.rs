//! Named property lookup on map values.
//!
//! Values are never callable, so a property is always returned as stored.
//! Deferred computations are modeled explicitly by the forms that need them
//! (`Condition::Lazy`, `Generator`), not by probing a looked-up value.

use crate::atom::Atom;
use crate::errors::{property_not_found, FormResult};
use crate::value::{MapKey, Value};

/// Look up `name` on `item`.
///
/// Tries the string key `"name"` first, then the atom key `:name`.
/// Fails with `PropertyNotFound` when neither exists or `item` is not a map.
pub fn call_property(item: &Value, name: &str) -> FormResult {
    item.get(&MapKey::from(name))
        .or_else(|| item.get(&MapKey::Atom(Atom::new(name))))
        .cloned()
        .ok_or_else(|| property_not_found(name, item))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
