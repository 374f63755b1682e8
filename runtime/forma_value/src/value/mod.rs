//! Runtime values matched and produced by the special forms.
//!
//! # Heap Enforcement
//!
//! Heap payloads (strings, tuples, lists, maps) are wrapped in `Heap<T>`,
//! whose constructor is private to this module. The only way to build one is
//! through a `Value::` factory method:
//!
//! ```text
//! let s = Value::string("hello");                      // OK
//! let pair = Value::tuple(vec![Value::atom("ok"), s]); // OK
//! let bad = Value::Str(Heap::new(...));                // ERROR: Heap::new is pub(super)
//! ```
//!
//! Values are immutable and cheap to clone; sharing a payload across threads
//! (for example a message sent to another mailbox) clones an `Arc`.

mod heap;

use std::collections::BTreeMap;
use std::fmt;

use crate::atom::Atom;

pub use heap::Heap;

/// Key of a map value.
///
/// Restricted to the scalar kinds that have a total order, so maps display
/// and compare deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Atom(Atom),
    Int(i64),
    Str(String),
}

impl MapKey {
    /// Convert a value into a map key, if it is a keyable scalar.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Atom(a) => Some(MapKey::Atom(*a)),
            Value::Int(n) => Some(MapKey::Int(*n)),
            Value::Str(s) => Some(MapKey::Str(s.to_string())),
            _ => None,
        }
    }

    /// The key as a value.
    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Atom(a) => Value::Atom(*a),
            MapKey::Int(n) => Value::Int(*n),
            MapKey::Str(s) => Value::string(s.as_str()),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.to_string())
    }
}

impl From<Atom> for MapKey {
    fn from(a: Atom) -> Self {
        MapKey::Atom(a)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Atom(a) => write!(f, "{a}"),
            MapKey::Int(n) => write!(f, "{n}"),
            MapKey::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    // Immediates (no heap allocation)
    /// The `nil` value.
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Atom(Atom),

    // Heap types
    Str(Heap<String>),
    /// Fixed-size tuple (`{a, b}`).
    Tuple(Heap<Vec<Value>>),
    /// List (`[a, b]`).
    List(Heap<Vec<Value>>),
    /// Map (`%{k => v}`).
    Map(Heap<BTreeMap<MapKey, Value>>),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create an atom value, interning `name`.
    #[inline]
    pub fn atom(name: &str) -> Self {
        Value::Atom(Atom::new(name))
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value. Later entries overwrite earlier ones with the same key.
    pub fn map(entries: impl IntoIterator<Item = (MapKey, Value)>) -> Self {
        Value::Map(Heap::new(entries.into_iter().collect()))
    }

    /// `{:ok, value}`.
    pub fn ok(value: Value) -> Self {
        Value::tuple(vec![Value::atom("ok"), value])
    }

    /// `{:error, reason}`.
    pub fn error(reason: Value) -> Self {
        Value::tuple(vec![Value::atom("error"), reason])
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Self {
        Value::Atom(a)
    }
}

// Copy-on-write Updates
//
// Each update consumes the value and returns the updated one, or gives the
// value back unchanged in `Err` when it is of the wrong kind. A uniquely
// owned payload is updated in place; a shared one is copied first, so other
// holders never observe the change.

impl Value {
    /// Append `item` to a list value.
    pub fn list_push(self, item: Value) -> Result<Value, Value> {
        match self {
            Value::List(mut items) => {
                items.make_mut().push(item);
                Ok(Value::List(items))
            }
            other => Err(other),
        }
    }

    /// Insert `key => item` into a map value, replacing an existing entry.
    pub fn map_insert(self, key: MapKey, item: Value) -> Result<Value, Value> {
        match self {
            Value::Map(mut map) => {
                map.make_mut().insert(key, item);
                Ok(Value::Map(map))
            }
            other => Err(other),
        }
    }

    /// Append `suffix` to a string value.
    pub fn str_push(self, suffix: &str) -> Result<Value, Value> {
        match self {
            Value::Str(mut s) => {
                s.make_mut().push_str(suffix);
                Ok(Value::Str(s))
            }
            other => Err(other),
        }
    }
}

// Value Methods

impl Value {
    /// Truthiness in the source language: only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<Atom> {
        match self {
            Value::Atom(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` in a map value. `None` for missing keys and non-maps.
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Check whether this value is the atom `name`.
    pub fn is_atom(&self, name: &str) -> bool {
        matches!(self, Value::Atom(a) if a.as_str() == name)
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Atom(_) => "atom",
            Value::Str(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

// Trait Implementations

/// Strict structural equality: `1` and `1.0` are different values.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Atom(a) => write!(f, "{a}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Tuple(items) => {
                write!(f, "{{")?;
                write_seq(f, items)?;
                write!(f, "}}")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "%{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match k {
                        MapKey::Atom(a) => write!(f, "{}: {v}", a.as_str())?,
                        _ => write!(f, "{k} => {v}")?,
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
