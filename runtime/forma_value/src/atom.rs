//! Interned atoms.
//!
//! Atoms are named constants (`:ok`, `:error`, `:done`) compared by identity.
//! Every atom lives in one process-wide table, so an `Atom` is a `Copy` index
//! and equality is a single integer compare.
//!
//! # Thread Safety
//! The table is guarded by a `parking_lot::RwLock`. Lookups of existing atoms
//! only take the read lock; the write lock is taken when a new name appears.

use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// An interned atom.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

struct AtomTable {
    map: FxHashMap<&'static str, u32>,
    names: Vec<&'static str>,
}

static ATOMS: OnceLock<RwLock<AtomTable>> = OnceLock::new();

fn table() -> &'static RwLock<AtomTable> {
    ATOMS.get_or_init(|| {
        RwLock::new(AtomTable {
            map: FxHashMap::default(),
            names: Vec::with_capacity(64),
        })
    })
}

impl Atom {
    /// Intern `name`, returning the existing atom if it was seen before.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct atoms are created.
    pub fn new(name: &str) -> Self {
        // Fast path: already interned
        if let Some(&index) = table().read().map.get(name) {
            return Atom(index);
        }

        let mut guard = table().write();
        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(name) {
            return Atom(index);
        }

        let index = u32::try_from(guard.names.len())
            .unwrap_or_else(|_| panic!("atom table exceeded {} entries", u32::MAX));
        // Atoms are never collected, so leaking gives the table 'static names
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        guard.names.push(leaked);
        guard.map.insert(leaked, index);
        Atom(index)
    }

    /// The atom's name.
    pub fn as_str(self) -> &'static str {
        // Only `Atom::new` constructs atoms, so the index is always present.
        table()
            .read()
            .names
            .get(self.0 as usize)
            .copied()
            .unwrap_or("")
    }

    /// Table index, mainly for debugging.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Atom::new(name)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom(:{})", self.as_str())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
