//! Interned names and string values.
//!
//! Identifier names and literal values repeat heavily in real programs. The
//! lexer owns one [`AtomTable`] per parse so identical text shares a single
//! `Arc<str>` allocation. Atoms are `Send + Sync`, so a finished `Program` can
//! move to another thread.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// An immutable, cheaply clonable string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(Arc<str>);

impl Atom {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Atom {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Atom {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom(Arc::from(s))
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom(Arc::from(s))
    }
}

impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicating table of atoms.
pub struct AtomTable {
    /// Keyed by content; `Box<str>` avoids a second hop through the `Arc`.
    atoms: FxHashMap<Box<str>, Atom>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self {
            atoms: FxHashMap::default(),
        }
    }

    /// Table pre-populated with names nearly every program mentions.
    pub fn with_common_names() -> Self {
        let mut table = Self::new();
        for name in COMMON_NAMES {
            table.intern(name);
        }
        table
    }

    /// Get the shared atom for `s`, inserting it on first sight.
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(existing) = self.atoms.get(s) {
            return existing.clone();
        }
        let atom = Atom::from(s);
        self.atoms.insert(s.into(), atom.clone());
        atom
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

const COMMON_NAMES: &[&str] = &[
    "let",
    "static",
    "yield",
    "await",
    "async",
    "of",
    "get",
    "set",
    "constructor",
    "prototype",
    "__proto__",
    "arguments",
    "eval",
    "length",
    "use strict",
];
