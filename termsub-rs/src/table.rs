//! Static term table.
//!
//! The last layer consulted during resolution, after every resolver.
//! Entries are only ever added or overwritten; there is no removal.

use std::collections::HashMap;

/// Name → replacement value store.
#[derive(Debug, Default, Clone)]
pub struct TermTable {
    terms: HashMap<String, String>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a term.  The value is stored verbatim.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.terms.insert(name.into(), value.into());
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.terms.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    /// Iterate over all terms in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
