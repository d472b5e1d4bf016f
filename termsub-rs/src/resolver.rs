//! Dynamic term resolvers.
//!
//! A resolver answers a term name with `Some(value)` or declines with `None`.
//! `Some(String::new())` is an answer (the term expands to nothing), not a
//! refusal.  Any `Fn(&str) -> Option<String>` is a resolver:
//!
//! ```rust
//! use termsub::TermEngine;
//!
//! let mut engine = TermEngine::default();
//! engine.add_term_resolver(|name: &str| {
//!     name.strip_prefix("upper:").map(str::to_uppercase)
//! });
//! assert_eq!(engine.evaluate("{upper:abc}"), "ABC");
//! ```

use std::collections::HashMap;

/// Something that can supply a term's replacement value.
pub trait TermResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> TermResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// Answers terms from the process environment.
///
/// With a prefix, only names starting with it are answered, and the prefix is
/// stripped before the lookup (`env.HOME` → `$HOME` for prefix `env.`).
/// Unset or non-UTF-8 variables are declined.
#[derive(Debug, Clone, Default)]
pub struct EnvResolver {
    prefix: Option<String>,
}

impl EnvResolver {
    /// Answer every name that is a set environment variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer only names starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl TermResolver for EnvResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        let var = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str())?,
            None => name,
        };
        if var.is_empty() {
            return None;
        }
        std::env::var(var).ok()
    }
}

// ── Map overlay ───────────────────────────────────────────────────────────────

/// A resolver backed by its own map.
///
/// Registered as a resolver it outranks the engine's static table, so it
/// works as an overlay of higher-priority values.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    terms: HashMap<String, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.terms.insert(name.into(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for MapResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            terms: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl TermResolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        self.terms.get(name).cloned()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
