//! The term-expansion engine.
//!
//! A [`TermEngine`] owns a delimiter pair, a static [`TermTable`] and a chain
//! of [`TermResolver`]s.  [`TermEngine::evaluate`] scans its input, resolves
//! each term and evaluates the resolved value again, to any depth.
//!
//! # Resolution order
//!
//! 1. Resolvers, most recently added first.  The first `Some` wins.
//! 2. The static table, by exact name.
//! 3. Otherwise the term is written back unchanged, delimiters included.
//!
//! Term bodies are looked up exactly as written: escapes inside a body are
//! not removed before the lookup.
//!
//! # Cycles
//!
//! There is no recursion limit and no cycle detection.  A term whose value
//! refers back to itself, directly or through other terms, recurses until the
//! thread's stack is exhausted and the process aborts.  Callers that accept
//! untrusted definitions must rule out cycles themselves.
//!
//! # Sharing
//!
//! Registration takes `&mut self` and evaluation takes `&self`, so the table
//! and resolver chain cannot change while an evaluation is running.  Share an
//! engine across threads behind a lock.

use std::fmt;

use tracing::{debug, trace};

use crate::error::EngineError;
use crate::resolver::TermResolver;
use crate::scan::{unescape, Grammar};
use crate::table::TermTable;

/// Default left delimiter.
pub const DEFAULT_LEFT: char = '{';
/// Default right delimiter.
pub const DEFAULT_RIGHT: char = '}';

/// Recursive term substitution over one delimiter pair.
pub struct TermEngine {
    grammar: Grammar,
    table: TermTable,
    /// Newest first.
    resolvers: Vec<Box<dyn TermResolver>>,
}

impl fmt::Debug for TermEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermEngine")
            .field("left", &self.grammar.left())
            .field("right", &self.grammar.right())
            .field("terms", &self.table.len())
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl Default for TermEngine {
    fn default() -> Self {
        Self::with_default_delimiters()
    }
}

impl TermEngine {
    /// Create an engine with explicit delimiters.
    ///
    /// The two may be the same character.  Neither may be the escape
    /// character `\`.
    pub fn new(left: char, right: char) -> Result<Self, EngineError> {
        let grammar = Grammar::new(left, right)?;
        debug!(%left, %right, "term engine created");
        Ok(Self {
            grammar,
            table: TermTable::new(),
            resolvers: Vec::new(),
        })
    }

    /// Create an engine using `{` and `}`.
    pub fn with_default_delimiters() -> Self {
        let grammar = match Grammar::new(DEFAULT_LEFT, DEFAULT_RIGHT) {
            Ok(g) => g,
            // Both defaults are fixed and differ from the escape character.
            Err(e) => unreachable!("default grammar failed to compile: {e}"),
        };
        Self {
            grammar,
            table: TermTable::new(),
            resolvers: Vec::new(),
        }
    }

    pub fn left_delimiter(&self) -> char {
        self.grammar.left()
    }

    pub fn right_delimiter(&self) -> char {
        self.grammar.right()
    }

    /// Insert or overwrite a static term.  `value` is not evaluated now.
    pub fn set_term_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        debug!(term = %name, "term value set");
        self.table.set(name, value);
    }

    /// The stored (unevaluated) value of a static term.
    pub fn term_value(&self, name: &str) -> Option<&str> {
        self.table.get(name)
    }

    pub fn term_count(&self) -> usize {
        self.table.len()
    }

    /// Put `resolver` at the front of the chain, ahead of every resolver
    /// added before it and of the static table.
    pub fn add_term_resolver<R>(&mut self, resolver: R)
    where
        R: TermResolver + 'static,
    {
        self.resolvers.insert(0, Box::new(resolver));
        debug!(resolvers = self.resolvers.len(), "term resolver added");
    }

    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Fully expand `input`.
    ///
    /// Never fails on malformed input.  Does not return on cyclic
    /// definitions; see the module docs.
    pub fn evaluate(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.expand_into(input, &mut out);
        out
    }

    fn expand_into(&self, input: &str, out: &mut String) {
        for segment in self.grammar.segments(input) {
            out.push_str(&unescape(segment.literal));
            let Some(body) = segment.term else { continue };
            match self.resolve(body) {
                Some(value) => self.expand_into(&value, out),
                None => {
                    out.push(self.grammar.left());
                    out.push_str(body);
                    out.push(self.grammar.right());
                }
            }
        }
    }

    fn resolve(&self, name: &str) -> Option<String> {
        for (rank, resolver) in self.resolvers.iter().enumerate() {
            if let Some(value) = resolver.resolve(name) {
                trace!(term = name, rank, "resolved by resolver");
                return Some(value);
            }
        }
        if let Some(value) = self.table.get(name) {
            trace!(term = name, "resolved from table");
            return Some(value.to_owned());
        }
        trace!(term = name, "unresolved");
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MapResolver;

    fn engine_with_one() -> TermEngine {
        let mut e = TermEngine::default();
        e.set_term_value("name1", "One");
        e
    }

    #[test]
    fn default_delimiters() {
        let e = TermEngine::default();
        assert_eq!(e.left_delimiter(), '{');
        assert_eq!(e.right_delimiter(), '}');
    }

    #[test]
    fn explicit_delimiters() {
        let e = TermEngine::new('<', '>').unwrap();
        assert_eq!(e.left_delimiter(), '<');
        assert_eq!(e.right_delimiter(), '>');
    }

    #[test]
    fn escape_as_delimiter_fails() {
        assert!(matches!(
            TermEngine::new('\\', '}'),
            Err(EngineError::InvalidDelimiter { .. })
        ));
        assert!(matches!(
            TermEngine::new('{', '\\'),
            Err(EngineError::InvalidDelimiter { .. })
        ));
    }

    #[test]
    fn plain_text_unchanged() {
        let e = engine_with_one();
        assert_eq!(e.evaluate(""), "");
        assert_eq!(e.evaluate("nothing to see"), "nothing to see");
    }

    #[test]
    fn simple_term() {
        assert_eq!(engine_with_one().evaluate("{name1}"), "One");
    }

    #[test]
    fn boundary_placements() {
        let e = engine_with_one();
        assert_eq!(e.evaluate("{name1}{name1}"), "OneOne");
        assert_eq!(e.evaluate(">>{name1}"), ">>One");
        assert_eq!(e.evaluate("{name1}<<"), "One<<");
        assert_eq!(e.evaluate(">>{name1}<<"), ">>One<<");
    }

    #[test]
    fn undefined_term_kept() {
        let e = TermEngine::default();
        assert_eq!(e.evaluate("{name1}"), "{name1}");
        assert_eq!(e.evaluate("a {x y} b"), "a {x y} b");
    }

    #[test]
    fn undefined_term_keeps_escapes_in_body() {
        let e = TermEngine::default();
        assert_eq!(e.evaluate(r"{a\}b}"), r"{a\}b}");
    }

    #[test]
    fn escaped_body_is_looked_up_raw() {
        let mut e = TermEngine::default();
        e.set_term_value(r"a\}b", "raw");
        e.set_term_value("a}b", "unescaped");
        assert_eq!(e.evaluate(r"{a\}b}"), "raw");
    }

    #[test]
    fn escaping() {
        let e = engine_with_one();
        assert_eq!(e.evaluate(r">>\{<<"), ">>{<<");
        assert_eq!(e.evaluate(r">>{name1}\{name1\}<<"), ">>One{name1}<<");
        assert_eq!(e.evaluate(r"a\\b"), r"a\b");
    }

    #[test]
    fn transitive_expansion() {
        let mut e = engine_with_one();
        e.set_term_value("outer", "out-{name1}-out");
        assert_eq!(e.evaluate("{outer}"), "out-One-out");
    }

    #[test]
    fn multi_level_expansion() {
        let mut e = engine_with_one();
        e.set_term_value("outer", "out-{inner}-out");
        e.set_term_value("inner", "in-{name1}-in");
        assert_eq!(e.evaluate("{outer}"), "out-in-One-in-out");
    }

    #[test]
    fn value_escapes_apply_when_expanded() {
        let mut e = engine_with_one();
        e.set_term_value("lit", r"\{name1\}");
        assert_eq!(e.evaluate("{lit}"), "{name1}");
    }

    #[test]
    fn value_stored_verbatim_until_evaluated() {
        let mut e = TermEngine::default();
        e.set_term_value("outer", "<{inner}>");
        assert_eq!(e.term_value("outer"), Some("<{inner}>"));
        assert_eq!(e.evaluate("{outer}"), "<{inner}>");
        e.set_term_value("inner", "now");
        assert_eq!(e.evaluate("{outer}"), "<now>");
    }

    #[test]
    fn later_set_overwrites() {
        let mut e = engine_with_one();
        e.set_term_value("name1", "Uno");
        assert_eq!(e.evaluate("{name1}"), "Uno");
        assert_eq!(e.term_count(), 1);
    }

    #[test]
    fn later_resolver_wins() {
        let mut e = engine_with_one();
        e.add_term_resolver(|n: &str| (n == "name1").then(|| "first".to_owned()));
        e.add_term_resolver(|n: &str| (n == "name1").then(|| "second".to_owned()));
        assert_eq!(e.evaluate("{name1}"), "second");
        assert_eq!(e.resolver_count(), 2);
    }

    #[test]
    fn declining_resolver_falls_through() {
        let mut e = engine_with_one();
        e.add_term_resolver(|n: &str| (n == "other").then(|| "x".to_owned()));
        e.add_term_resolver(|_: &str| None);
        assert_eq!(e.evaluate("{name1}/{other}"), "One/x");
    }

    #[test]
    fn empty_answer_is_an_answer() {
        let mut e = engine_with_one();
        e.add_term_resolver(|n: &str| (n == "name1").then(String::new));
        assert_eq!(e.evaluate("[{name1}]"), "[]");
    }

    #[test]
    fn resolver_values_are_expanded() {
        let mut e = engine_with_one();
        e.add_term_resolver(MapResolver::new().with("wrap", "<{name1}>"));
        assert_eq!(e.evaluate("{wrap}"), "<One>");
    }

    #[test]
    fn custom_delimiters() {
        let mut e = TermEngine::new('(', ')').unwrap();
        e.set_term_value("name1", "One");
        assert_eq!(e.evaluate("(name1)"), "One");
        assert_eq!(e.evaluate("{name1}"), "{name1}");
        assert_eq!(e.evaluate(r"\(name1\)"), "(name1)");
        assert_eq!(e.evaluate("(missing)"), "(missing)");
    }

    #[test]
    fn identical_delimiters() {
        let mut e = TermEngine::new('$', '$').unwrap();
        e.set_term_value("a", "A");
        e.set_term_value("b", "B");
        assert_eq!(e.evaluate("$a$$b$"), "AB");
        assert_eq!(e.evaluate("x $a$ y $b$ z"), "x A y B z");
        assert_eq!(e.evaluate("$a$ costs $5"), "A costs $5");
    }

    #[test]
    fn unbalanced_delimiters_are_literal() {
        let e = engine_with_one();
        assert_eq!(e.evaluate("{name1"), "{name1");
        assert_eq!(e.evaluate("name1}"), "name1}");
        assert_eq!(e.evaluate("{}"), "{}");
        assert_eq!(e.evaluate("{name1}{"), "One{");
    }

    #[test]
    fn debug_summarises() {
        let e = engine_with_one();
        let s = format!("{e:?}");
        assert!(s.contains("terms: 1"), "{s}");
    }
}
