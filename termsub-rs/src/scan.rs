//! Delimiter-parameterized scanner.
//!
//! The grammar is regular, so it is compiled once per engine into a single
//! [`regex::Regex`] built from the configured delimiters:
//!
//! | Part       | Shape                                            |
//! |------------|--------------------------------------------------|
//! | literal    | `( [^\ L] \| \. )*`                              |
//! | term       | `L ( [^\ R] \| \. )+ R` (optional)               |
//!
//! where `L`/`R` are the left/right delimiters and `\` is [`ESCAPE`].  Each
//! match yields one [`Segment`].  Where the grammar cannot advance (a left
//! delimiter that never closes, a lone trailing escape) the offending
//! character becomes a one-character literal segment, so every input scans.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::error::EngineError;

/// The fixed escape character.
pub const ESCAPE: char = '\\';

// ── Segments ──────────────────────────────────────────────────────────────────

/// One scanned piece of input: a literal run, optionally followed by a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'t> {
    /// Literal text, still escaped.  Pass through [`unescape`] before output.
    pub literal: &'t str,
    /// Raw term body between the delimiters, escapes intact.
    pub term: Option<&'t str>,
}

// ── Grammar ───────────────────────────────────────────────────────────────────

/// A compiled scanner for one delimiter pair.
#[derive(Debug, Clone)]
pub struct Grammar {
    left: char,
    right: char,
    re: Regex,
}

impl Grammar {
    /// Compile the grammar for `left`/`right`.
    ///
    /// Fails with [`EngineError::InvalidDelimiter`] if either delimiter is the
    /// escape character.
    pub fn new(left: char, right: char) -> Result<Self, EngineError> {
        for delimiter in [left, right] {
            if delimiter == ESCAPE {
                return Err(EngineError::InvalidDelimiter { delimiter });
            }
        }
        let re = compile_grammar(left, right)?;
        Ok(Self { left, right, re })
    }

    pub fn left(&self) -> char {
        self.left
    }

    pub fn right(&self) -> char {
        self.right
    }

    /// Split `text` into segments, left to right.
    pub fn segments<'g, 't>(&'g self, text: &'t str) -> Segments<'g, 't> {
        Segments {
            grammar: self,
            text,
            pos: 0,
        }
    }
}

/// Iterator returned by [`Grammar::segments`].
pub struct Segments<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    pos: usize,
}

impl<'g, 't> Iterator for Segments<'g, 't> {
    type Item = Segment<'t>;

    fn next(&mut self) -> Option<Segment<'t>> {
        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;

        // The pattern is anchored with `\A`, so slicing keeps matches at `pos`.
        if let Some(caps) = self.grammar.re.captures(rest) {
            let consumed = caps.get(0).map_or(0, |m| m.end());
            if consumed > 0 {
                self.pos += consumed;
                return Some(Segment {
                    literal: caps.get(1).map_or("", |m| m.as_str()),
                    term: caps.get(2).map(|m| m.as_str()),
                });
            }
        }

        // Unclosed left delimiter or lone escape: keep it as-is.
        let end = first.len_utf8();
        self.pos += end;
        Some(Segment {
            literal: &rest[..end],
            term: None,
        })
    }
}

// ── Escapes ───────────────────────────────────────────────────────────────────

/// Drop each escape character and keep the character after it.
///
/// A lone escape at the very end has nothing to protect and is kept.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            out.push(chars.next().unwrap_or(ESCAPE));
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

// ── Regex compilation ─────────────────────────────────────────────────────────

/// Build the anchored literal-then-optional-term pattern.
///
/// `.` must match newlines so that an escape can protect a line break.
fn compile_grammar(left: char, right: char) -> Result<Regex, EngineError> {
    let esc = regex::escape(&ESCAPE.to_string());
    let l = regex::escape(&left.to_string());
    let r = regex::escape(&right.to_string());
    let pattern = format!(
        r"\A((?:[^{esc}{l}]|{esc}.)*)(?:{l}((?:[^{esc}{r}]|{esc}.)+){r})?"
    );
    Ok(RegexBuilder::new(&pattern)
        .dot_matches_new_line(true)
        .build()?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
