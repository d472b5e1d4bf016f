//! Definitions files.
//!
//! A definitions file seeds an engine's static table:
//!
//! | Line | Action |
//! |------|--------|
//! | `name=value` | define `name`; the value is everything after the first `=` |
//! | Lines starting with `;` or `#` | comment, ignored |
//! | Blank lines | ignored |
//!
//! Names are trimmed; values are kept verbatim (leading spaces, delimiters and
//! escapes included) because they are only interpreted at expansion time.
//! A malformed line is reported and skipped; the rest of the file still loads.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::TermEngine;
use crate::table::TermTable;

/// File name looked up in the current directory when no per-user file exists.
pub const LOCAL_DEFS_FILE: &str = ".termsub";

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error on one line of a definitions file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Term definitions loaded from text.
#[derive(Debug, Default, Clone)]
pub struct Definitions {
    pub terms: TermTable,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse definitions from a string.
    ///
    /// Returns the definitions and a list of errors for lines that could not
    /// be parsed.  Later lines overwrite earlier ones with the same name.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut defs = Definitions::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim_start();

            if line.trim_end().is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            match parse_definition(line) {
                Ok((name, value)) => defs.terms.set(name, value),
                Err(message) => errors.push(ConfigError { line: lineno, message }),
            }
        }

        (defs, errors)
    }

    /// Read and parse a definitions file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        let (defs, errors) = Self::load_str(&s);
        debug!(path = %path.display(), terms = defs.len(), errors = errors.len(), "definitions loaded");
        for e in &errors {
            warn!(path = %path.display(), "{e}");
        }
        Ok((defs, errors))
    }

    /// Copy every definition into `engine`'s static table.
    pub fn apply(&self, engine: &mut TermEngine) {
        for (name, value) in self.terms.iter() {
            engine.set_term_value(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Split `name=value`.  The name must be non-empty after trimming.
fn parse_definition(line: &str) -> Result<(&str, &str), String> {
    let Some((name, value)) = line.split_once('=') else {
        return Err(format!("expected name=value, got {:?}", line.trim_end()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err("empty term name".to_owned());
    }
    Ok((name, value))
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// The per-user definitions file, e.g. `~/.config/termsub/terms` on Linux.
pub fn user_defs_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "termsub").map(|dirs| dirs.config_dir().join("terms"))
}

/// Search for a default definitions file: the per-user file, then
/// `./.termsub`.  Returns the first path that exists.
pub fn find_default_defs() -> Option<PathBuf> {
    user_defs_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(LOCAL_DEFS_FILE)))
        .find(|p| p.is_file())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
