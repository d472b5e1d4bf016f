//! Command-line front end.
//!
//! Usage:
//!   termsub [-l<c>] [-r<c>] [-D NAME=VALUE]... [-f FILE]... [-e] [--env-prefix P] [--no-defaults] [FILE]
//!
//! Reads FILE (or stdin), expands it and returns the result for printing.
//! Definitions are applied in this order, later ones overwriting earlier:
//! default definitions file, each `-f` file, each `-D`.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{find_default_defs, ConfigError, Definitions};
use crate::engine::{TermEngine, DEFAULT_LEFT, DEFAULT_RIGHT};
use crate::error::EngineError;
use crate::resolver::EnvResolver;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "termsub", version, about = "Expand {terms} in text")]
pub struct CliArgs {
    /// Left (opening) delimiter.
    #[arg(short = 'l', long = "left", default_value_t = DEFAULT_LEFT)]
    pub left: char,

    /// Right (closing) delimiter.
    #[arg(short = 'r', long = "right", default_value_t = DEFAULT_RIGHT)]
    pub right: char,

    /// Define a term (repeatable).
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,

    /// Load term definitions from a file (repeatable).
    #[arg(short = 'f', long = "defs", value_name = "FILE")]
    pub defs: Vec<PathBuf>,

    /// Skip the default definitions file.
    #[arg(long)]
    pub no_defaults: bool,

    /// Resolve terms from environment variables.
    #[arg(short = 'e', long = "env")]
    pub env: bool,

    /// Resolve `<PREFIX>NAME` terms from environment variable NAME.
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,

    /// Input file; stdin when absent.
    pub input: Option<PathBuf>,
}

/// Errors that stop the front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("{}: {}", .path.display(), summarize(.errors))]
    Definitions {
        path: PathBuf,
        errors: Vec<ConfigError>,
    },
}

fn summarize(errors: &[ConfigError]) -> String {
    match errors {
        [] => "no errors".to_owned(),
        [one] => one.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// `-D` value parser: split at the first `=`.
fn parse_define(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    if name.is_empty() {
        return Err("empty term name".to_owned());
    }
    Ok((name.to_owned(), value.to_owned()))
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Build an engine configured from `args`.
pub fn build_engine(args: &CliArgs) -> Result<TermEngine, CliError> {
    let mut engine = TermEngine::new(args.left, args.right)?;

    if !args.no_defaults {
        if let Some(path) = find_default_defs() {
            match Definitions::load_file(&path) {
                Ok((defs, _)) => {
                    info!(path = %path.display(), "using default definitions");
                    defs.apply(&mut engine);
                }
                Err(e) => warn!(path = %path.display(), "cannot read default definitions: {e}"),
            }
        }
    }

    for path in &args.defs {
        let (defs, errors) = Definitions::load_file(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        if !errors.is_empty() {
            return Err(CliError::Definitions {
                path: path.clone(),
                errors,
            });
        }
        defs.apply(&mut engine);
    }

    for (name, value) in &args.defines {
        engine.set_term_value(name.as_str(), value.as_str());
    }

    if args.env {
        engine.add_term_resolver(EnvResolver::new());
    }
    if let Some(prefix) = &args.env_prefix {
        engine.add_term_resolver(EnvResolver::with_prefix(prefix.as_str()));
    }

    Ok(engine)
}

/// Read the input named by `args`.
pub fn read_input(args: &CliArgs) -> Result<String, CliError> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        }),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .map_err(CliError::Stdin)?;
            Ok(s)
        }
    }
}

/// Build the engine, read the input and expand it.
pub fn run(args: &CliArgs) -> Result<String, CliError> {
    let engine = build_engine(args)?;
    let input = read_input(args)?;
    Ok(engine.evaluate(&input))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
