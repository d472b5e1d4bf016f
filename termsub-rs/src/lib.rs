//! Recursive term substitution.
//!
//! Text is scanned for terms between a configurable delimiter pair; each term
//! is resolved through a chain of resolvers and a static table, and whatever
//! it resolves to is expanded again.
//!
//! ```rust
//! use termsub::TermEngine;
//!
//! let mut engine = TermEngine::default();
//! engine.set_term_value("name1", "One");
//! engine.set_term_value("outer", "out-{name1}-out");
//! assert_eq!(engine.evaluate("{outer} \\{outer\\} {missing}"), "out-One-out {outer} {missing}");
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod scan;
pub mod table;

pub use config::Definitions;
pub use engine::TermEngine;
pub use error::EngineError;
pub use resolver::{EnvResolver, MapResolver, TermResolver};
