//! Error types for the engine.
//!
//! Only construction can fail.  Evaluation is total: unresolved terms and
//! unbalanced delimiters are ordinary output, and a cyclic definition is not
//! reported at all (it exhausts the stack; see [`crate::engine`]).

use thiserror::Error;

use crate::scan::ESCAPE;

/// Error returned when a [`TermEngine`](crate::TermEngine) cannot be built.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A delimiter collides with the escape character.
    #[error("invalid delimiter {delimiter:?}: must differ from the escape character {:?}", ESCAPE)]
    InvalidDelimiter { delimiter: char },

    /// The delimiter-parameterized grammar failed to compile.
    #[error("grammar error: {0}")]
    Grammar(#[from] regex::Error),
}
