//! Unified error type for the Excellang front end.
//!
//! Every phase fails fast and atomically: the first error aborts the phase
//! and no partial token list, AST, or instruction list escapes. Each
//! diagnostic carries the source position it points at alongside a
//! human-readable message; formatting beyond that is the caller's job.

use thiserror::Error;

use super::Position;

/// Main error type for Excellang compilation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A character the tokenizer does not recognise.
    #[error("invalid character '{ch}' at {position}")]
    InvalidCharacter { ch: char, position: Position },

    /// A `.` with no adjacent digits.
    #[error("invalid number format at {position}: standalone decimal point")]
    InvalidNumber { position: Position },

    /// The parser met a token that cannot start a production.
    #[error("invalid syntax at {position}: unexpected {found}")]
    InvalidSyntax { found: String, position: Position },

    /// A specific token kind was required and something else was found.
    #[error("expected {expected} at {position}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// The row part of a cell address carried a decimal point or did not
    /// fit an integer.
    #[error("'{text}' at {position} is not a valid row number")]
    InvalidRowNumber { text: String, position: Position },

    /// A statement was not followed by a newline, `;`, or end of input.
    #[error("expected newline or semicolon at {position}, got {found}")]
    MissingSeparator { found: String, position: Position },

    /// A cell column that is not a usable letter sequence.
    #[error("'{column}' at {position} is not a valid column name")]
    InvalidColumn { column: String, position: Position },
}

impl Error {
    /// Source position the diagnostic points at.
    pub fn position(&self) -> Position {
        match self {
            Self::InvalidCharacter { position, .. }
            | Self::InvalidNumber { position }
            | Self::InvalidSyntax { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::InvalidRowNumber { position, .. }
            | Self::MissingSeparator { position, .. }
            | Self::InvalidColumn { position, .. } => *position,
        }
    }
}

/// Result type for Excellang operations.
pub type Result<T> = std::result::Result<T, Error>;
