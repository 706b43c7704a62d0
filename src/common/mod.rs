//! Shared primitives used by every phase of the pipeline.

pub mod error;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// A 1-based source location.
///
/// Multi-character tokens carry the position of their first character.
/// Positions are copied value data; AST nodes and instructions own their
/// copies and never share them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Placeholder for values with no source location, such as the zero
    /// default a scope lookup synthesizes.
    pub const ZERO: Position = Position { line: 0, column: 0 };

    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
