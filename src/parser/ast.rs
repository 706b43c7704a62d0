//! AST node types for statements and expressions.
//!
//! Node kinds are closed sets dispatched by enum tag. Every node owns its
//! children exclusively and carries the position of the token that began
//! it, used only for diagnostics.

use crate::common::{Error, Position, Result};

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Longest column name whose bijective base-26 ordinal still fits `u64`.
const MAX_COLUMN_LETTERS: usize = 13;

/// Convert column letters to their bijective base-26 ordinal,
/// case-insensitively: `A` = 1, `Z` = 26, `AA` = 27, `AB` = 28.
///
/// Returns `None` for an empty string, a non-letter character, or a column
/// long enough to overflow.
pub fn column_ordinal(column: &str) -> Option<u64> {
    if column.is_empty() {
        return None;
    }

    let mut ordinal: u64 = 0;
    for ch in column.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let value = (ch.to_ascii_uppercase() as u8 - b'A') as u64 + 1;
        ordinal = ordinal.checked_mul(26)?.checked_add(value)?;
    }
    Some(ordinal)
}

/// A (column letters, row number) coordinate into the 2-D store.
///
/// The column is validated at construction, so the ordinal conversion can
/// never fail afterwards. Column comparison is case-insensitive; the
/// letters are kept as written for display and instruction operands.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAddress {
    column: String,
    row: u64,
    ordinal: u64,
    position: Position,
}

impl CellAddress {
    /// Build an address, validating the column letters.
    pub fn new(column: impl Into<String>, row: u64, position: Position) -> Result<Self> {
        let column = column.into();
        if column.len() > MAX_COLUMN_LETTERS {
            return Err(Error::InvalidColumn { column, position });
        }
        let Some(ordinal) = column_ordinal(&column) else {
            return Err(Error::InvalidColumn { column, position });
        };
        Ok(Self {
            column,
            row,
            ordinal,
            position,
        })
    }

    /// The column letters as written in the source.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The row number. Rows are written without a decimal point; input that
    /// violates this is rejected while parsing, not here.
    pub fn row(&self) -> u64 {
        self.row
    }

    /// Case-insensitive bijective base-26 ordinal of the column.
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// A rectangular region between two cell addresses.
///
/// Corner order is whatever the source wrote; containment tests normalize
/// through [`CellRange::normalized`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellRange {
    pub corner1: CellAddress,
    pub corner2: CellAddress,
}

impl CellRange {
    pub fn new(corner1: CellAddress, corner2: CellAddress) -> Self {
        Self { corner1, corner2 }
    }

    /// Bounds as `((column_min, column_max), (row_min, row_max))` over the
    /// column ordinals and rows of the two corners.
    pub fn normalized(&self) -> ((u64, u64), (u64, u64)) {
        let columns = minmax(self.corner1.ordinal(), self.corner2.ordinal());
        let rows = minmax(self.corner1.row(), self.corner2.row());
        (columns, rows)
    }
}

fn minmax(a: u64, b: u64) -> (u64, u64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Statement nodes produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Ordered sequence of statements; the whole program is one block.
    Block {
        statements: Vec<Stmt>,
        position: Position,
    },
    /// `A1 = expr`
    CellAssignment {
        target: CellAddress,
        value: Expr,
        position: Position,
    },
    /// `A1:B2 = expr`
    RangeAssignment {
        target: CellRange,
        value: Expr,
        position: Position,
    },
    /// A bare expression evaluated for its value.
    Expression { value: Expr, position: Position },
}

impl Stmt {
    pub fn position(&self) -> Position {
        match self {
            Self::Block { position, .. }
            | Self::CellAssignment { position, .. }
            | Self::RangeAssignment { position, .. }
            | Self::Expression { position, .. } => *position,
        }
    }
}

/// Expression nodes produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        position: Position,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        position: Position,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        position: Position,
    },
    Number {
        value: f64,
        has_decimal: bool,
        position: Position,
    },
    /// Placeholder for an elided call argument; evaluates to zero.
    Null { position: Position },
    Cell {
        address: CellAddress,
        position: Position,
    },
    Range {
        range: CellRange,
        position: Position,
    },
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Self::Binary { position, .. }
            | Self::Unary { position, .. }
            | Self::Call { position, .. }
            | Self::Number { position, .. }
            | Self::Null { position }
            | Self::Cell { position, .. }
            | Self::Range { position, .. } => *position,
        }
    }

    /// Overwrite the reported position. Used for parenthesized expressions,
    /// which report the position of the opening paren.
    pub(crate) fn set_position(&mut self, new: Position) {
        match self {
            Self::Binary { position, .. }
            | Self::Unary { position, .. }
            | Self::Call { position, .. }
            | Self::Number { position, .. }
            | Self::Null { position }
            | Self::Cell { position, .. }
            | Self::Range { position, .. } => *position = new,
        }
    }
}
