//! The stack-machine instruction set emitted by the lowering pass.
//!
//! This is the contract an executor must honor: a value stack, dispatch on
//! the opcode, a function table keyed by name for `CALL`, and read/write
//! access to exactly one scope instance for the load/store opcodes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::common::Position;

/// One operation of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    /// `PUSH value` — pushes its operand onto the stack.
    Push,
    /// `POP` — discards the top of the stack. The lowering pass never emits
    /// it; whether a bare expression statement's value is auto-discarded is
    /// executor policy, implemented by issuing this opcode.
    Pop,
    /// `ADD` — pops two values and pushes their sum.
    Add,
    /// `SUB` — pops two values and pushes their difference.
    Sub,
    /// `MUL` — pops two values and pushes their product.
    Mul,
    /// `DIV` — pops two values and pushes their quotient.
    Div,
    /// `UPLUS` — pops one value and pushes the unary-plus result.
    UPlus,
    /// `UMINUS` — pops one value and pushes its negation.
    UMinus,
    /// `STOC column row` — pops one value and stores it in the cell.
    Stoc,
    /// `LODC column row` — pushes the cell's value from the scope.
    Lodc,
    /// `STOR column1 row1 column2 row2` — pops one value and stores it for
    /// the whole rectangular range.
    Stor,
    /// `LODR column1 row1 column2 row2` — pushes the value of the range's
    /// first corner (reading a range degenerates to reading its anchor cell
    /// unless the executor overrides this).
    Lodr,
    /// `CALL function argc` — pops `argc` argument values, invokes the
    /// named function with them in order, and pushes its result.
    Call,
}

/// A literal operand carried by an instruction.
///
/// Each value keeps its own source position so an executor can attribute
/// runtime faults to the exact token, independently of the owning
/// instruction's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeValue {
    Number { value: f64, position: Position },
    String { value: String, position: Position },
}

impl RuntimeValue {
    pub fn number(value: f64, position: Position) -> Self {
        Self::Number { value, position }
    }

    pub fn string(value: impl Into<String>, position: Position) -> Self {
        Self::String {
            value: value.into(),
            position,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            Self::String { .. } => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Number { .. } => None,
            Self::String { value, .. } => Some(value),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Number { position, .. } | Self::String { position, .. } => *position,
        }
    }
}

/// One instruction in the linear stack-machine program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Opcode,
    pub args: SmallVec<[RuntimeValue; 4]>,
    pub position: Position,
}

impl Instruction {
    pub(crate) fn new(op: Opcode, position: Position) -> Self {
        Self {
            op,
            args: SmallVec::new(),
            position,
        }
    }

    pub(crate) fn with_args(
        op: Opcode,
        args: impl IntoIterator<Item = RuntimeValue>,
        position: Position,
    ) -> Self {
        Self {
            op,
            args: SmallVec::from_iter(args),
            position,
        }
    }
}
