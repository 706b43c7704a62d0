//! Compiler front end for a small spreadsheet formula language.
//!
//! Source text goes through three stages: the [`lexer`] turns it into
//! tokens, the [`parser`] builds a statement AST, and the [`compiler`]
//! lowers that AST into a linear stack-machine program. The [`scope`]
//! module provides the cell/range store an executor pairs with the
//! emitted instructions.
//!
//! ```
//! use excellang::{Opcode, compile};
//!
//! let program = compile("A1 = 1 + 2")?;
//! let opcodes: Vec<Opcode> = program.iter().map(|i| i.op).collect();
//! assert_eq!(opcodes, [Opcode::Push, Opcode::Push, Opcode::Add, Opcode::Stoc]);
//! # Ok::<(), excellang::Error>(())
//! ```

pub mod common;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod scope;

pub use common::{Error, Position, Result};
pub use compiler::{Instruction, Opcode, RuntimeValue, lower};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use parser::ast::{BinaryOp, CellAddress, CellRange, Expr, Stmt, UnaryOp};
pub use scope::Scope;

/// Compile a whole program from source text to stack-machine instructions.
///
/// Convenience wrapper over the three stages; use them separately when the
/// tokens or the AST are needed as well.
pub fn compile(source: &str) -> Result<Vec<Instruction>> {
    let tokens = Lexer::new(source).tokenize()?;
    let block = Parser::new(tokens).parse()?;
    Ok(lower(&block))
}
