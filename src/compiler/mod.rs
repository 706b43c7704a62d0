//! Lowering pass: statement AST → flat stack-machine instruction stream.
//!
//! Traversal is depth-first and post-order: operands are lowered before
//! the instruction that consumes them, sibling statements in source order.
//! For any well-formed input the instructions of one expression leave
//! exactly one net value on the stack, and a statement leaves the stack as
//! it found it (a bare expression statement leaves its one value for the
//! executor to keep or pop).
//!
//! Lowering is infallible: the typed AST makes unsupported node kinds and
//! operators unrepresentable.

pub mod instruction;

pub use instruction::{Instruction, Opcode, RuntimeValue};

use crate::parser::ast::{BinaryOp, CellAddress, CellRange, Expr, Stmt, UnaryOp};

/// Lower one statement tree into its instruction sequence.
pub fn lower(statement: &Stmt) -> Vec<Instruction> {
    let mut compiler = Compiler::default();
    compiler.lower_statement(statement);
    compiler.instructions
}

#[derive(Default)]
struct Compiler {
    instructions: Vec<Instruction>,
}

impl Compiler {
    fn lower_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Block { statements, .. } => {
                for statement in statements {
                    self.lower_statement(statement);
                }
            },
            Stmt::CellAssignment {
                target,
                value,
                position,
            } => {
                self.lower_expression(value);
                self.emit(Instruction::with_args(
                    Opcode::Stoc,
                    cell_args(target),
                    *position,
                ));
            },
            Stmt::RangeAssignment {
                target,
                value,
                position,
            } => {
                self.lower_expression(value);
                self.emit(Instruction::with_args(
                    Opcode::Stor,
                    range_args(target),
                    *position,
                ));
            },
            Stmt::Expression { value, .. } => self.lower_expression(value),
        }
    }

    fn lower_expression(&mut self, expression: &Expr) {
        match expression {
            Expr::Binary {
                op,
                lhs,
                rhs,
                position,
            } => {
                self.lower_expression(lhs);
                self.lower_expression(rhs);
                let op = match op {
                    BinaryOp::Add => Opcode::Add,
                    BinaryOp::Sub => Opcode::Sub,
                    BinaryOp::Mul => Opcode::Mul,
                    BinaryOp::Div => Opcode::Div,
                };
                self.emit(Instruction::new(op, *position));
            },
            Expr::Unary {
                op,
                operand,
                position,
            } => {
                self.lower_expression(operand);
                let op = match op {
                    UnaryOp::Plus => Opcode::UPlus,
                    UnaryOp::Minus => Opcode::UMinus,
                };
                self.emit(Instruction::new(op, *position));
            },
            Expr::Call {
                name,
                args,
                position,
            } => {
                for arg in args {
                    self.lower_expression(arg);
                }
                self.emit(Instruction::with_args(
                    Opcode::Call,
                    [
                        RuntimeValue::string(name.clone(), *position),
                        RuntimeValue::number(args.len() as f64, *position),
                    ],
                    *position,
                ));
            },
            Expr::Number {
                value, position, ..
            } => {
                self.emit(Instruction::with_args(
                    Opcode::Push,
                    [RuntimeValue::number(*value, *position)],
                    *position,
                ));
            },
            // An elided call argument pushes numeric zero.
            Expr::Null { position } => {
                self.emit(Instruction::with_args(
                    Opcode::Push,
                    [RuntimeValue::number(0.0, *position)],
                    *position,
                ));
            },
            Expr::Cell { address, position } => {
                self.emit(Instruction::with_args(
                    Opcode::Lodc,
                    cell_args(address),
                    *position,
                ));
            },
            Expr::Range { range, position } => {
                self.emit(Instruction::with_args(
                    Opcode::Lodr,
                    range_args(range),
                    *position,
                ));
            },
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

fn cell_args(address: &CellAddress) -> [RuntimeValue; 2] {
    [
        RuntimeValue::string(address.column(), address.position()),
        RuntimeValue::number(address.row() as f64, address.position()),
    ]
}

fn range_args(range: &CellRange) -> [RuntimeValue; 4] {
    let [corner1_column, corner1_row] = cell_args(&range.corner1);
    let [corner2_column, corner2_row] = cell_args(&range.corner2);
    [corner1_column, corner1_row, corner2_column, corner2_row]
}
