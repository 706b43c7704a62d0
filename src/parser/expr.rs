//! Expression-level productions: precedence climbing, cell/range
//! disambiguation, and call argument lists.
//!
//! Precedence, low to high: additive (`+ -`, left-associative) →
//! multiplicative (`* /`, left-associative) → unary prefix (`+ -`,
//! right-associative) → primary.

use crate::common::{Error, Result};
use crate::lexer::TokenKind;

use super::ast::{BinaryOp, CellAddress, CellRange, Expr, UnaryOp};
use super::{Parser, describe};

impl Parser {
    pub(super) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();

            let rhs = self.parse_multiplicative()?;
            let position = lhs.position();
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                position,
            };
        }

        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();

            let rhs = self.parse_unary()?;
            let position = lhs.position();
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                position,
            };
        }

        Ok(lhs)
    }

    /// Unary expressions report the position of their sign token.
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        let sign = self.bump();

        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            position: sign.position,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number { has_decimal } => {
                self.advance();
                let value: f64 = fast_float2::parse(&token.text).map_err(|_| {
                    Error::InvalidNumber {
                        position: token.position,
                    }
                })?;
                Ok(Expr::Number {
                    value,
                    has_decimal,
                    position: token.position,
                })
            },
            TokenKind::LeftParen => {
                self.advance();
                let mut inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                // Callers observe the parenthesized form at the '('.
                inner.set_position(token.position);
                Ok(inner)
            },
            TokenKind::Identifier => {
                // An identifier directly followed by a number token is a
                // cell address; the address parser rejects decimal rows.
                // Anything else makes the identifier a function name.
                if matches!(self.peek_next_kind(), Some(TokenKind::Number { .. })) {
                    self.parse_cell_or_range()
                } else {
                    self.parse_call()
                }
            },
            _ => Err(Error::InvalidSyntax {
                found: describe(&token),
                position: token.position,
            }),
        }
    }

    /// One cell address, extended to a range when a `:` follows. Shared by
    /// expression context and assignment targets; the statement layer
    /// decides which wrapper to build when `=` follows.
    fn parse_cell_or_range(&mut self) -> Result<Expr> {
        let corner1 = self.parse_cell_address()?;
        let position = corner1.position();

        if self.at(TokenKind::Colon) {
            self.advance();
            let corner2 = self.parse_cell_address()?;
            Ok(Expr::Range {
                range: CellRange::new(corner1, corner2),
                position,
            })
        } else {
            Ok(Expr::Cell {
                address: corner1,
                position,
            })
        }
    }

    fn parse_cell_address(&mut self) -> Result<CellAddress> {
        let column = self.expect(TokenKind::Identifier)?;

        let row = self.current().clone();
        let TokenKind::Number { has_decimal } = row.kind else {
            return Err(Error::UnexpectedToken {
                expected: "number".to_string(),
                found: describe(&row),
                position: row.position,
            });
        };
        if has_decimal {
            return Err(Error::InvalidRowNumber {
                text: row.text,
                position: row.position,
            });
        }
        let Ok(row_value) = atoi_simd::parse::<u64>(row.text.as_bytes()) else {
            return Err(Error::InvalidRowNumber {
                text: row.text,
                position: row.position,
            });
        };
        self.advance();

        CellAddress::new(column.text, row_value, column.position)
    }

    /// `name ( slot , slot , ... )` where a slot is an expression or, when
    /// elided, a null placeholder. A comma directly before `)` is a plain
    /// separator and contributes no slot.
    fn parse_call(&mut self) -> Result<Expr> {
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        if !self.at(TokenKind::RightParen) {
            loop {
                match self.current().kind {
                    // Elided slot: `f(a, , b)` or `f(, a)`.
                    TokenKind::Comma => args.push(Expr::Null {
                        position: self.current().position,
                    }),
                    TokenKind::RightParen => break,
                    _ => args.push(self.parse_expression()?),
                }

                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        Ok(Expr::Call {
            name: name.text,
            args,
            position: name.position,
        })
    }
}
