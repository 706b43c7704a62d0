//! Recursive-descent parser: token stream → statement AST.
//!
//! The statement layer lives here; expression-level productions are in
//! [`expr`]. The parser commits as it goes — one token of lookahead plus
//! the identifier/number peek that disambiguates cell addresses from
//! function calls — and the first syntax error aborts the whole parse.

pub mod ast;
mod expr;

use crate::common::{Error, Position, Result};
use crate::lexer::{Token, TokenKind};
use ast::{Expr, Stmt};

/// Parses one token stream into a single block statement.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Take ownership of a token stream. A trailing `Eof` marker is
    /// guaranteed afterwards even if the caller built the vector by hand.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof)) {
            let position = tokens
                .last()
                .map(|token| token.position)
                .unwrap_or(Position::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", position));
        }
        Self { tokens, pos: 0 }
    }

    /// Parse the whole program into one `Stmt::Block`.
    ///
    /// Statements are separated by one or more newline/`;` tokens; leading
    /// and trailing separators are skipped.
    pub fn parse(mut self) -> Result<Stmt> {
        let mut statements = Vec::new();

        self.skip_separators();
        while !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.expect_statement_end()?;
            self.skip_separators();
        }

        let position = statements
            .first()
            .map(Stmt::position)
            .unwrap_or(Position::ZERO);
        Ok(Stmt::Block {
            statements,
            position,
        })
    }

    /// One statement: an assignment when the parsed expression is exactly a
    /// cell or range reference followed by `=`, otherwise an expression
    /// statement.
    fn parse_statement(&mut self) -> Result<Stmt> {
        let value = self.parse_expression()?;

        if self.at(TokenKind::Equals) {
            match value {
                Expr::Cell { address, position } => {
                    self.advance();
                    let value = self.parse_expression()?;
                    return Ok(Stmt::CellAssignment {
                        target: address,
                        value,
                        position,
                    });
                },
                Expr::Range { range, position } => {
                    self.advance();
                    let value = self.parse_expression()?;
                    return Ok(Stmt::RangeAssignment {
                        target: range,
                        value,
                        position,
                    });
                },
                // `=` after anything else falls through to the separator
                // check below and is reported there.
                other => {
                    let position = other.position();
                    return Ok(Stmt::Expression {
                        value: other,
                        position,
                    });
                },
            }
        }

        let position = value.position();
        Ok(Stmt::Expression { value, position })
    }

    /// A statement must be followed by a newline, `;`, or end of input.
    fn expect_statement_end(&self) -> Result<()> {
        let token = self.current();
        if token.kind.is_separator() || token.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(Error::MissingSeparator {
                found: describe(token),
                position: token.position,
            })
        }
    }

    fn skip_separators(&mut self) {
        while self.current().kind.is_separator() {
            self.advance();
        }
    }

    // Cursor helpers shared with the expression layer.

    fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof and `advance` never steps past it.
        &self.tokens[self.pos]
    }

    fn peek_next_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos + 1).map(|token| token.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume and return the current token.
    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        self.advance();
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            let token = self.current();
            Err(Error::UnexpectedToken {
                expected: kind.to_string(),
                found: describe(token),
                position: token.position,
            })
        }
    }
}

/// Human-friendly rendering of a token for diagnostics.
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "EOF".to_string(),
        TokenKind::Newline => "newline".to_string(),
        _ => token.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::ast::{BinaryOp, Expr, Stmt};
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Result<Stmt> {
        Parser::new(Lexer::new(source).tokenize()?).parse()
    }

    fn single_statement(source: &str) -> Stmt {
        match parse(source).unwrap() {
            Stmt::Block { mut statements, .. } => {
                assert_eq!(statements.len(), 1);
                statements.pop().unwrap()
            },
            other => panic!("expected a block, got {other:?}"),
        }
    }

    fn single_expression(source: &str) -> Expr {
        match single_statement(source) {
            Stmt::Expression { value, .. } => value,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn binary_precedence_and_associativity() {
        // 1 * 2 - 3 parses as (1 * 2) - 3.
        let Expr::Binary { op, lhs, rhs, .. } = single_expression("1 * 2 - 3") else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(
            *lhs,
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
        assert!(matches!(*rhs, Expr::Number { value, .. } if value == 3.0));
    }

    #[test]
    fn number_literals_keep_value_and_decimal_flag() {
        let Expr::Number {
            value, has_decimal, ..
        } = single_expression("1.5")
        else {
            panic!("expected a number literal");
        };
        assert_eq!(value, 1.5);
        assert!(has_decimal);

        let Expr::Number {
            value, has_decimal, ..
        } = single_expression("42")
        else {
            panic!("expected a number literal");
        };
        assert_eq!(value, 42.0);
        assert!(!has_decimal);
    }

    #[test]
    fn bare_cell_reference_statement() {
        let Expr::Cell { address, .. } = single_expression("A1") else {
            panic!("expected a cell reference");
        };
        assert_eq!(address.column(), "A");
        assert_eq!(address.row(), 1);
    }

    #[test]
    fn range_reference() {
        let Expr::Range { range, .. } = single_expression("b2:AA10") else {
            panic!("expected a range reference");
        };
        assert_eq!(range.corner1.column(), "b");
        assert_eq!(range.corner1.row(), 2);
        assert_eq!(range.corner2.column(), "AA");
        assert_eq!(range.corner2.row(), 10);
    }

    #[test]
    fn unary_binds_tighter_than_multiplication() {
        // 2 * -3 parses with the negation inside the product.
        let Expr::Binary { op, rhs, .. } = single_expression("2 * -3") else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOp::Mul);
        assert!(matches!(*rhs, Expr::Unary { .. }));
    }

    #[test]
    fn call_with_elided_arguments_keeps_slots() {
        let Expr::Call { name, args, .. } = single_expression("F(A1, , , 69)") else {
            panic!("expected a call");
        };
        assert_eq!(name, "F");
        assert_eq!(args.len(), 4);
        assert!(matches!(args[0], Expr::Cell { .. }));
        assert!(matches!(args[1], Expr::Null { .. }));
        assert!(matches!(args[2], Expr::Null { .. }));
        assert!(matches!(args[3], Expr::Number { value, .. } if value == 69.0));
    }

    #[test]
    fn call_argument_edge_shapes() {
        let Expr::Call { args, .. } = single_expression("f()") else {
            panic!("expected a call");
        };
        assert!(args.is_empty());

        // A trailing comma is a separator with nothing after it.
        let Expr::Call { args, .. } = single_expression("f(1,)") else {
            panic!("expected a call");
        };
        assert_eq!(args.len(), 1);

        // A leading comma elides the first slot.
        let Expr::Call { args, .. } = single_expression("f(,1)") else {
            panic!("expected a call");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(args[0], Expr::Null { .. }));
    }

    #[test]
    fn cell_assignment() {
        let Stmt::CellAssignment { target, value, .. } = single_statement("A1 = 1 + 2") else {
            panic!("expected a cell assignment");
        };
        assert_eq!(target.column(), "A");
        assert_eq!(target.row(), 1);
        assert!(matches!(value, Expr::Binary { .. }));
    }

    #[test]
    fn range_assignment() {
        let Stmt::RangeAssignment { target, .. } = single_statement("A1:B2 = 3") else {
            panic!("expected a range assignment");
        };
        assert_eq!(target.normalized(), ((1, 2), (1, 2)));
    }

    #[test]
    fn statements_separated_by_newlines_and_semicolons() {
        let Stmt::Block { statements, .. } = parse("1\n2;3\n\n;4").unwrap() else {
            panic!("expected a block");
        };
        assert_eq!(statements.len(), 4);
    }

    #[test]
    fn empty_program_is_an_empty_block() {
        let Stmt::Block { statements, .. } = parse("\n;\n").unwrap() else {
            panic!("expected a block");
        };
        assert!(statements.is_empty());
    }

    #[test]
    fn decimal_row_is_an_invalid_row_number() {
        let err = parse("A1.5").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidRowNumber {
                text: "1.5".to_string(),
                position: Position::new(1, 2),
            }
        );
    }

    #[test]
    fn missing_separator_between_statements() {
        let err = parse("1 2").unwrap_err();
        assert!(matches!(err, Error::MissingSeparator { .. }));
        assert_eq!(err.position(), Position::new(1, 3));
    }

    #[test]
    fn equals_after_non_reference_is_reported() {
        let err = parse("1 + 1 = 2").unwrap_err();
        assert!(matches!(err, Error::MissingSeparator { .. }));
    }

    #[test]
    fn parenthesized_expression_reports_paren_position() {
        let expr = single_expression("  (1 + 2)");
        assert_eq!(expr.position(), Position::new(1, 3));
    }

    #[test]
    fn paren_must_be_closed() {
        let err = parse("(1 + 2").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn statement_positions_come_from_first_token() {
        let statement = single_statement("A1 = 5");
        assert_eq!(statement.position(), Position::new(1, 1));

        let expr = single_expression("-3");
        assert_eq!(expr.position(), Position::new(1, 1));
    }

    #[test]
    fn call_requires_parentheses() {
        let err = parse("SUM + 1").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn identifier_followed_by_integer_is_always_a_cell() {
        // Spreadsheet disambiguation: `SUM 1` is the cell SUM1, not a call.
        let Expr::Cell { address, .. } = single_expression("SUM 1") else {
            panic!("expected a cell reference");
        };
        assert_eq!(address.column(), "SUM");
        assert_eq!(address.row(), 1);
    }

    #[test]
    fn garbage_primary_is_invalid_syntax() {
        let err = parse("1 + *").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidSyntax {
                found: "*".to_string(),
                position: Position::new(1, 5),
            }
        );
    }

    #[test]
    fn cell_reference_inside_larger_expression() {
        // The reference participates in a larger expression; no '=' follows,
        // so this is a plain expression statement.
        let value = single_expression("A1 + 1");
        assert!(matches!(value, Expr::Binary { .. }));
    }
}
