//! Expression parsing: precedence climbing over the thirteen binary
//! operators, unary operators, and the postfix chain (call, index, member,
//! method call).
//!
//! Precedence, lowest to highest: `||`, `&&`, equality, comparison,
//! additive, multiplicative, unary, postfix. `..` is not handled here; it
//! only appears in `for` headers and is parsed by `parse_for`.

use super::{ParseResult, Parser};
use crate::ast::{BinaryOp, CastKind, Expr, ExprKind, UnaryOp};
use crate::token::TokenKind;
use quasar_base::{DiagnosticCode, Symbol};

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.parse_and()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.parse_equality()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let token = self.advance();
        let operand = self.parse_unary()?;
        let span = token.span.merge(&operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Postfix chain: `(args)`, `[index]`, `.field`, `.method(args)`.
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_args()?;
                    let close = self.expect(&TokenKind::RParen)?;
                    let span = expr.span.merge(&close.span);
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_nested_expr()?;
                    let close = self.expect(&TokenKind::RBracket)?;
                    let span = expr.span.merge(&close.span);
                    expr = Expr::new(
                        ExprKind::Index {
                            receiver: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_span) = self.expect_ident("a member name after `.`")?;
                    if self.check(&TokenKind::LParen) {
                        self.advance();
                        let args = self.parse_args()?;
                        let close = self.expect(&TokenKind::RParen)?;
                        let span = expr.span.merge(&close.span);
                        expr = Expr::new(
                            ExprKind::MethodCall {
                                receiver: Box::new(expr),
                                method: name,
                                args,
                            },
                            span,
                        );
                    } else {
                        let span = expr.span.merge(&name_span);
                        expr = Expr::new(
                            ExprKind::Member {
                                receiver: Box::new(expr),
                                field: name,
                            },
                            span,
                        );
                    }
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek_kind().clone() {
            TokenKind::Int(value) => {
                let token = self.advance();
                Ok(Expr::new(ExprKind::Int(value), token.span))
            }
            TokenKind::Float(value) => {
                let token = self.advance();
                Ok(Expr::new(ExprKind::Float(value), token.span))
            }
            TokenKind::Str(value) => {
                let token = self.advance();
                Ok(Expr::new(
                    ExprKind::Str {
                        value,
                        lexeme: token.lexeme.clone(),
                    },
                    token.span,
                ))
            }
            TokenKind::True => {
                let token = self.advance();
                Ok(Expr::new(ExprKind::Bool(true), token.span))
            }
            TokenKind::False => {
                let token = self.advance();
                Ok(Expr::new(ExprKind::Bool(false), token.span))
            }
            TokenKind::Ident(sym) => {
                let token = self.advance();
                if self.struct_init_follows() {
                    return self.parse_struct_init(sym, token.span);
                }
                Ok(Expr::new(ExprKind::Ident(sym), token.span))
            }
            TokenKind::KwInt | TokenKind::KwFloat | TokenKind::KwStr | TokenKind::KwBool => {
                self.parse_cast()
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_nested_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_dict_literal(),
            TokenKind::Eof => {
                let span = self.peek().span.clone();
                self.error(
                    DiagnosticCode::UnexpectedEof,
                    "expected an expression, found end of input".to_string(),
                    span,
                );
                Err(())
            }
            other => {
                let span = self.peek().span.clone();
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    format!("expected an expression, found {}", other.describe()),
                    span,
                );
                Err(())
            }
        }
    }

    /// `int(x)` / `float(x)` / `str(x)` / `bool(x)`. Type keywords are only
    /// valid in expression position as cast calls.
    fn parse_cast(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::KwInt => CastKind::Int,
            TokenKind::KwFloat => CastKind::Float,
            TokenKind::KwStr => CastKind::Str,
            TokenKind::KwBool => CastKind::Bool,
            _ => unreachable!("parse_cast called on a non-cast keyword"),
        };
        if !self.check(&TokenKind::LParen) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                format!(
                    "{} is a type keyword; in an expression it must be called, e.g. `{}(x)`",
                    token.kind.describe(),
                    kind.python_name()
                ),
                token.span,
            );
            return Err(());
        }
        self.advance();
        let args = self.parse_args()?;
        let close = self.expect(&TokenKind::RParen)?;
        let span = token.span.merge(&close.span);
        Ok(Expr::new(ExprKind::Cast { kind, args }, span))
    }

    /// Lookahead after an identifier: do the braces open a struct
    /// initializer? Empty braces or `IDENT :` qualify, unless a header
    /// context suppressed struct literals.
    fn struct_init_follows(&self) -> bool {
        if self.no_struct_literal || !matches!(self.peek_kind(), TokenKind::LBrace) {
            return false;
        }
        match (self.peek_at(1), self.peek_at(2)) {
            (TokenKind::RBrace, _) => true,
            (TokenKind::Ident(_), TokenKind::Colon) => true,
            _ => false,
        }
    }

    /// `IDENT { field : EXPR , ... }` with the identifier already consumed.
    fn parse_struct_init(&mut self, name: Symbol, name_span: quasar_base::Span) -> ParseResult<Expr> {
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            let (field, _) = self.expect_ident("a field name")?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_nested_expr()?;
            fields.push((field, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBrace)?;
        let span = name_span.merge(&close.span);
        Ok(Expr::new(ExprKind::StructInit { name, fields }, span))
    }

    /// `[ EXPR , ... ]`.
    fn parse_list_literal(&mut self) -> ParseResult<Expr> {
        let open = self.advance();
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_eof() {
            elements.push(self.parse_nested_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(
            ExprKind::List(elements),
            open.span.merge(&close.span),
        ))
    }

    /// `{ KEY : VALUE , ... }`.
    fn parse_dict_literal(&mut self) -> ParseResult<Expr> {
        let open = self.advance();
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            let key = self.parse_nested_expr()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_nested_expr()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(
            ExprKind::Dict(entries),
            open.span.merge(&close.span),
        ))
    }

    /// Call/index/literal interiors re-enable struct initializers even
    /// inside an `if`/`while`/`for` header.
    fn parse_nested_expr(&mut self) -> ParseResult<Expr> {
        let saved = self.no_struct_literal;
        self.no_struct_literal = false;
        let result = self.parse_expr();
        self.no_struct_literal = saved;
        result
    }

    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_nested_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span.merge(&rhs.span);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}
