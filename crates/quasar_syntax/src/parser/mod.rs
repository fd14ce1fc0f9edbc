//! Recursive-descent parser: token stream to AST.
//!
//! One parse function per grammar production, with spans merged upward as
//! nodes are built. The parser consumes the token vector produced by the
//! lexer and either returns a complete [`Program`] or the aggregated list
//! of syntax diagnostics — never a partial tree.
//!
//! # Disambiguation
//!
//! Three constructs overlap at the token level and are settled here:
//!
//! - `{ ... }` in statement position is a dict literal when the token after
//!   `{` is followed by `:`; otherwise it is a block statement.
//! - `IDENT { ... }` in expression position is a struct initializer when
//!   the braces are empty or open with `IDENT :`. Inside `if`/`while`
//!   conditions and `for` iterables struct initializers are suppressed so
//!   the `{` can open the body; parentheses re-enable them.
//! - `a.b` parses as member access and `a.b(...)` as a method call; whether
//!   `a.b` is actually an enum variant is the analyzer's decision.
//!
//! # Error Recovery
//!
//! On a syntax error the parser records one diagnostic and skips to the
//! next statement keyword or past the next `}`, so a file with several
//! independent mistakes reports them all in one run.

mod expr;
#[cfg(test)]
mod tests;

use crate::ast::{
    Block, Decl, EnumDecl, Expr, ExprKind, FnDecl, ImportDecl, ImportTarget, Item, Param,
    PrintStmt, Program, Stmt, StructDecl, TypeExpr, TypeExprKind, VarDecl,
};
use crate::ast::format_placeholders;
use crate::token::{Token, TokenKind};
use quasar_base::{Diagnostic, DiagnosticCode, Span, Symbol};

/// Result of one production; the diagnostic is already recorded when `Err`.
pub(crate) type ParseResult<T> = Result<T, ()>;

/// Builds a [`Program`] from tokens via recursive descent.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// Set while parsing `if`/`while` conditions and `for` iterables, where
    /// a `{` always opens the body rather than a struct initializer.
    pub(crate) no_struct_literal: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            no_struct_literal: false,
        }
    }

    /// Parses the whole token stream.
    ///
    /// Returns the complete tree, or every syntax diagnostic found. A tree
    /// is never returned alongside diagnostics.
    pub fn parse_program(mut self) -> Result<Program, Vec<Diagnostic>> {
        let mut items = Vec::new();

        while !self.at_eof() {
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(()) => self.synchronize(),
            }
        }

        if self.diagnostics.is_empty() {
            Ok(Program { items })
        } else {
            Err(self.diagnostics)
        }
    }

    // ── Token access ────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind().same_kind(kind)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the expected token or records `E0011`/`E0012`.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.peek().clone();
        let (code, message) = if matches!(found.kind, TokenKind::Eof) {
            (
                DiagnosticCode::UnexpectedEof,
                format!("expected {}, found end of input", kind.describe()),
            )
        } else {
            (
                DiagnosticCode::ExpectedToken,
                format!("expected {}, found {}", kind.describe(), found.kind.describe()),
            )
        };
        self.error(code, message, found.span);
        Err(())
    }

    /// Consumes an identifier or records a diagnostic naming `what`.
    pub(crate) fn expect_ident(&mut self, what: &str) -> ParseResult<(Symbol, Span)> {
        if let TokenKind::Ident(sym) = *self.peek_kind() {
            let token = self.advance();
            return Ok((sym, token.span));
        }
        let found = self.peek().clone();
        let (code, message) = if matches!(found.kind, TokenKind::Eof) {
            (
                DiagnosticCode::UnexpectedEof,
                format!("expected {}, found end of input", what),
            )
        } else {
            (
                DiagnosticCode::ExpectedToken,
                format!("expected {}, found {}", what, found.kind.describe()),
            )
        };
        self.error(code, message, found.span);
        Err(())
    }

    pub(crate) fn error(&mut self, code: DiagnosticCode, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::new(code, message, span));
    }

    /// Skips to the next plausible statement start after an error.
    fn synchronize(&mut self) {
        while !self.at_eof() {
            if matches!(self.peek_kind(), TokenKind::RBrace) {
                self.advance();
                return;
            }
            if matches!(
                self.peek_kind(),
                TokenKind::Let
                    | TokenKind::Const
                    | TokenKind::Fn
                    | TokenKind::Struct
                    | TokenKind::Enum
                    | TokenKind::Import
                    | TokenKind::If
                    | TokenKind::While
                    | TokenKind::For
                    | TokenKind::Return
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Print
            ) {
                return;
            }
            self.advance();
        }
    }

    // ── Items and declarations ──────────────────────────────────────────

    fn parse_item(&mut self) -> ParseResult<Item> {
        let item = match self.peek_kind() {
            TokenKind::Fn => Item::Decl(self.parse_fn()?),
            TokenKind::Struct => Item::Decl(self.parse_struct()?),
            TokenKind::Enum => Item::Decl(self.parse_enum()?),
            TokenKind::Import => Item::Decl(self.parse_import()?),
            TokenKind::Let | TokenKind::Const => Item::Decl(self.parse_var_decl()?),
            _ => Item::Stmt(self.parse_stmt()?),
        };
        Ok(item)
    }

    /// `let IDENT : TYPE = EXPR` or `const IDENT : TYPE = EXPR`.
    /// The declared type is mandatory; there is no inference.
    fn parse_var_decl(&mut self) -> ParseResult<Decl> {
        let keyword = self.advance();
        let is_const = matches!(keyword.kind, TokenKind::Const);
        let (name, _) = self.expect_ident("a binding name")?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Assign)?;
        let init = self.parse_expr()?;
        let span = keyword.span.merge(&init.span);
        let decl = VarDecl {
            name,
            ty,
            init,
            span,
        };
        Ok(if is_const {
            Decl::Const(decl)
        } else {
            Decl::Var(decl)
        })
    }

    /// `fn IDENT ( PARAM , ... ) -> TYPE BLOCK`.
    fn parse_fn(&mut self) -> ParseResult<Decl> {
        let keyword = self.advance();
        let (name, _) = self.expect_ident("a function name")?;
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (param_name, param_span) = self.expect_ident("a parameter name")?;
                self.expect(&TokenKind::Colon)?;
                let ty = self.parse_type()?;
                let span = param_span.merge(&ty.span);
                params.push(Param {
                    name: param_name,
                    ty,
                    span,
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Arrow)?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;
        let span = keyword.span.merge(&body.span);

        Ok(Decl::Fn(FnDecl {
            name,
            params,
            return_type,
            body,
            span,
        }))
    }

    /// `struct IDENT { field : TYPE , ... }`.
    fn parse_struct(&mut self) -> ParseResult<Decl> {
        let keyword = self.advance();
        let (name, _) = self.expect_ident("a struct name")?;
        self.expect(&TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            let (field, _) = self.expect_ident("a field name")?;
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            fields.push((field, ty));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBrace)?;
        let span = keyword.span.merge(&close.span);

        Ok(Decl::Struct(StructDecl { name, fields, span }))
    }

    /// `enum IDENT { Variant , ... }`.
    fn parse_enum(&mut self) -> ParseResult<Decl> {
        let keyword = self.advance();
        let (name, _) = self.expect_ident("an enum name")?;
        self.expect(&TokenKind::LBrace)?;

        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            let (variant, _) = self.expect_ident("a variant name")?;
            variants.push(variant);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBrace)?;
        let span = keyword.span.merge(&close.span);

        Ok(Decl::Enum(EnumDecl {
            name,
            variants,
            span,
        }))
    }

    /// `import IDENT` or `import "./path.qsr"`.
    fn parse_import(&mut self) -> ParseResult<Decl> {
        let keyword = self.advance();
        match self.peek_kind().clone() {
            TokenKind::Ident(sym) => {
                let token = self.advance();
                let span = keyword.span.merge(&token.span);
                Ok(Decl::Import(ImportDecl {
                    target: ImportTarget::Python(sym),
                    span,
                }))
            }
            TokenKind::Str(path) => {
                let token = self.advance();
                let span = keyword.span.merge(&token.span);
                Ok(Decl::Import(ImportDecl {
                    target: ImportTarget::Local(path),
                    span,
                }))
            }
            _ => {
                let found = self.peek().clone();
                self.error(
                    DiagnosticCode::ExpectedToken,
                    format!(
                        "expected a module name or a quoted path after `import`, found {}",
                        found.kind.describe()
                    ),
                    found.span,
                );
                Err(())
            }
        }
    }

    // ── Statements ──────────────────────────────────────────────────────

    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            stmts.push(self.parse_block_stmt()?);
        }
        let close = self.expect(&TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: open.span.merge(&close.span),
        })
    }

    fn parse_block_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Let | TokenKind::Const => Ok(Stmt::Decl(self.parse_var_decl()?)),
            TokenKind::Fn | TokenKind::Struct | TokenKind::Enum | TokenKind::Import => {
                let found = self.peek().clone();
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    format!(
                        "{} declarations are only allowed at the top level",
                        found.kind.describe()
                    ),
                    found.span,
                );
                Err(())
            }
            _ => self.parse_stmt(),
        }
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Return => {
                let keyword = self.advance();
                let value = self.parse_expr()?;
                let span = keyword.span.merge(&value.span);
                Ok(Stmt::Return { value, span })
            }
            TokenKind::Break => {
                let token = self.advance();
                Ok(Stmt::Break(token.span))
            }
            TokenKind::Continue => {
                let token = self.advance();
                Ok(Stmt::Continue(token.span))
            }
            TokenKind::LBrace if !self.brace_opens_dict() => {
                let block = self.parse_block()?;
                Ok(Stmt::Block(block))
            }
            _ => self.parse_expr_or_assign(),
        }
    }

    /// Dict literal vs block statement: a dict when the token after `{` is
    /// followed by `:`. The empty `{}` is an (empty) block.
    fn brace_opens_dict(&self) -> bool {
        !matches!(self.peek_at(1), TokenKind::RBrace) && matches!(self.peek_at(2), TokenKind::Colon)
    }

    /// `if EXPR BLOCK (else BLOCK)?` — no parentheses around the condition.
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let cond = self.parse_header_expr()?;
        let then_block = self.parse_block()?;
        let mut span = keyword.span.merge(&then_block.span);
        let else_block = if self.eat(&TokenKind::Else) {
            let block = self.parse_block()?;
            span = span.merge(&block.span);
            Some(block)
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_block,
            else_block,
            span,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let cond = self.parse_header_expr()?;
        let body = self.parse_block()?;
        let span = keyword.span.merge(&body.span);
        Ok(Stmt::While { cond, body, span })
    }

    /// `for IDENT in EXPR BLOCK` where the iterable may be `start..end`.
    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let (var, var_span) = self.expect_ident("a loop variable")?;
        self.expect(&TokenKind::In)?;

        let start = self.parse_header_expr()?;
        let iterable = if self.eat(&TokenKind::DotDot) {
            let end = self.parse_header_expr()?;
            let span = start.span.merge(&end.span);
            Expr::new(ExprKind::Range(Box::new(start), Box::new(end)), span)
        } else {
            start
        };

        let body = self.parse_block()?;
        let span = keyword.span.merge(&body.span);
        Ok(Stmt::For {
            var,
            var_span,
            iterable,
            body,
            span,
        })
    }

    /// Parses a condition or iterable, where `{` belongs to the body.
    fn parse_header_expr(&mut self) -> ParseResult<Expr> {
        let saved = self.no_struct_literal;
        self.no_struct_literal = true;
        let result = self.parse_expr();
        self.no_struct_literal = saved;
        result
    }

    /// `print ( ARGS )` with optional trailing `sep=` / `end=`.
    fn parse_print(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        self.expect(&TokenKind::LParen)?;

        let mut args = Vec::new();
        let mut sep: Option<Expr> = None;
        let mut end: Option<Expr> = None;

        if !self.check(&TokenKind::RParen) {
            loop {
                match self.peek_kind() {
                    TokenKind::Sep => {
                        let token = self.advance();
                        self.expect(&TokenKind::Assign)?;
                        let value = self.parse_expr()?;
                        if sep.is_some() {
                            self.error(
                                DiagnosticCode::DuplicateSep,
                                "`sep` given more than once".to_string(),
                                token.span,
                            );
                        } else {
                            sep = Some(value);
                        }
                    }
                    TokenKind::End => {
                        let token = self.advance();
                        self.expect(&TokenKind::Assign)?;
                        let value = self.parse_expr()?;
                        if end.is_some() {
                            self.error(
                                DiagnosticCode::DuplicateEnd,
                                "`end` given more than once".to_string(),
                                token.span,
                            );
                        } else {
                            end = Some(value);
                        }
                    }
                    _ => {
                        let arg = self.parse_expr()?;
                        if sep.is_some() || end.is_some() {
                            self.error(
                                DiagnosticCode::UnexpectedToken,
                                "positional arguments must come before `sep` and `end`"
                                    .to_string(),
                                arg.span.clone(),
                            );
                        }
                        args.push(arg);
                    }
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.expect(&TokenKind::RParen)?;
        let span = keyword.span.merge(&close.span);

        let format_mode = match args.first() {
            Some(Expr {
                kind: ExprKind::Str { value, .. },
                ..
            }) => format_placeholders(value) > 0,
            _ => false,
        };

        Ok(Stmt::Print(PrintStmt {
            args,
            sep,
            end,
            format_mode,
            span,
        }))
    }

    /// A statement beginning with an expression: plain expression statement,
    /// or an assignment when `=` follows.
    fn parse_expr_or_assign(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        if self.check(&TokenKind::Assign) {
            self.advance();
            let value = self.parse_expr()?;
            if !matches!(
                expr.kind,
                ExprKind::Ident(_) | ExprKind::Index { .. } | ExprKind::Member { .. }
            ) {
                self.error(
                    DiagnosticCode::InvalidAssignmentTarget,
                    "left-hand side of `=` must be a name, index, or member access".to_string(),
                    expr.span.clone(),
                );
                return Err(());
            }
            let span = expr.span.merge(&value.span);
            return Ok(Stmt::Assign {
                target: expr,
                value,
                span,
            });
        }
        Ok(Stmt::Expr(expr))
    }

    // ── Type annotations ────────────────────────────────────────────────

    /// `int | float | bool | str | [TYPE] | Dict[TYPE, TYPE] | IDENT`.
    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        match self.peek_kind().clone() {
            TokenKind::KwInt => {
                let token = self.advance();
                Ok(TypeExpr {
                    kind: TypeExprKind::Int,
                    span: token.span,
                })
            }
            TokenKind::KwFloat => {
                let token = self.advance();
                Ok(TypeExpr {
                    kind: TypeExprKind::Float,
                    span: token.span,
                })
            }
            TokenKind::KwBool => {
                let token = self.advance();
                Ok(TypeExpr {
                    kind: TypeExprKind::Bool,
                    span: token.span,
                })
            }
            TokenKind::KwStr => {
                let token = self.advance();
                Ok(TypeExpr {
                    kind: TypeExprKind::Str,
                    span: token.span,
                })
            }
            TokenKind::LBracket => {
                let open = self.advance();
                let elem = self.parse_type()?;
                let close = self.expect(&TokenKind::RBracket)?;
                Ok(TypeExpr {
                    kind: TypeExprKind::List(Box::new(elem)),
                    span: open.span.merge(&close.span),
                })
            }
            TokenKind::KwDict => {
                let keyword = self.advance();
                self.expect(&TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(&TokenKind::Comma)?;
                let value = self.parse_type()?;
                let close = self.expect(&TokenKind::RBracket)?;
                Ok(TypeExpr {
                    kind: TypeExprKind::Dict(Box::new(key), Box::new(value)),
                    span: keyword.span.merge(&close.span),
                })
            }
            TokenKind::Ident(sym) => {
                let token = self.advance();
                Ok(TypeExpr {
                    kind: TypeExprKind::Named(sym),
                    span: token.span,
                })
            }
            _ => {
                let found = self.peek().clone();
                self.error(
                    DiagnosticCode::ExpectedToken,
                    format!("expected a type, found {}", found.kind.describe()),
                    found.span,
                );
                Err(())
            }
        }
    }
}
