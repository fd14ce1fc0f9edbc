//! # quasar-syntax
//!
//! The surface syntax of the Quasar language: token vocabulary, lexer,
//! abstract syntax tree, the closed type universe, and the
//! recursive-descent parser.
//!
//! # Pipeline Position
//!
//! ```text
//! ┌────────┐     ┌────────┐     ┌───────┐
//! │ Source │ ──▶ │ Lexer  │ ──▶ │ Parser│ ──▶ AST
//! └────────┘     └────────┘     └───────┘
//!                 (HERE)          (HERE)
//! ```
//!
//! Semantic analysis and Python emission live in `quasar-compile`; this
//! crate knows nothing about scopes, imports, or the target language.
//!
//! # Example
//!
//! ```
//! use quasar_base::Interner;
//! use quasar_syntax::{Lexer, Parser};
//!
//! let mut interner = Interner::new();
//! let (tokens, diagnostics) = Lexer::new("let x: int = 1", &mut interner).tokenize();
//! assert!(diagnostics.is_empty());
//!
//! let program = Parser::new(tokens).parse_program().unwrap();
//! assert_eq!(program.items.len(), 1);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod types;

pub use ast::{
    BinaryOp, Block, CastKind, Decl, EnumDecl, Expr, ExprKind, FnDecl, ImportDecl, ImportTarget,
    Item, Param, PrintStmt, Program, Stmt, StructDecl, TypeExpr, TypeExprKind, UnaryOp, VarDecl,
};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};
pub use types::Type;
