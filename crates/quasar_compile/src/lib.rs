//! # quasar-compile
//!
//! The Quasar compilation pipeline: semantic analysis over the AST from
//! `quasar-syntax`, and deterministic emission of Python 3.10+ source.
//!
//! ## Architecture
//!
//! ```text
//! Quasar Source
//!      │
//!      ▼
//! ┌─────────┐     ┌───────────┐     ┌──────────┐
//! │  Lexer  │ ──▶ │  Parser   │ ──▶ │   AST    │
//! └─────────┘     └───────────┘     └──────────┘
//!    (quasar-syntax)                      │
//!      ┌──────────────────────────────────┘
//!      ▼
//! ┌─────────────────────────────────────────────┐
//! │              Semantic Analysis               │
//! │  ┌────────┐ ┌─────────┐ ┌───────┐ ┌───────┐ │
//! │  │ Scopes │ │  Types  │ │Methods│ │Imports│ │
//! │  └────────┘ └─────────┘ └───────┘ └───────┘ │
//! └─────────────────────┬───────────────────────┘
//!                       ▼
//!               ┌──────────────┐     ┌─────────────┐
//!               │   Emitter    │ ──▶ │ Python text │
//!               └──────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: scope discipline, the closed type system, primitive
//!   method dispatch, return-path analysis, module imports
//! - [`codegen`]: AST to Python text
//! - [`compile`]: the stage facade and whole-file entry points
//!
//! ## Getting Started
//!
//! ```
//! use quasar_compile::compile::{compile_source, MapResolver};
//! use std::path::Path;
//!
//! let source = r#"
//! fn double(x: int) -> int { return x * 2 }
//! print(double(21))
//! "#;
//! let output = compile_source(source, Path::new("."), &MapResolver::new()).unwrap();
//! assert!(output.python.contains("def double(x):"));
//! ```

pub mod analysis;
pub mod codegen;
pub mod compile;

pub use analysis::{
    Analyzer, CompiledModule, FsResolver, ImportResolver, ImportState, MapResolver,
    ResolvedImport,
};
pub use codegen::codegen_program;
pub use compile::{analyze, compile, compile_file, compile_source, emit, lex, parse};
pub use compile::{Analysis, CompileOutput};
