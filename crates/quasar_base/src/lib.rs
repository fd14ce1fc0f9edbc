//! # quasar-base
//!
//! Structural atoms for the Quasar compiler.
//!
//! This crate provides the foundational types shared by every pipeline stage:
//!
//! - [`Span`] — 1-indexed source positions with file identity
//! - [`Interner`]/[`Symbol`] — string interning for O(1) identifier equality
//! - [`Diagnostic`]/[`DiagnosticCode`] — structured errors with stable codes
//!
//! # Design Principles
//!
//! This crate has **no knowledge of Quasar syntax or I/O**. It provides only
//! generic, reusable infrastructure that the lexer, parser, analyzer, and
//! emitter build upon. The core never prints; diagnostics are data, and the
//! CLI decides how to render them.
//!
//! # Example
//!
//! ```
//! use quasar_base::{Diagnostic, DiagnosticCode, Interner, Span};
//!
//! let mut interner = Interner::new();
//! let name = interner.intern("x");
//!
//! let span = Span::new(1, 5, 1, 6);
//! let diag = Diagnostic::new(
//!     DiagnosticCode::UndefinedName,
//!     format!("`{}` is not defined", interner.resolve(name)),
//!     span,
//! );
//! assert_eq!(diag.code.as_str(), "E0001");
//! ```

pub mod diagnostic;
pub mod intern;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use intern::{Interner, Symbol};
pub use span::Span;
