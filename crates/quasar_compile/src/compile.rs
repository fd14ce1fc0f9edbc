//! The compilation pipeline facade.
//!
//! Four stage operations — [`lex`], [`parse`], [`analyze`], [`emit`] —
//! plus the convenience entry points the CLI drives: [`compile`] (path in,
//! Python text out) and [`compile_file`] (also returns the Python text of
//! every local import, so the caller can write the sibling modules).
//!
//! # Pipeline Overview
//!
//! ```text
//! Quasar Source (.qsr)
//!       │
//!       ▼
//! ┌───────────────────┐
//! │  1. Lexer         │ tokens + lexical diagnostics
//! └─────────┬─────────┘
//!           ▼
//! ┌───────────────────┐
//! │  2. Parser        │ complete AST or syntax diagnostics
//! └─────────┬─────────┘
//!           ▼
//! ┌───────────────────┐
//! │  3. Analyzer      │ types, scopes, imports, return paths
//! └─────────┬─────────┘
//!           ▼
//! ┌───────────────────┐
//! │  4. Emitter       │ deterministic Python text
//! └───────────────────┘
//! ```
//!
//! The pipeline halts at the first stage that produced an error-severity
//! diagnostic; each stage batches everything it found, so one run reports
//! many independent mistakes. Warnings (`E0902`) ride along on success.
//!
//! # Example
//!
//! ```
//! use quasar_compile::compile::{compile_source, MapResolver};
//! use std::path::Path;
//!
//! let output = compile_source(
//!     "let x: int = 2 + 3\nprint(x)",
//!     Path::new("."),
//!     &MapResolver::new(),
//! )
//! .expect("compiles cleanly");
//! assert_eq!(output.python, "x = (2 + 3)\nprint(x)\n");
//! ```

use crate::analysis::{Analyzer, CompiledModule, FsResolver, ImportResolver, ImportState};
use crate::codegen::codegen_program;
use quasar_base::diagnostic::has_errors;
use quasar_base::{Diagnostic, DiagnosticCode, Interner, Span};
use quasar_syntax::{Lexer, Parser, Program, Token};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use crate::analysis::MapResolver;

/// Tokenizes `source`. The token stream always ends with `Eof`; the
/// diagnostics list holds any lexical errors found along the way.
pub fn lex(source: &str, interner: &mut Interner) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source, interner).tokenize()
}

/// Lexes and parses `source` into a complete tree, or returns every
/// lexical and syntactic diagnostic. A partial tree is never returned.
pub fn parse(source: &str, interner: &mut Interner) -> Result<Program, Vec<Diagnostic>> {
    let (tokens, lex_diags) = lex(source, interner);
    if !lex_diags.is_empty() {
        return Err(lex_diags);
    }
    Parser::new(tokens).parse_program()
}

/// The result of semantic analysis: diagnostics plus any local modules
/// that were compiled along the way.
#[derive(Debug)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub modules: Vec<CompiledModule>,
}

/// Semantically validates `program` in place, annotating every expression
/// with its resolved type. Local imports resolve through `resolver`
/// relative to `base_dir`.
pub fn analyze(
    program: &mut Program,
    interner: &mut Interner,
    resolver: &dyn ImportResolver,
    base_dir: &Path,
    file: Option<Arc<str>>,
) -> Analysis {
    let mut imports = ImportState::new();
    let analyzer = Analyzer::new(interner, resolver, &mut imports, base_dir.to_path_buf(), file);
    let diagnostics = analyzer.analyze(program);
    Analysis {
        diagnostics,
        modules: imports.modules,
    }
}

/// Emits Python source for a validated tree. Deterministic: the same tree
/// yields byte-identical text.
pub fn emit(program: &Program, interner: &Interner) -> String {
    codegen_program(program, interner)
}

/// Everything `compile_file` produces for one root file.
#[derive(Debug)]
pub struct CompileOutput {
    /// Python text of the root file.
    pub python: String,
    /// `(module_name, python_text)` for each local import, dependencies
    /// first; the CLI writes each as `<module_name>.py` next to the output.
    pub modules: Vec<(String, String)>,
    /// Non-fatal diagnostics (today: circular-import warnings).
    pub warnings: Vec<Diagnostic>,
}

/// Runs the full pipeline over in-memory source.
pub fn compile_source(
    source: &str,
    base_dir: &Path,
    resolver: &dyn ImportResolver,
) -> Result<CompileOutput, Vec<Diagnostic>> {
    compile_impl(source, base_dir, None, resolver)
}

/// Opens `path`, runs the pipeline, and returns the emitted Python text of
/// the root file, or the accumulated diagnostics.
pub fn compile(path: &Path) -> Result<String, Vec<Diagnostic>> {
    compile_file(path).map(|output| output.python)
}

/// Like [`compile`], but also returns the emitted text of every local
/// import so the caller can materialize the whole module set.
pub fn compile_file(path: &Path) -> Result<CompileOutput, Vec<Diagnostic>> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            return Err(vec![Diagnostic::new(
                DiagnosticCode::ImportNotFound,
                format!("cannot read `{}`: {}", path.display(), err),
                Span::default(),
            )]);
        }
    };
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file: Arc<str> = Arc::from(path.display().to_string());
    compile_impl(&source, &base_dir, Some(file), &FsResolver)
}

fn compile_impl(
    source: &str,
    base_dir: &Path,
    file: Option<Arc<str>>,
    resolver: &dyn ImportResolver,
) -> Result<CompileOutput, Vec<Diagnostic>> {
    let mut interner = Interner::new();

    let mut lexer = Lexer::new(source, &mut interner);
    if let Some(file) = &file {
        lexer = lexer.with_file(file.clone());
    }
    let (tokens, lex_diags) = lexer.tokenize();
    if !lex_diags.is_empty() {
        return Err(lex_diags);
    }

    let mut program = Parser::new(tokens).parse_program()?;

    let mut imports = ImportState::new();
    let analyzer = Analyzer::new(
        &mut interner,
        resolver,
        &mut imports,
        base_dir.to_path_buf(),
        file,
    );
    let diagnostics = analyzer.analyze(&mut program);
    if has_errors(&diagnostics) {
        return Err(diagnostics);
    }

    let python = codegen_program(&program, &interner);
    let modules = imports
        .modules
        .iter()
        .map(|module| {
            (
                module.name.clone(),
                codegen_program(&module.program, &interner),
            )
        })
        .collect();

    Ok(CompileOutput {
        python,
        modules,
        warnings: diagnostics,
    })
}
