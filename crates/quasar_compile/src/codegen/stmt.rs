//! Statement emission.
//!
//! Each statement renders to one or more complete lines (trailing newline
//! included) at the given indent level. Four spaces per level; a block
//! with nothing to say emits `pass`.

use super::expr::codegen_expr;
use quasar_base::Interner;
use quasar_syntax::ast::{Block, Decl, Expr, ExprKind, PrintStmt, Stmt};

pub fn codegen_stmt(stmt: &Stmt, interner: &Interner, indent: usize) -> String {
    let pad = "    ".repeat(indent);
    match stmt {
        Stmt::Decl(Decl::Var(decl)) | Stmt::Decl(Decl::Const(decl)) => {
            format!(
                "{}{} = {}\n",
                pad,
                interner.resolve(decl.name),
                codegen_expr(&decl.init, interner)
            )
        }
        // Functions, structs, enums, and imports never appear inside
        // blocks; the top-level walk in `program.rs` renders them.
        Stmt::Decl(_) => String::new(),
        Stmt::Expr(expr) => format!("{}{}\n", pad, codegen_expr(expr, interner)),
        Stmt::Print(print) => format!("{}{}\n", pad, codegen_print(print, interner)),
        Stmt::Assign { target, value, .. } => format!(
            "{}{} = {}\n",
            pad,
            codegen_expr(target, interner),
            codegen_expr(value, interner)
        ),
        Stmt::If {
            cond,
            then_block,
            else_block,
            ..
        } => {
            let mut out = format!("{}if {}:\n", pad, codegen_expr(cond, interner));
            out.push_str(&codegen_block(then_block, interner, indent + 1));
            if let Some(block) = else_block {
                out.push_str(&format!("{}else:\n", pad));
                out.push_str(&codegen_block(block, interner, indent + 1));
            }
            out
        }
        Stmt::While { cond, body, .. } => {
            let mut out = format!("{}while {}:\n", pad, codegen_expr(cond, interner));
            out.push_str(&codegen_block(body, interner, indent + 1));
            out
        }
        Stmt::For {
            var,
            iterable,
            body,
            ..
        } => {
            let head = match &iterable.kind {
                ExprKind::Range(start, end) => format!(
                    "range({}, {})",
                    codegen_expr(start, interner),
                    codegen_expr(end, interner)
                ),
                _ => codegen_expr(iterable, interner),
            };
            let mut out = format!("{}for {} in {}:\n", pad, interner.resolve(*var), head);
            out.push_str(&codegen_block(body, interner, indent + 1));
            out
        }
        Stmt::Break(_) => format!("{}break\n", pad),
        Stmt::Continue(_) => format!("{}continue\n", pad),
        Stmt::Return { value, .. } => {
            format!("{}return {}\n", pad, codegen_expr(value, interner))
        }
        // Python has no bare scopes; the statements run inline.
        Stmt::Block(block) => {
            if block.stmts.is_empty() {
                format!("{}pass\n", pad)
            } else {
                block
                    .stmts
                    .iter()
                    .map(|stmt| codegen_stmt(stmt, interner, indent))
                    .collect()
            }
        }
    }
}

/// Renders a block body at `indent`, emitting `pass` when empty.
pub fn codegen_block(block: &Block, interner: &Interner, indent: usize) -> String {
    if block.stmts.is_empty() {
        return format!("{}pass\n", "    ".repeat(indent));
    }
    let body: String = block
        .stmts
        .iter()
        .map(|stmt| codegen_stmt(stmt, interner, indent))
        .collect();
    if body.is_empty() {
        format!("{}pass\n", "    ".repeat(indent))
    } else {
        body
    }
}

/// `print(...)`, either plain or in format mode.
///
/// Format mode folds the trailing positional arguments into a `.format()`
/// call on the literal's original lexeme; `sep`/`end` survive either way.
fn codegen_print(print: &PrintStmt, interner: &Interner) -> String {
    let mut parts: Vec<String> = Vec::new();

    let format_lexeme = if print.format_mode {
        match print.args.first() {
            Some(Expr {
                kind: ExprKind::Str { lexeme, .. },
                ..
            }) => Some(lexeme.clone()),
            _ => None,
        }
    } else {
        None
    };

    match format_lexeme {
        Some(lexeme) => {
            let fmt_args: Vec<String> = print.args[1..]
                .iter()
                .map(|arg| codegen_expr(arg, interner))
                .collect();
            parts.push(format!("{}.format({})", lexeme, fmt_args.join(", ")));
        }
        None => {
            for arg in &print.args {
                parts.push(codegen_expr(arg, interner));
            }
        }
    }

    if let Some(sep) = &print.sep {
        parts.push(format!("sep={}", codegen_expr(sep, interner)));
    }
    if let Some(end) = &print.end {
        parts.push(format!("end={}", codegen_expr(end, interner)));
    }

    format!("print({})", parts.join(", "))
}
