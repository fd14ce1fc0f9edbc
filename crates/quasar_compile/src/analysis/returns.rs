//! Return-path analysis.
//!
//! Every Quasar function must return a value on every path, and the check
//! is deliberately syntactic and conservative: a block guarantees a return
//! iff its last reachable statement is a `return`, or an `if` with an
//! `else` whose branches both guarantee one. Loops never count — their
//! bodies may not execute — and neither does anything after a guaranteed
//! statement (there is nothing after it worth looking at).

use quasar_syntax::ast::{Block, Stmt};

/// Does this block guarantee a `return` on every path through it?
pub fn block_guarantees_return(block: &Block) -> bool {
    block.stmts.iter().any(stmt_guarantees_return)
}

fn stmt_guarantees_return(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return { .. } => true,
        Stmt::If {
            then_block,
            else_block: Some(else_block),
            ..
        } => block_guarantees_return(then_block) && block_guarantees_return(else_block),
        Stmt::Block(inner) => block_guarantees_return(inner),
        // An `if` without `else` may be skipped; loops may run zero times.
        _ => false,
    }
}
