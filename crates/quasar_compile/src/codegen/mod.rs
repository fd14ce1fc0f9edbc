//! Code generation from the validated Quasar AST to Python 3.10+ source.
//!
//! The emission is a deterministic, read-only tree walk: given the same
//! validated tree, the output string is byte-identical. One function per
//! syntactic category, building plain `String`s with four-space
//! indentation.
//!
//! # Pipeline Position
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ Source → Lexer → Parser → AST → Analysis → HERE │
//! └──────────────────────────────────────────────────┘
//!                                        ↓
//!                                  Python Source
//! ```
//!
//! # Translation Rules
//!
//! | Quasar | Python |
//! |--------|--------|
//! | `let x: T = e` | `x = e` |
//! | `true` / `&&` / `!` | `True` / `and` / `not` |
//! | `struct P { x: int }` | `@dataclass` class |
//! | `enum C { Red }` | `class C(Enum): Red = "Red"` |
//! | `P { x: 1 }` | `P(x=1)` |
//! | `for i in a..b { }` | `for i in range(a, b):` |
//! | `xs.push(v)` | `xs.append(v)` |
//! | `xs.contains(v)` | `(v in xs)` |
//! | `parts.join(s)` | `s.join(parts)` |
//! | `d.remove(k)` | `d.pop(k, None)` |
//! | `print("n={}", n)` | `print("n={}".format(n))` |
//!
//! Every binary and unary expression is emitted inside parentheses, so the
//! target's precedence table can never disagree with the source's. Empty
//! blocks emit `pass`.

pub mod expr;
pub mod program;
pub mod stmt;

pub use expr::codegen_expr;
pub use program::codegen_program;
pub use stmt::{codegen_block, codegen_stmt};
