//! Source location tracking for error reporting.
//!
//! A [`Span`] represents a contiguous region of source text as a pair of
//! 1-indexed line/column positions plus the owning file. Every token, AST
//! node, and diagnostic in Quasar carries a span, enabling error messages
//! that point at the exact offending construct — including constructs in
//! files pulled in through local imports.
//!
//! # Coordinates
//!
//! Positions are 1-indexed, matching what editors display. The end position
//! is exclusive: a span covering the single-character identifier `x` at the
//! start of a file is `1:1..1:2`.
//!
//! # Example
//!
//! ```
//! use quasar_base::Span;
//!
//! let a = Span::new(1, 5, 1, 8);
//! let b = Span::new(2, 1, 2, 4);
//!
//! let merged = a.merge(&b);
//! assert_eq!(merged.start_line, 1);
//! assert_eq!(merged.end_line, 2);
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A region of source text: 1-indexed line/column interval plus file identity.
///
/// Spans are cheap to clone; the file name is a shared [`Arc`]. Use
/// [`Span::merge`] to combine spans when building compound expressions: the
/// span of `a + b` is `a.span.merge(&b.span)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Line of the first character (1-indexed).
    pub start_line: u32,
    /// Column of the first character (1-indexed).
    pub start_col: u32,
    /// Line of the position just past the last character.
    pub end_line: u32,
    /// Column of the position just past the last character (exclusive).
    pub end_col: u32,
    /// Path of the file this span points into, if known.
    pub file: Option<Arc<str>>,
}

impl Span {
    /// Creates a span from 1-indexed line/column coordinates, with no file.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
            file: None,
        }
    }

    /// Attaches a file path to this span.
    pub fn in_file(mut self, file: Arc<str>) -> Self {
        self.file = Some(file);
        self
    }

    /// Creates a span covering from the start of `self` to the end of `other`.
    ///
    /// The file of `self` wins; merging spans from different files is never
    /// meaningful and the caller is expected not to do it.
    pub fn merge(&self, other: &Span) -> Span {
        let (start_line, start_col) =
            if (self.start_line, self.start_col) <= (other.start_line, other.start_col) {
                (self.start_line, self.start_col)
            } else {
                (other.start_line, other.start_col)
            };
        let (end_line, end_col) = if (self.end_line, self.end_col) >= (other.end_line, other.end_col)
        {
            (self.end_line, self.end_col)
        } else {
            (other.end_line, other.end_col)
        };
        Span {
            start_line,
            start_col,
            end_line,
            end_col,
            file: self.file.clone().or_else(|| other.file.clone()),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::new(1, 1, 1, 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.start_line, self.start_col),
            None => write!(f, "{}:{}", self.start_line, self.start_col),
        }
    }
}
