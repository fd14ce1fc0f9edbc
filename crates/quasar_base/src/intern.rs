//! String interning for identifier-heavy pipeline stages.
//!
//! The lexer interns every identifier it sees; from then on the parser,
//! analyzer, and emitter compare [`Symbol`] handles instead of strings.
//! Scope lookups, method dispatch, and nominal type equality all reduce to
//! integer comparisons.
//!
//! # Storage
//!
//! All interned text lives in one contiguous buffer. A symbol is an index
//! into a range table pointing back into that buffer, and deduplication
//! goes through a hash-bucket map whose candidates are verified against
//! the buffer — so each distinct string is stored exactly once, and a
//! compilation's worth of identifiers ends up in a single allocation pool
//! instead of one `String` per name.
//!
//! # Example
//!
//! ```
//! use quasar_base::Interner;
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("count");
//! let b = interner.intern("count");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), "count");
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A lightweight handle to an interned string.
///
/// `Symbol`s are `Copy`, hashable, and compare in O(1). They are only
/// meaningful together with the [`Interner`] that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

/// Deduplicating string pool handing out [`Symbol`] handles.
pub struct Interner {
    /// Every interned string, concatenated back to back.
    text: String,
    /// Byte range of each symbol's text, indexed by symbol id.
    ranges: Vec<(u32, u32)>,
    /// String hash to candidate symbols; candidates are confirmed by
    /// comparing against the buffer, so hash collisions merely share a
    /// bucket.
    buckets: HashMap<u64, Vec<Symbol>>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            ranges: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Interns `s`, returning the existing symbol if this exact text was
    /// seen before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let hash = fingerprint(s);
        if let Some(candidates) = self.buckets.get(&hash) {
            for &candidate in candidates {
                if self.resolve(candidate) == s {
                    return candidate;
                }
            }
        }

        let start = self.text.len() as u32;
        self.text.push_str(s);
        let symbol = Symbol(self.ranges.len() as u32);
        self.ranges.push((start, self.text.len() as u32));
        self.buckets.entry(hash).or_default().push(symbol);
        symbol
    }

    /// Returns the text behind `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` came from a different interner.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        let (start, end) = self.ranges[symbol.0 as usize];
        &self.text[start as usize..end as usize]
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

fn fingerprint(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}
