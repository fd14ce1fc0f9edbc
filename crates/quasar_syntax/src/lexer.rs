//! Lexical analysis: source text to token stream.
//!
//! The lexer walks the source bytes once, tracking 1-indexed line/column
//! positions, and classifies characters into the closed token set. It
//! discards whitespace and `//` line comments, prefers two-character
//! operators greedily (`==`, `!=`, `<=`, `>=`, `&&`, `||`, `->`, `..`),
//! and keeps every token's exact lexeme so that the concatenation of all
//! lexemes plus skipped trivia reconstructs the source.
//!
//! # Error Recovery
//!
//! Lexing never aborts. A malformed lexeme produces one diagnostic
//! (`E0000` for an unrecognized character or a semicolon, `E0001-lex` for
//! an unterminated string) and the lexer resynchronizes at the next
//! whitespace so later errors in the same file are still reported.
//!
//! # Example
//!
//! ```
//! use quasar_base::Interner;
//! use quasar_syntax::{Lexer, TokenKind};
//!
//! let mut interner = Interner::new();
//! let (tokens, diagnostics) = Lexer::new("let x: int = 42", &mut interner).tokenize();
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(tokens[0].kind, TokenKind::Let);
//! assert_eq!(tokens[5].kind, TokenKind::Int(42));
//! ```

use crate::token::{keyword_kind, Token, TokenKind};
use quasar_base::{Diagnostic, DiagnosticCode, Interner, Span};
use std::sync::Arc;

/// Converts one source string into tokens plus any lexical diagnostics.
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
    file: Option<Arc<str>>,
    interner: &'a mut Interner,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            file: None,
            interner,
            diagnostics: Vec::new(),
        }
    }

    /// Stamps the given file path onto every produced span.
    pub fn with_file(mut self, file: Arc<str>) -> Self {
        self.file = Some(file);
        self
    }

    /// Runs the lexer to completion. The token stream always ends with
    /// [`TokenKind::Eof`], even when diagnostics were produced.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia();
            if self.at_end() {
                let span = self.span_from(self.line, self.col);
                tokens.push(Token::new(TokenKind::Eof, "", span));
                break;
            }

            let start_pos = self.pos;
            let (start_line, start_col) = (self.line, self.col);

            let byte = self.bytes[self.pos];
            let kind = match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => Some(self.lex_ident()),
                b'0'..=b'9' => self.lex_number(start_pos, start_line, start_col),
                b'"' => self.lex_string(start_pos, start_line, start_col),
                _ => self.lex_operator(start_line, start_col),
            };

            if let Some(kind) = kind {
                let lexeme = &self.source[start_pos..self.pos];
                let span = self.span_between(start_line, start_col);
                tokens.push(Token::new(kind, lexeme, span));
            }
        }

        (tokens, self.diagnostics)
    }

    // ── Position helpers ────────────────────────────────────────────────

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consumes one byte. Columns advance per character, not per byte, so
    /// multi-byte UTF-8 sequences in strings and comments count once.
    fn bump(&mut self) -> u8 {
        let byte = self.bytes[self.pos];
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if byte & 0xC0 != 0x80 {
            self.col += 1;
        }
        byte
    }

    fn span_between(&self, start_line: u32, start_col: u32) -> Span {
        let mut span = Span::new(start_line, start_col, self.line, self.col);
        if let Some(file) = &self.file {
            span = span.in_file(file.clone());
        }
        span
    }

    fn span_from(&self, line: u32, col: u32) -> Span {
        let mut span = Span::new(line, col, line, col + 1);
        if let Some(file) = &self.file {
            span = span.in_file(file.clone());
        }
        span
    }

    fn report(&mut self, code: DiagnosticCode, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::new(code, message, span));
    }

    // ── Trivia ──────────────────────────────────────────────────────────

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.bump();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(byte) = self.peek() {
                        if byte == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// Skips forward to the next whitespace after a bad lexeme.
    fn resync(&mut self) {
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() {
                break;
            }
            self.bump();
        }
    }

    // ── Lexeme classes ──────────────────────────────────────────────────

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'_' {
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        match keyword_kind(text) {
            Some(kind) => kind,
            None => TokenKind::Ident(self.interner.intern(text)),
        }
    }

    /// One or more digits; a `.` followed by a digit promotes to a float.
    /// `1..5` stays an integer followed by `..`.
    fn lex_number(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Option<TokenKind> {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.bump();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }

        let text = &self.source[start_pos..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => Some(TokenKind::Float(value)),
                Err(_) => {
                    let span = self.span_between(start_line, start_col);
                    self.report(
                        DiagnosticCode::UnrecognizedCharacter,
                        format!("malformed float literal `{}`", text),
                        span,
                    );
                    None
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Some(TokenKind::Int(value)),
                Err(_) => {
                    let span = self.span_between(start_line, start_col);
                    self.report(
                        DiagnosticCode::UnrecognizedCharacter,
                        format!("integer literal `{}` is too large", text),
                        span,
                    );
                    None
                }
            }
        }
    }

    /// A `"`-delimited string with `\n`, `\t`, `\"`, `\\` escapes. The
    /// token value is the unescaped text; the lexeme keeps the original
    /// spelling. An unknown escape is preserved verbatim.
    fn lex_string(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Option<TokenKind> {
        self.bump(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_between(start_line, start_col);
                    let lexeme = &self.source[start_pos..self.pos];
                    self.report(
                        DiagnosticCode::UnterminatedString,
                        format!("unterminated string literal {}", lexeme),
                        span,
                    );
                    return None;
                }
                Some(b'"') => {
                    self.bump();
                    return Some(TokenKind::Str(value));
                }
                Some(b'\\') => {
                    self.bump();
                    match self.peek() {
                        Some(b'n') => {
                            self.bump();
                            value.push('\n');
                        }
                        Some(b't') => {
                            self.bump();
                            value.push('\t');
                        }
                        Some(b'"') => {
                            self.bump();
                            value.push('"');
                        }
                        Some(b'\\') => {
                            self.bump();
                            value.push('\\');
                        }
                        Some(other) if other != b'\n' => {
                            self.bump();
                            value.push('\\');
                            value.push(other as char);
                        }
                        _ => {
                            // Backslash at end of line or input; the
                            // unterminated-string arm above will fire next.
                            value.push('\\');
                        }
                    }
                }
                Some(_) => {
                    let ch_start = self.pos;
                    self.bump();
                    while matches!(self.peek(), Some(byte) if byte & 0xC0 == 0x80) {
                        self.bump();
                    }
                    value.push_str(&self.source[ch_start..self.pos]);
                }
            }
        }
    }

    fn lex_operator(&mut self, start_line: u32, start_col: u32) -> Option<TokenKind> {
        let byte = self.bump();
        let two = |lexer: &mut Self, next: u8, long: TokenKind, short: Option<TokenKind>| {
            if lexer.peek() == Some(next) {
                lexer.bump();
                Some(long)
            } else {
                short
            }
        };

        match byte {
            b'{' => Some(TokenKind::LBrace),
            b'}' => Some(TokenKind::RBrace),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b'[' => Some(TokenKind::LBracket),
            b']' => Some(TokenKind::RBracket),
            b',' => Some(TokenKind::Comma),
            b':' => Some(TokenKind::Colon),
            b'+' => Some(TokenKind::Plus),
            b'*' => Some(TokenKind::Star),
            b'/' => Some(TokenKind::Slash),
            b'%' => Some(TokenKind::Percent),
            b'.' => two(self, b'.', TokenKind::DotDot, Some(TokenKind::Dot)),
            b'-' => two(self, b'>', TokenKind::Arrow, Some(TokenKind::Minus)),
            b'=' => two(self, b'=', TokenKind::EqEq, Some(TokenKind::Assign)),
            b'!' => two(self, b'=', TokenKind::NotEq, Some(TokenKind::Bang)),
            b'<' => two(self, b'=', TokenKind::LtEq, Some(TokenKind::Lt)),
            b'>' => two(self, b'=', TokenKind::GtEq, Some(TokenKind::Gt)),
            b'&' => {
                let kind = two(self, b'&', TokenKind::AndAnd, None);
                if kind.is_none() {
                    let span = self.span_between(start_line, start_col);
                    self.report(
                        DiagnosticCode::UnrecognizedCharacter,
                        "unrecognized character `&` (use `&&` for logical and)".to_string(),
                        span,
                    );
                }
                kind
            }
            b'|' => {
                let kind = two(self, b'|', TokenKind::OrOr, None);
                if kind.is_none() {
                    let span = self.span_between(start_line, start_col);
                    self.report(
                        DiagnosticCode::UnrecognizedCharacter,
                        "unrecognized character `|` (use `||` for logical or)".to_string(),
                        span,
                    );
                }
                kind
            }
            b';' => {
                let span = self.span_between(start_line, start_col);
                self.report(
                    DiagnosticCode::UnrecognizedCharacter,
                    "semicolons are not used in Quasar".to_string(),
                    span,
                );
                None
            }
            other => {
                // Consume the rest of a multi-byte character before resyncing
                // so the diagnostic shows the whole character.
                let ch_start = self.pos - 1;
                while matches!(self.peek(), Some(byte) if byte & 0xC0 == 0x80) {
                    self.bump();
                }
                let text = if other.is_ascii() {
                    (other as char).to_string()
                } else {
                    self.source[ch_start..self.pos].to_string()
                };
                let span = self.span_between(start_line, start_col);
                self.report(
                    DiagnosticCode::UnrecognizedCharacter,
                    format!("unrecognized character `{}`", text),
                    span,
                );
                self.resync();
                None
            }
        }
    }
}
