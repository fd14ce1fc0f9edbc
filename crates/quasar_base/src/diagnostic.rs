//! Structured diagnostics with stable codes.
//!
//! Every error the pipeline can produce carries a [`DiagnosticCode`] from a
//! closed registry, a human-readable message, and a [`Span`]. The code
//! strings are stable and append-only: tools may match on them, so a code is
//! never renumbered or reused for a different condition.
//!
//! # Code Ranges
//!
//! | Range | Area |
//! |-------|------|
//! | E0000–E0099 | lexing, scope, identifiers, parse errors |
//! | E0100–E0199 | type errors |
//! | E0200–E0299 | control flow |
//! | E0300–E0399 | function return paths |
//! | E0400–E0499 | `print` and format strings |
//! | E0500–E0599 | lists and ranges |
//! | E0600–E0699 | `input` and casts |
//! | E0800–E0899 | structs |
//! | E0900–E0999 | imports |
//! | E1000–E1099 | dicts |
//! | E1100–E1199 | primitive methods |
//! | E1200–E1299 | enums |
//!
//! The core never prints: diagnostics are returned to the caller, and the
//! CLI decides whether to render them as colored text or JSON.

use crate::span::Span;
use serde::{Serialize, Serializer};
use std::fmt;

/// How severe a diagnostic is.
///
/// Only [`Severity::Error`] fails compilation. The single warning in the
/// registry today is [`DiagnosticCode::CircularImport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// The closed registry of diagnostic conditions.
///
/// Variant names describe the condition; [`DiagnosticCode::as_str`] gives
/// the stable user-facing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    // ── Lexing ──────────────────────────────────────────────────────────
    /// A character outside the language's alphabet (including `;`).
    UnrecognizedCharacter,
    /// A string literal that reaches end of line or end of input unclosed.
    UnterminatedString,

    // ── Scope and identifiers ───────────────────────────────────────────
    UndefinedName,
    DuplicateDeclaration,
    NotCallable,
    AssignToConst,
    AssignToUndeclared,

    // ── Parsing ─────────────────────────────────────────────────────────
    UnexpectedToken,
    ExpectedToken,
    UnexpectedEof,
    InvalidAssignmentTarget,

    // ── Types ───────────────────────────────────────────────────────────
    TypeMismatch,
    ConditionNotBool,
    ArithmeticTypeMismatch,
    OrderingTypeMismatch,
    LogicalTypeMismatch,
    EqualityTypeMismatch,
    InvalidUnaryOperand,
    WrongArgumentCount,
    ArgumentTypeMismatch,
    ReturnTypeMismatch,
    NotIndexable,

    // ── Control flow ────────────────────────────────────────────────────
    BreakOutsideLoop,
    ContinueOutsideLoop,
    AssignToLoopVariable,
    ShadowsBuiltin,

    // ── Return paths ────────────────────────────────────────────────────
    MissingReturn,
    ReturnOutsideFunction,

    // ── Print and format strings ────────────────────────────────────────
    UnprintableArgument,
    SepNotString,
    EndNotString,
    DuplicateSep,
    DuplicateEnd,
    PrintWithoutArguments,
    TooFewFormatArguments,
    TooManyFormatArguments,

    // ── Lists and ranges ────────────────────────────────────────────────
    HeterogeneousList,
    ListIndexNotInt,
    UntypedEmptyList,
    RangeEndpointNotInt,
    InvalidIterable,

    // ── Input and casts ─────────────────────────────────────────────────
    InputPromptNotString,
    InputArgumentCount,
    CastArgumentCount,

    // ── Structs ─────────────────────────────────────────────────────────
    UnknownStruct,
    MissingField,
    UnknownFieldInInitializer,
    FieldTypeMismatch,
    UnknownField,
    NoMembers,
    DuplicateFieldInDeclaration,
    DuplicateFieldInInitializer,

    // ── Imports ─────────────────────────────────────────────────────────
    DuplicateImport,
    ImportNotFound,
    CircularImport,
    ImportedFileHasErrors,

    // ── Dicts ───────────────────────────────────────────────────────────
    MixedDictKeys,
    MixedDictValues,
    InvalidDictKeyType,
    DictKeyMismatch,

    // ── Primitive methods ───────────────────────────────────────────────
    GenericArgumentMismatch,
    NoMethods,
    JoinReceiverNotStringList,
    UnknownMethod,
    MethodArgumentCount,
    MethodArgumentType,

    // ── Enums ───────────────────────────────────────────────────────────
    EnumNameConflict,
    DuplicateVariant,
    UnknownVariant,
    UnknownTypeName,
    EnumTypeMismatch,
    InvalidEnumOperator,
}

impl DiagnosticCode {
    /// The stable user-facing code string.
    pub fn as_str(self) -> &'static str {
        use DiagnosticCode::*;
        match self {
            UnrecognizedCharacter => "E0000",
            UnterminatedString => "E0001-lex",
            UndefinedName => "E0001",
            DuplicateDeclaration => "E0002",
            NotCallable => "E0003",
            AssignToConst => "E0004",
            AssignToUndeclared => "E0005",
            UnexpectedToken => "E0010",
            ExpectedToken => "E0011",
            UnexpectedEof => "E0012",
            InvalidAssignmentTarget => "E0013",
            TypeMismatch => "E0100",
            ConditionNotBool => "E0101",
            ArithmeticTypeMismatch => "E0102",
            OrderingTypeMismatch => "E0103",
            LogicalTypeMismatch => "E0104",
            EqualityTypeMismatch => "E0105",
            InvalidUnaryOperand => "E0106",
            WrongArgumentCount => "E0107",
            ArgumentTypeMismatch => "E0108",
            ReturnTypeMismatch => "E0109",
            NotIndexable => "E0110",
            BreakOutsideLoop => "E0200",
            ContinueOutsideLoop => "E0201",
            AssignToLoopVariable => "E0202",
            ShadowsBuiltin => "E0203",
            MissingReturn => "E0303",
            ReturnOutsideFunction => "E0304",
            UnprintableArgument => "E0401",
            SepNotString => "E0402",
            EndNotString => "E0403",
            DuplicateSep => "E0404",
            DuplicateEnd => "E0405",
            PrintWithoutArguments => "E0406",
            TooFewFormatArguments => "E0410",
            TooManyFormatArguments => "E0411",
            HeterogeneousList => "E0500",
            ListIndexNotInt => "E0501",
            UntypedEmptyList => "E0502",
            RangeEndpointNotInt => "E0503",
            InvalidIterable => "E0505",
            InputPromptNotString => "E0600",
            InputArgumentCount => "E0601",
            CastArgumentCount => "E0602",
            UnknownStruct => "E0800",
            MissingField => "E0801",
            UnknownFieldInInitializer => "E0802",
            FieldTypeMismatch => "E0803",
            UnknownField => "E0804",
            NoMembers => "E0805",
            DuplicateFieldInDeclaration => "E0806",
            DuplicateFieldInInitializer => "E0807",
            DuplicateImport => "E0900",
            ImportNotFound => "E0901",
            CircularImport => "E0902",
            ImportedFileHasErrors => "E0903",
            MixedDictKeys => "E1000",
            MixedDictValues => "E1001",
            InvalidDictKeyType => "E1002",
            DictKeyMismatch => "E1003",
            GenericArgumentMismatch => "E1100",
            NoMethods => "E1101",
            JoinReceiverNotStringList => "E1102",
            UnknownMethod => "E1105",
            MethodArgumentCount => "E1106",
            MethodArgumentType => "E1107",
            EnumNameConflict => "E1200",
            DuplicateVariant => "E1201",
            UnknownVariant => "E1202",
            UnknownTypeName => "E1203",
            EnumTypeMismatch => "E1204",
            InvalidEnumOperator => "E1205",
        }
    }

    /// Severity of this code. Everything except [`CircularImport`] is an error.
    ///
    /// [`CircularImport`]: DiagnosticCode::CircularImport
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::CircularImport => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured error or warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Stable code from the closed registry.
    pub code: DiagnosticCode,
    /// Human-readable description of the condition.
    pub message: String,
    /// Where in the source the condition was detected.
    pub span: Span,
    /// Error or warning, derived from the code.
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates a diagnostic; severity comes from the code.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            severity: code.severity(),
        }
    }

    /// `true` if this diagnostic fails compilation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.code, self.message, self.span)
    }
}

/// `true` if any diagnostic in the slice is an error (warnings alone pass).
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(DiagnosticCode::TypeMismatch.as_str(), "E0100");
        assert_eq!(DiagnosticCode::MissingReturn.as_str(), "E0303");
        assert_eq!(DiagnosticCode::UnterminatedString.as_str(), "E0001-lex");
        assert_eq!(DiagnosticCode::InvalidIterable.as_str(), "E0505");
    }

    #[test]
    fn circular_import_is_a_warning() {
        assert_eq!(DiagnosticCode::CircularImport.severity(), Severity::Warning);
        let diag = Diagnostic::new(
            DiagnosticCode::CircularImport,
            "circular import of `a.qsr`",
            Span::default(),
        );
        assert!(!diag.is_error());
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let warning = Diagnostic::new(
            DiagnosticCode::CircularImport,
            "cycle",
            Span::default(),
        );
        assert!(!has_errors(&[warning.clone()]));

        let error = Diagnostic::new(DiagnosticCode::TypeMismatch, "mismatch", Span::default());
        assert!(has_errors(&[warning, error]));
    }

    #[test]
    fn display_includes_code_and_location() {
        let diag = Diagnostic::new(
            DiagnosticCode::UndefinedName,
            "`x` is not defined",
            Span::new(3, 5, 3, 6),
        );
        let text = diag.to_string();
        assert!(text.contains("E0001"));
        assert!(text.contains("3:5"));
    }

    #[test]
    fn serializes_code_as_string() {
        let diag = Diagnostic::new(DiagnosticCode::TypeMismatch, "m", Span::new(1, 1, 1, 2));
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["code"], "E0100");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["span"]["start_line"], 1);
    }
}
