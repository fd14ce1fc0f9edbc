//! The closed semantic type universe.
//!
//! Quasar has no inference and no user generics: every type a program can
//! mention is one of the variants below. Two types are equal iff they have
//! the same variant and the same parameters. [`Type::Any`] is produced only
//! by opaque Python-module members and is accepted in both directions by
//! every concrete type; it still displays as `Any` in diagnostics.
//!
//! `Void` never appears in annotations. It exists so primitive methods like
//! `push` can declare that they produce no value, and `Function` exists only
//! inside the analyzer's symbol table.

use quasar_base::{Interner, Symbol};

/// A fully-resolved Quasar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    /// Absence of a value; internal to method signatures.
    Void,
    /// Opaque value from a Python module member. Compatible with everything.
    Any,
    /// Homogeneous ordered sequence.
    List(Box<Type>),
    /// Key/value mapping. Keys are restricted to `Int`, `Str`, `Bool`.
    Dict(Box<Type>, Box<Type>),
    /// Nominal reference to a user-declared struct.
    Struct(Symbol),
    /// Nominal reference to a user-declared enum.
    Enum(Symbol),
    /// Namespace produced by `import`.
    Module(Symbol),
    /// Function signature; symbol-table only, never written in source.
    Function(Vec<Type>, Box<Type>),
}

impl Type {
    /// `Int` or `Float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// A type `print` accepts as a positional argument.
    pub fn is_printable(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::Bool | Type::Str | Type::Any)
    }

    /// A type permitted as a dict key.
    pub fn is_valid_dict_key(&self) -> bool {
        matches!(self, Type::Int | Type::Str | Type::Bool | Type::Any)
    }

    /// Assignment compatibility: does a value of type `actual` satisfy a
    /// location expecting `self`?
    ///
    /// `Any` matches in both directions; everything else is structural
    /// equality. There is no implicit numeric coercion: `Int` never
    /// satisfies `Float` nor vice versa.
    pub fn accepts(&self, actual: &Type) -> bool {
        match (self, actual) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::List(a), Type::List(b)) => a.accepts(b),
            (Type::Dict(ak, av), Type::Dict(bk, bv)) => ak.accepts(bk) && av.accepts(bv),
            _ => self == actual,
        }
    }

    /// Renders the type the way a user would write it.
    pub fn display(&self, interner: &Interner) -> String {
        match self {
            Type::Int => "int".into(),
            Type::Float => "float".into(),
            Type::Bool => "bool".into(),
            Type::Str => "str".into(),
            Type::Void => "void".into(),
            Type::Any => "Any".into(),
            Type::List(elem) => format!("[{}]", elem.display(interner)),
            Type::Dict(key, value) => {
                format!("Dict[{}, {}]", key.display(interner), value.display(interner))
            }
            Type::Struct(name) | Type::Enum(name) => interner.resolve(*name).to_string(),
            Type::Module(name) => format!("module `{}`", interner.resolve(*name)),
            Type::Function(params, ret) => {
                let params: Vec<String> = params.iter().map(|p| p.display(interner)).collect();
                format!("fn({}) -> {}", params.join(", "), ret.display(interner))
            }
        }
    }
}
