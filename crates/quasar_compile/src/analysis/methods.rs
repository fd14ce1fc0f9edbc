//! The primitive-method registry.
//!
//! A fixed table maps `(receiver family, method name)` to a signature.
//! Signatures are data, not code: generic placeholders (`T` for the list
//! element, `K`/`V` for dict parameters) are substituted with the
//! receiver's concrete type parameters at each call site, and the
//! substituted signature is what arity and argument checks run against.
//!
//! The registry is closed; the Python spellings of these methods live in
//! the emitter, not here.

use quasar_syntax::types::Type;

/// Receiver families that carry methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Str,
    List,
    Dict,
}

/// A parameter or return position in a method signature.
///
/// `T`, `K`, and `V` are placeholders resolved against the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigType {
    Int,
    Str,
    Bool,
    Float,
    Void,
    /// List element placeholder.
    T,
    /// Dict key placeholder.
    K,
    /// Dict value placeholder.
    V,
    /// `List[T]` with the element substituted.
    ListOfT,
    ListOfK,
    ListOfV,
    ListOfStr,
}

impl SigType {
    /// `true` for the placeholder positions whose mismatch reports the
    /// generic-parameter code rather than the plain argument code.
    pub fn is_generic(self) -> bool {
        matches!(self, SigType::T | SigType::K | SigType::V)
    }

    /// Substitutes this position against the receiver's parameters.
    ///
    /// `elem` is the list element type (when the receiver is a list);
    /// `key`/`value` the dict parameters.
    pub fn substitute(self, elem: Option<&Type>, key: Option<&Type>, value: Option<&Type>) -> Type {
        match self {
            SigType::Int => Type::Int,
            SigType::Str => Type::Str,
            SigType::Bool => Type::Bool,
            SigType::Float => Type::Float,
            SigType::Void => Type::Void,
            SigType::T => elem.cloned().unwrap_or(Type::Any),
            SigType::K => key.cloned().unwrap_or(Type::Any),
            SigType::V => value.cloned().unwrap_or(Type::Any),
            SigType::ListOfT => Type::List(Box::new(elem.cloned().unwrap_or(Type::Any))),
            SigType::ListOfK => Type::List(Box::new(key.cloned().unwrap_or(Type::Any))),
            SigType::ListOfV => Type::List(Box::new(value.cloned().unwrap_or(Type::Any))),
            SigType::ListOfStr => Type::List(Box::new(Type::Str)),
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, Copy)]
pub struct MethodSig {
    pub name: &'static str,
    pub params: &'static [SigType],
    pub ret: SigType,
}

const STR_METHODS: &[MethodSig] = &[
    MethodSig { name: "len", params: &[], ret: SigType::Int },
    MethodSig { name: "upper", params: &[], ret: SigType::Str },
    MethodSig { name: "lower", params: &[], ret: SigType::Str },
    MethodSig { name: "trim", params: &[], ret: SigType::Str },
    MethodSig { name: "trim_start", params: &[], ret: SigType::Str },
    MethodSig { name: "trim_end", params: &[], ret: SigType::Str },
    MethodSig { name: "split", params: &[SigType::Str], ret: SigType::ListOfStr },
    MethodSig { name: "replace", params: &[SigType::Str, SigType::Str], ret: SigType::Str },
    MethodSig { name: "contains", params: &[SigType::Str], ret: SigType::Bool },
    MethodSig { name: "starts_with", params: &[SigType::Str], ret: SigType::Bool },
    MethodSig { name: "ends_with", params: &[SigType::Str], ret: SigType::Bool },
    MethodSig { name: "to_int", params: &[], ret: SigType::Int },
    MethodSig { name: "to_float", params: &[], ret: SigType::Float },
];

const LIST_METHODS: &[MethodSig] = &[
    MethodSig { name: "len", params: &[], ret: SigType::Int },
    MethodSig { name: "push", params: &[SigType::T], ret: SigType::Void },
    MethodSig { name: "pop", params: &[], ret: SigType::T },
    MethodSig { name: "contains", params: &[SigType::T], ret: SigType::Bool },
    // `join` additionally requires the receiver element to be `str`;
    // the analyzer enforces that before consulting the signature.
    MethodSig { name: "join", params: &[SigType::Str], ret: SigType::Str },
    MethodSig { name: "reverse", params: &[], ret: SigType::Void },
    MethodSig { name: "clear", params: &[], ret: SigType::Void },
];

const DICT_METHODS: &[MethodSig] = &[
    MethodSig { name: "len", params: &[], ret: SigType::Int },
    MethodSig { name: "has_key", params: &[SigType::K], ret: SigType::Bool },
    MethodSig { name: "get", params: &[SigType::K, SigType::V], ret: SigType::V },
    MethodSig { name: "keys", params: &[], ret: SigType::ListOfK },
    MethodSig { name: "values", params: &[], ret: SigType::ListOfV },
    MethodSig { name: "remove", params: &[SigType::K], ret: SigType::Void },
    MethodSig { name: "clear", params: &[], ret: SigType::Void },
];

/// Looks up a method for a receiver family.
pub fn lookup(family: Family, name: &str) -> Option<&'static MethodSig> {
    let table = match family {
        Family::Str => STR_METHODS,
        Family::List => LIST_METHODS,
        Family::Dict => DICT_METHODS,
    };
    table.iter().find(|sig| sig.name == name)
}
