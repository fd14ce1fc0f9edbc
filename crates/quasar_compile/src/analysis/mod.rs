//! Semantic analysis for Quasar.
//!
//! The analyzer enforces the closed type system over a single compilation
//! unit (transitively including local imports), annotates every expression
//! with its resolved type, and accumulates diagnostics with stable codes.
//! It owns all mutable analysis state in one context struct threaded
//! through the traversal — there are no globals.
//!
//! # Architecture
//!
//! ```text
//! AST
//!  │
//!  ├── register_declarations   ← names first, then signatures, so
//!  │                             forward references resolve
//!  │
//!  └── check_decl / check_stmt / check_expr
//!           │
//!           ├── methods::lookup  ← primitive method registry
//!           ├── returns          ← guaranteed-return walk per function
//!           └── imports          ← resolver-driven module compilation
//! ```
//!
//! # Passes
//!
//! 1. **Registration**: struct and enum names are claimed (`E1200`,
//!    duplicate fields/variants checked), then function signatures and
//!    struct field types are resolved against the now-complete nominal
//!    registries. This is what lets `fact` call itself and `Line` hold a
//!    `Point` declared later.
//! 2. **Checking**: items are walked in source order. Scopes form a stack
//!    of frames; declarations bind in the innermost frame and may shadow
//!    outer names but not collide within their own frame (`E0002`).

pub mod check;
pub mod imports;
pub mod methods;
pub mod returns;

pub use imports::{
    CompiledModule, FsResolver, ImportResolver, ImportState, MapResolver, ResolvedImport,
};

use quasar_base::{Diagnostic, DiagnosticCode, Interner, Span, Symbol};
use quasar_syntax::ast::{
    Decl, EnumDecl, FnDecl, ImportDecl, ImportTarget, Item, Program, StructDecl, TypeExpr,
    TypeExprKind,
};
use quasar_syntax::types::Type;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Global functions intercepted during call analysis rather than resolved
/// through the symbol table. Declaring any of these names is `E0203`.
pub const BUILTIN_FUNCTIONS: &[&str] = &["len", "push", "keys", "values", "input"];

/// A struct's registered shape: ordered, typed fields.
#[derive(Debug, Clone, Default)]
pub struct StructDef {
    pub fields: Vec<(Symbol, Type)>,
}

impl StructDef {
    pub fn field_type(&self, name: Symbol) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, ty)| ty)
    }
}

/// An enum's registered shape: ordered variant names.
#[derive(Debug, Clone, Default)]
pub struct EnumDef {
    pub variants: Vec<Symbol>,
}

/// A function's registered signature.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub params: Vec<Type>,
    pub ret: Type,
}

/// The top-level symbols a local module makes available to importers.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    pub functions: HashMap<Symbol, FnSig>,
    pub structs: HashMap<Symbol, StructDef>,
    pub enums: HashMap<Symbol, EnumDef>,
}

/// What a module symbol refers to.
#[derive(Debug, Clone)]
pub enum ModuleKind {
    /// A Python module: every member is `Any`, every call accepted.
    Opaque,
    /// A compiled local file with known exports.
    Local(ModuleExports),
}

/// One name in a scope frame.
#[derive(Debug, Clone)]
pub enum SymbolInfo {
    Variable {
        ty: Type,
        /// `for` loop variables reject reassignment (`E0202`).
        loop_var: bool,
    },
    Constant {
        ty: Type,
    },
    /// Definition lives in the function registry.
    Function,
    /// Definition lives in the struct registry.
    Struct,
    /// Definition lives in the enum registry.
    Enum,
    /// Definition lives in the module table.
    Module,
}

/// The analysis context: scope stack, nominal registries, import state,
/// and the diagnostics sink. One per compilation unit; nested units (local
/// imports) get their own `Analyzer` sharing the interner, resolver, and
/// [`ImportState`].
pub struct Analyzer<'a> {
    pub(crate) interner: &'a mut Interner,
    pub(crate) resolver: &'a dyn ImportResolver,
    pub(crate) imports: &'a mut ImportState,
    /// Directory local imports resolve against.
    pub(crate) base_dir: PathBuf,
    /// File stamped on spans of diagnostics without one (top-level checks).
    pub(crate) file: Option<Arc<str>>,
    pub(crate) scopes: Vec<HashMap<Symbol, SymbolInfo>>,
    pub(crate) structs: HashMap<Symbol, StructDef>,
    pub(crate) enums: HashMap<Symbol, EnumDef>,
    pub(crate) functions: HashMap<Symbol, FnSig>,
    pub(crate) modules: HashMap<Symbol, ModuleKind>,
    /// Canonical paths already imported by *this* unit, for `E0900`.
    pub(crate) imported_paths: Vec<PathBuf>,
    /// Return type of the enclosing function body, if any.
    pub(crate) current_return: Option<Type>,
    /// Number of enclosing `while`/`for` bodies.
    pub(crate) loop_depth: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        interner: &'a mut Interner,
        resolver: &'a dyn ImportResolver,
        imports: &'a mut ImportState,
        base_dir: PathBuf,
        file: Option<Arc<str>>,
    ) -> Self {
        Self {
            interner,
            resolver,
            imports,
            base_dir,
            file,
            scopes: vec![HashMap::new()],
            structs: HashMap::new(),
            enums: HashMap::new(),
            functions: HashMap::new(),
            modules: HashMap::new(),
            imported_paths: Vec::new(),
            current_return: None,
            loop_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Analyzes a root compilation unit in place, annotating every
    /// expression, and returns the accumulated diagnostics.
    pub fn analyze(mut self, program: &mut Program) -> Vec<Diagnostic> {
        self.run(program);
        self.diagnostics
    }

    /// Analyzes an imported module. Publishes the pre-registration export
    /// snapshot under `canonical` so circular importers can proceed, and
    /// records the completed exports when done.
    pub(crate) fn analyze_module(
        mut self,
        program: &mut Program,
        canonical: PathBuf,
    ) -> (ModuleExports, Vec<Diagnostic>) {
        self.register_declarations(program);
        let snapshot = self.exports();
        self.imports.in_progress.insert(canonical.clone(), snapshot);

        for item in &mut program.items {
            self.check_item(item);
        }

        self.imports.in_progress.remove(&canonical);
        let exports = self.exports();
        self.imports
            .completed
            .insert(canonical, exports.clone());
        (exports, self.diagnostics)
    }

    fn run(&mut self, program: &mut Program) {
        self.register_declarations(program);
        for item in &mut program.items {
            self.check_item(item);
        }
    }

    fn check_item(&mut self, item: &mut Item) {
        match item {
            Item::Decl(decl) => self.check_decl(decl),
            Item::Stmt(stmt) => self.check_stmt(stmt),
        }
    }

    /// The exported view of this unit's top-level symbols.
    pub(crate) fn exports(&self) -> ModuleExports {
        ModuleExports {
            functions: self.functions.clone(),
            structs: self.structs.clone(),
            enums: self.enums.clone(),
        }
    }

    // ── Scopes ──────────────────────────────────────────────────────────

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Binds `name` in the innermost frame. A collision within the frame
    /// is `E0002`; shadowing an outer frame is allowed; shadowing a
    /// built-in function name is `E0203`.
    pub(crate) fn declare(&mut self, name: Symbol, info: SymbolInfo, span: &Span) {
        let text = self.interner.resolve(name).to_string();
        if BUILTIN_FUNCTIONS.contains(&text.as_str()) {
            self.report(
                DiagnosticCode::ShadowsBuiltin,
                format!("`{}` shadows the built-in function of the same name", text),
                span,
            );
        }
        let frame = self.scopes.last_mut().expect("scope stack is never empty");
        if frame.contains_key(&name) {
            self.report(
                DiagnosticCode::DuplicateDeclaration,
                format!("`{}` is already declared in this scope", text),
                span,
            );
            return;
        }
        frame.insert(name, info);
    }

    /// Looks `name` up from the innermost frame outward.
    pub(crate) fn lookup(&self, name: Symbol) -> Option<&SymbolInfo> {
        self.scopes.iter().rev().find_map(|frame| frame.get(&name))
    }

    pub(crate) fn report(&mut self, code: DiagnosticCode, message: String, span: &Span) {
        let mut span = span.clone();
        if span.file.is_none() {
            span.file = self.file.clone();
        }
        self.diagnostics.push(Diagnostic::new(code, message, span));
    }

    // ── Declaration registration ────────────────────────────────────────

    /// Claims struct/enum/function names, then resolves their signatures.
    /// Names go first so that forward references and mutual recursion
    /// resolve; signatures second so annotations can name any registered
    /// type regardless of declaration order.
    fn register_declarations(&mut self, program: &Program) {
        for item in &program.items {
            match item {
                Item::Decl(Decl::Struct(decl)) => self.register_struct_name(decl),
                Item::Decl(Decl::Enum(decl)) => self.register_enum(decl),
                Item::Decl(Decl::Fn(decl)) => self.register_fn_name(decl),
                _ => {}
            }
        }
        for item in &program.items {
            match item {
                Item::Decl(Decl::Struct(decl)) => self.register_struct_fields(decl),
                Item::Decl(Decl::Fn(decl)) => self.register_fn_signature(decl),
                _ => {}
            }
        }
    }

    fn register_struct_name(&mut self, decl: &StructDecl) {
        if self.structs.contains_key(&decl.name) || self.enums.contains_key(&decl.name) {
            let name = self.interner.resolve(decl.name).to_string();
            self.report(
                DiagnosticCode::EnumNameConflict,
                format!("type name `{}` is already declared", name),
                &decl.span,
            );
            return;
        }
        self.structs.insert(decl.name, StructDef::default());
        self.declare(decl.name, SymbolInfo::Struct, &decl.span);
    }

    fn register_struct_fields(&mut self, decl: &StructDecl) {
        let mut fields: Vec<(Symbol, Type)> = Vec::with_capacity(decl.fields.len());
        for (field, annotation) in &decl.fields {
            if fields.iter().any(|(existing, _)| existing == field) {
                let name = self.interner.resolve(*field).to_string();
                self.report(
                    DiagnosticCode::DuplicateFieldInDeclaration,
                    format!("field `{}` is declared twice", name),
                    &annotation.span,
                );
                continue;
            }
            let ty = self.resolve_type(annotation);
            fields.push((*field, ty));
        }
        if let Some(def) = self.structs.get_mut(&decl.name) {
            def.fields = fields;
        }
    }

    fn register_enum(&mut self, decl: &EnumDecl) {
        if self.structs.contains_key(&decl.name) || self.enums.contains_key(&decl.name) {
            let name = self.interner.resolve(decl.name).to_string();
            self.report(
                DiagnosticCode::EnumNameConflict,
                format!("type name `{}` is already declared", name),
                &decl.span,
            );
            return;
        }
        let mut variants: Vec<Symbol> = Vec::with_capacity(decl.variants.len());
        for variant in &decl.variants {
            if variants.contains(variant) {
                let name = self.interner.resolve(*variant).to_string();
                self.report(
                    DiagnosticCode::DuplicateVariant,
                    format!("variant `{}` is declared twice", name),
                    &decl.span,
                );
                continue;
            }
            variants.push(*variant);
        }
        self.enums.insert(decl.name, EnumDef { variants });
        self.declare(decl.name, SymbolInfo::Enum, &decl.span);
    }

    fn register_fn_name(&mut self, decl: &FnDecl) {
        self.declare(decl.name, SymbolInfo::Function, &decl.span);
    }

    fn register_fn_signature(&mut self, decl: &FnDecl) {
        let params = decl
            .params
            .iter()
            .map(|param| self.resolve_type(&param.ty))
            .collect();
        let ret = self.resolve_type(&decl.return_type);
        self.functions.insert(decl.name, FnSig { params, ret });
    }

    // ── Type annotation resolution ──────────────────────────────────────

    /// Resolves an annotation to a semantic type. Bare identifiers consult
    /// the enum registry first, then the struct registry; an unknown name
    /// is `E1203` and poisons to `Any` so one bad annotation does not
    /// cascade.
    pub(crate) fn resolve_type(&mut self, annotation: &TypeExpr) -> Type {
        match &annotation.kind {
            TypeExprKind::Int => Type::Int,
            TypeExprKind::Float => Type::Float,
            TypeExprKind::Bool => Type::Bool,
            TypeExprKind::Str => Type::Str,
            TypeExprKind::List(elem) => Type::List(Box::new(self.resolve_type(elem))),
            TypeExprKind::Dict(key, value) => {
                let key_ty = self.resolve_type(key);
                if !key_ty.is_valid_dict_key() {
                    let shown = key_ty.display(self.interner);
                    self.report(
                        DiagnosticCode::InvalidDictKeyType,
                        format!("`{}` cannot be a dict key; keys are int, str, or bool", shown),
                        &key.span,
                    );
                }
                Type::Dict(Box::new(key_ty), Box::new(self.resolve_type(value)))
            }
            TypeExprKind::Named(sym) => {
                if self.enums.contains_key(sym) {
                    Type::Enum(*sym)
                } else if self.structs.contains_key(sym) {
                    Type::Struct(*sym)
                } else {
                    let name = self.interner.resolve(*sym).to_string();
                    self.report(
                        DiagnosticCode::UnknownTypeName,
                        format!("unknown type `{}`", name),
                        &annotation.span,
                    );
                    Type::Any
                }
            }
        }
    }

    // ── Imports ─────────────────────────────────────────────────────────

    pub(crate) fn check_import(&mut self, decl: &ImportDecl) {
        match &decl.target {
            ImportTarget::Python(name) => {
                if self.modules.contains_key(name) {
                    let shown = self.interner.resolve(*name).to_string();
                    self.report(
                        DiagnosticCode::DuplicateImport,
                        format!("`{}` is already imported", shown),
                        &decl.span,
                    );
                    return;
                }
                self.modules.insert(*name, ModuleKind::Opaque);
                self.declare(*name, SymbolInfo::Module, &decl.span);
            }
            ImportTarget::Local(path) => self.check_local_import(path, &decl.span),
        }
    }

    fn check_local_import(&mut self, path: &str, span: &Span) {
        let resolved = match self.resolver.resolve(&self.base_dir, path) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.report(
                    DiagnosticCode::ImportNotFound,
                    format!("cannot import `{}`: {}", path, err),
                    span,
                );
                return;
            }
        };

        if self.imported_paths.contains(&resolved.canonical_path) {
            self.report(
                DiagnosticCode::DuplicateImport,
                format!("`{}` is already imported", path),
                span,
            );
            return;
        }
        self.imported_paths.push(resolved.canonical_path.clone());

        let module_name = imports::module_name_of(path);
        let module_sym = self.interner.intern(&module_name);

        // Already fully compiled by another importer: reuse the exports.
        if let Some(exports) = self.imports.completed.get(&resolved.canonical_path) {
            let exports = exports.clone();
            self.register_module(module_sym, exports, span);
            return;
        }

        // On the analysis stack right now: a circular import. Warn and
        // satisfy the import with what registration has published so far.
        if let Some(partial) = self.imports.in_progress.get(&resolved.canonical_path) {
            let partial = partial.clone();
            self.report(
                DiagnosticCode::CircularImport,
                format!("circular import of `{}`; using its declarations as registered so far", path),
                span,
            );
            self.register_module(module_sym, partial, span);
            return;
        }

        let exports = self.compile_module(resolved, &module_name, span);
        self.register_module(module_sym, exports, span);
    }

    /// Lexes, parses, and analyzes an imported file in its own scope,
    /// sharing this compilation's interner, resolver, and import state.
    fn compile_module(
        &mut self,
        resolved: ResolvedImport,
        module_name: &str,
        span: &Span,
    ) -> ModuleExports {
        let file: Arc<str> = Arc::from(resolved.canonical_path.display().to_string());
        let (tokens, lex_diags) =
            quasar_syntax::Lexer::new(&resolved.source, &mut *self.interner)
                .with_file(file.clone())
                .tokenize();

        if !lex_diags.is_empty() {
            self.diagnostics.extend(lex_diags);
            self.report(
                DiagnosticCode::ImportedFileHasErrors,
                format!("imported file `{}` has errors", module_name),
                span,
            );
            return ModuleExports::default();
        }

        let mut program = match quasar_syntax::Parser::new(tokens).parse_program() {
            Ok(program) => program,
            Err(parse_diags) => {
                self.diagnostics.extend(parse_diags);
                self.report(
                    DiagnosticCode::ImportedFileHasErrors,
                    format!("imported file `{}` has errors", module_name),
                    span,
                );
                return ModuleExports::default();
            }
        };

        let base_dir = resolved
            .canonical_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());

        let sub = Analyzer::new(
            &mut *self.interner,
            self.resolver,
            &mut *self.imports,
            base_dir,
            Some(file),
        );
        let (exports, sub_diags) =
            sub.analyze_module(&mut program, resolved.canonical_path.clone());

        let had_errors = quasar_base::diagnostic::has_errors(&sub_diags);
        self.diagnostics.extend(sub_diags);
        if had_errors {
            self.report(
                DiagnosticCode::ImportedFileHasErrors,
                format!("imported file `{}` has errors", module_name),
                span,
            );
        }

        self.imports.modules.push(CompiledModule {
            name: module_name.to_string(),
            program,
        });
        exports
    }

    /// Binds a module symbol and folds its exported nominal definitions
    /// into the local registries (without claiming their bare names), so
    /// that values flowing out of module functions — a struct returned by
    /// `utils.make_point()`, say — support field access and enum
    /// comparison on this side.
    fn register_module(&mut self, module_sym: Symbol, exports: ModuleExports, span: &Span) {
        for (name, def) in &exports.structs {
            self.structs.entry(*name).or_insert_with(|| def.clone());
        }
        for (name, def) in &exports.enums {
            self.enums.entry(*name).or_insert_with(|| def.clone());
        }
        self.modules
            .insert(module_sym, ModuleKind::Local(exports));
        self.declare(module_sym, SymbolInfo::Module, span);
    }
}
