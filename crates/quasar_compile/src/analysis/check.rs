//! Statement and expression checking.
//!
//! One function per syntactic category: `check_decl`, `check_stmt`,
//! `check_expr`. Every expression gets its resolved type written into its
//! `ty` slot, including poisoned nodes — a checking failure reports one
//! diagnostic and types the node `Any` so a single mistake does not
//! cascade into a wall of follow-on errors.
//!
//! `Member` nodes whose receiver names a declared enum are rewritten here
//! into `EnumVariant` nodes, so the emitter never has to guess what a
//! dotted name means.

use crate::analysis::methods::{self, Family};
use crate::analysis::returns;
use crate::analysis::{Analyzer, FnSig, ModuleKind, SymbolInfo};
use quasar_base::{DiagnosticCode, Span};
use quasar_syntax::ast::{
    format_placeholders, BinaryOp, Block, Decl, Expr, ExprKind, FnDecl, PrintStmt, Stmt, UnaryOp,
    VarDecl,
};
use quasar_syntax::types::Type;

impl<'a> Analyzer<'a> {
    // ── Declarations ────────────────────────────────────────────────────

    pub(crate) fn check_decl(&mut self, decl: &mut Decl) {
        match decl {
            Decl::Var(var) => self.check_var(var, false),
            Decl::Const(var) => self.check_var(var, true),
            Decl::Fn(fun) => self.check_fn(fun),
            // Structs and enums are fully handled by registration.
            Decl::Struct(_) | Decl::Enum(_) => {}
            Decl::Import(import) => self.check_import(import),
        }
    }

    fn check_var(&mut self, decl: &mut VarDecl, is_const: bool) {
        let declared = self.resolve_type(&decl.ty);
        let actual = self.check_expr(&mut decl.init, Some(&declared));
        if !declared.accepts(&actual) {
            let message = format!(
                "expected `{}`, found `{}`",
                declared.display(self.interner),
                actual.display(self.interner)
            );
            let span = decl.init.span.clone();
            self.report(DiagnosticCode::TypeMismatch, message, &span);
        }
        let info = if is_const {
            SymbolInfo::Constant { ty: declared }
        } else {
            SymbolInfo::Variable {
                ty: declared,
                loop_var: false,
            }
        };
        self.declare(decl.name, info, &decl.span);
    }

    fn check_fn(&mut self, decl: &mut FnDecl) {
        // The signature was registered before any body is checked.
        let sig = match self.functions.get(&decl.name) {
            Some(sig) => sig.clone(),
            None => return,
        };

        self.push_scope();
        for (param, ty) in decl.params.iter().zip(sig.params.iter()) {
            self.declare(
                param.name,
                SymbolInfo::Variable {
                    ty: ty.clone(),
                    loop_var: false,
                },
                &param.span,
            );
        }

        let saved_return = self.current_return.replace(sig.ret.clone());
        let saved_depth = std::mem::replace(&mut self.loop_depth, 0);
        for stmt in &mut decl.body.stmts {
            self.check_stmt(stmt);
        }
        self.loop_depth = saved_depth;
        self.current_return = saved_return;
        self.pop_scope();

        if !returns::block_guarantees_return(&decl.body) {
            let name = self.interner.resolve(decl.name).to_string();
            let span = decl.span.clone();
            self.report(
                DiagnosticCode::MissingReturn,
                format!("function `{}` does not return a value on every path", name),
                &span,
            );
        }
    }

    // ── Statements ──────────────────────────────────────────────────────

    pub(crate) fn check_block(&mut self, block: &mut Block) {
        self.push_scope();
        for stmt in &mut block.stmts {
            self.check_stmt(stmt);
        }
        self.pop_scope();
    }

    pub(crate) fn check_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.check_decl(decl),
            Stmt::Expr(expr) => {
                self.check_expr(expr, None);
            }
            Stmt::Print(print) => self.check_print(print),
            Stmt::Assign {
                target,
                value,
                span,
            } => {
                let span = span.clone();
                self.check_assign(target, value, &span);
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => {
                self.check_condition(cond);
                self.check_block(then_block);
                if let Some(block) = else_block {
                    self.check_block(block);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.check_condition(cond);
                self.loop_depth += 1;
                self.check_block(body);
                self.loop_depth -= 1;
            }
            Stmt::For {
                var,
                var_span,
                iterable,
                body,
                ..
            } => {
                let iterable_ty = self.check_expr(iterable, None);
                let var_ty = match iterable_ty {
                    Type::List(elem) => *elem,
                    Type::Any => Type::Any,
                    other => {
                        let message = format!(
                            "`for` needs a list or a range, found `{}`",
                            other.display(self.interner)
                        );
                        let span = iterable.span.clone();
                        self.report(DiagnosticCode::InvalidIterable, message, &span);
                        Type::Any
                    }
                };
                self.push_scope();
                let var = *var;
                let var_span = var_span.clone();
                self.declare(
                    var,
                    SymbolInfo::Variable {
                        ty: var_ty,
                        loop_var: true,
                    },
                    &var_span,
                );
                self.loop_depth += 1;
                self.check_block(body);
                self.loop_depth -= 1;
                self.pop_scope();
            }
            Stmt::Break(span) => {
                if self.loop_depth == 0 {
                    let span = span.clone();
                    self.report(
                        DiagnosticCode::BreakOutsideLoop,
                        "`break` outside a loop".to_string(),
                        &span,
                    );
                }
            }
            Stmt::Continue(span) => {
                if self.loop_depth == 0 {
                    let span = span.clone();
                    self.report(
                        DiagnosticCode::ContinueOutsideLoop,
                        "`continue` outside a loop".to_string(),
                        &span,
                    );
                }
            }
            Stmt::Return { value, span } => match self.current_return.clone() {
                None => {
                    let span = span.clone();
                    self.report(
                        DiagnosticCode::ReturnOutsideFunction,
                        "`return` outside a function body".to_string(),
                        &span,
                    );
                    self.check_expr(value, None);
                }
                Some(ret) => {
                    let actual = self.check_expr(value, Some(&ret));
                    if !ret.accepts(&actual) {
                        let message = format!(
                            "return type is `{}`, found `{}`",
                            ret.display(self.interner),
                            actual.display(self.interner)
                        );
                        let span = value.span.clone();
                        self.report(DiagnosticCode::ReturnTypeMismatch, message, &span);
                    }
                }
            },
            Stmt::Block(block) => self.check_block(block),
        }
    }

    fn check_condition(&mut self, cond: &mut Expr) {
        let ty = self.check_expr(cond, Some(&Type::Bool));
        if !matches!(ty, Type::Bool | Type::Any) {
            let message = format!("condition must be `bool`, found `{}`", ty.display(self.interner));
            let span = cond.span.clone();
            self.report(DiagnosticCode::ConditionNotBool, message, &span);
        }
    }

    fn check_print(&mut self, print: &mut PrintStmt) {
        if print.args.is_empty() {
            let span = print.span.clone();
            self.report(
                DiagnosticCode::PrintWithoutArguments,
                "`print` needs at least one argument".to_string(),
                &span,
            );
        }

        for arg in &mut print.args {
            let ty = self.check_expr(arg, None);
            if !ty.is_printable() {
                let message =
                    format!("cannot print a value of type `{}`", ty.display(self.interner));
                let span = arg.span.clone();
                self.report(DiagnosticCode::UnprintableArgument, message, &span);
            }
        }

        if let Some(sep) = &mut print.sep {
            let ty = self.check_expr(sep, Some(&Type::Str));
            if !matches!(ty, Type::Str | Type::Any) {
                let span = sep.span.clone();
                self.report(
                    DiagnosticCode::SepNotString,
                    format!("`sep` must be `str`, found `{}`", ty.display(self.interner)),
                    &span,
                );
            }
        }
        if let Some(end) = &mut print.end {
            let ty = self.check_expr(end, Some(&Type::Str));
            if !matches!(ty, Type::Str | Type::Any) {
                let span = end.span.clone();
                self.report(
                    DiagnosticCode::EndNotString,
                    format!("`end` must be `str`, found `{}`", ty.display(self.interner)),
                    &span,
                );
            }
        }

        if print.format_mode {
            if let Some(Expr {
                kind: ExprKind::Str { value, .. },
                span,
                ..
            }) = print.args.first()
            {
                let placeholders = format_placeholders(value);
                let provided = print.args.len() - 1;
                let span = span.clone();
                if placeholders > provided {
                    self.report(
                        DiagnosticCode::TooFewFormatArguments,
                        format!(
                            "format string has {} placeholders but {} arguments follow",
                            placeholders, provided
                        ),
                        &span,
                    );
                } else if placeholders < provided {
                    self.report(
                        DiagnosticCode::TooManyFormatArguments,
                        format!(
                            "format string has {} placeholders but {} arguments follow",
                            placeholders, provided
                        ),
                        &span,
                    );
                }
            }
        }
    }

    fn check_assign(&mut self, target: &mut Expr, value: &mut Expr, span: &Span) {
        match target.kind {
            ExprKind::Ident(name) => {
                let shown = self.interner.resolve(name).to_string();
                match self.lookup(name).cloned() {
                    None => {
                        self.report(
                            DiagnosticCode::AssignToUndeclared,
                            format!("cannot assign to undeclared name `{}`", shown),
                            span,
                        );
                        self.check_expr(value, None);
                    }
                    Some(SymbolInfo::Constant { .. }) => {
                        self.report(
                            DiagnosticCode::AssignToConst,
                            format!("`{}` is a constant and cannot be rebound", shown),
                            span,
                        );
                        self.check_expr(value, None);
                    }
                    Some(SymbolInfo::Variable { loop_var: true, .. }) => {
                        self.report(
                            DiagnosticCode::AssignToLoopVariable,
                            format!("loop variable `{}` cannot be reassigned", shown),
                            span,
                        );
                        self.check_expr(value, None);
                    }
                    Some(SymbolInfo::Variable { ty, .. }) => {
                        target.ty = Some(ty.clone());
                        let actual = self.check_expr(value, Some(&ty));
                        if !ty.accepts(&actual) {
                            let message = format!(
                                "expected `{}`, found `{}`",
                                ty.display(self.interner),
                                actual.display(self.interner)
                            );
                            let value_span = value.span.clone();
                            self.report(DiagnosticCode::TypeMismatch, message, &value_span);
                        }
                    }
                    Some(_) => {
                        self.report(
                            DiagnosticCode::InvalidAssignmentTarget,
                            format!("`{}` is not assignable", shown),
                            span,
                        );
                        self.check_expr(value, None);
                    }
                }
            }
            // Index or member target; interior mutation through a `const`
            // binding is allowed, so no constness check here.
            _ => {
                let target_ty = self.check_expr(target, None);
                let actual = self.check_expr(value, Some(&target_ty));
                if !target_ty.accepts(&actual) {
                    let message = format!(
                        "expected `{}`, found `{}`",
                        target_ty.display(self.interner),
                        actual.display(self.interner)
                    );
                    let value_span = value.span.clone();
                    self.report(DiagnosticCode::TypeMismatch, message, &value_span);
                }
            }
        }
    }

    // ── Expressions ─────────────────────────────────────────────────────

    /// Types an expression, writes the result into its `ty` slot, and
    /// returns it. `expected` is a hint only — it types otherwise-untypable
    /// literals (`[]`, `{}`) and is never a coercion.
    pub(crate) fn check_expr(&mut self, expr: &mut Expr, expected: Option<&Type>) -> Type {
        let ty = self.infer_expr(expr, expected);
        expr.ty = Some(ty.clone());
        ty
    }

    fn infer_expr(&mut self, expr: &mut Expr, expected: Option<&Type>) -> Type {
        // These three need access to the whole node (to rewrite it or to
        // look through the callee), so they dispatch before the kind match.
        match expr.kind {
            ExprKind::Member { .. } => return self.infer_member(expr),
            ExprKind::MethodCall { .. } => return self.infer_method_call(expr),
            ExprKind::Call { .. } => return self.infer_call(expr),
            ExprKind::StructInit { .. } => return self.infer_struct_init(expr),
            _ => {}
        }

        let span = expr.span.clone();
        match &mut expr.kind {
            ExprKind::Int(_) => Type::Int,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Str { .. } => Type::Str,
            ExprKind::Bool(_) => Type::Bool,
            ExprKind::Ident(name) => {
                let name = *name;
                match self.lookup(name) {
                    Some(SymbolInfo::Variable { ty, .. }) | Some(SymbolInfo::Constant { ty }) => {
                        ty.clone()
                    }
                    Some(SymbolInfo::Module) => Type::Module(name),
                    Some(SymbolInfo::Function) => match self.functions.get(&name) {
                        Some(sig) => Type::Function(sig.params.clone(), Box::new(sig.ret.clone())),
                        None => Type::Any,
                    },
                    Some(SymbolInfo::Struct) | Some(SymbolInfo::Enum) => {
                        let shown = self.interner.resolve(name).to_string();
                        self.report(
                            DiagnosticCode::UndefinedName,
                            format!("`{}` is a type name, not a value", shown),
                            &span,
                        );
                        Type::Any
                    }
                    None => {
                        let shown = self.interner.resolve(name).to_string();
                        self.report(
                            DiagnosticCode::UndefinedName,
                            format!("`{}` is not defined", shown),
                            &span,
                        );
                        Type::Any
                    }
                }
            }
            ExprKind::List(elements) => {
                if elements.is_empty() {
                    return match expected {
                        Some(Type::List(elem)) => Type::List(elem.clone()),
                        Some(Type::Any) => Type::List(Box::new(Type::Any)),
                        _ => {
                            self.report(
                                DiagnosticCode::UntypedEmptyList,
                                "empty list literal needs a declared element type".to_string(),
                                &span,
                            );
                            Type::List(Box::new(Type::Any))
                        }
                    };
                }
                let elem_hint = match expected {
                    Some(Type::List(elem)) => Some(elem.as_ref().clone()),
                    _ => None,
                };
                let mut iter = elements.iter_mut();
                let first = iter.next().expect("non-empty list literal");
                let first_ty = self.check_expr(first, elem_hint.as_ref());
                let mut reported = false;
                for element in iter {
                    let hint = elem_hint.clone().unwrap_or_else(|| first_ty.clone());
                    let ty = self.check_expr(element, Some(&hint));
                    if !reported && !first_ty.accepts(&ty) && !ty.accepts(&first_ty) {
                        let message = format!(
                            "list elements must share one type: `{}` vs `{}`",
                            first_ty.display(self.interner),
                            ty.display(self.interner)
                        );
                        let element_span = element.span.clone();
                        self.report(DiagnosticCode::HeterogeneousList, message, &element_span);
                        reported = true;
                    }
                }
                Type::List(Box::new(first_ty))
            }
            ExprKind::Dict(entries) => {
                if entries.is_empty() {
                    return match expected {
                        Some(Type::Dict(key, value)) => {
                            Type::Dict(key.clone(), value.clone())
                        }
                        Some(Type::Any) => Type::Dict(Box::new(Type::Any), Box::new(Type::Any)),
                        _ => {
                            self.report(
                                DiagnosticCode::UntypedEmptyList,
                                "empty dict literal needs a declared key and value type"
                                    .to_string(),
                                &span,
                            );
                            Type::Dict(Box::new(Type::Any), Box::new(Type::Any))
                        }
                    };
                }
                let (key_hint, value_hint) = match expected {
                    Some(Type::Dict(key, value)) => {
                        (Some(key.as_ref().clone()), Some(value.as_ref().clone()))
                    }
                    _ => (None, None),
                };
                let mut first_key: Option<Type> = None;
                let mut first_value: Option<Type> = None;
                let mut keys_reported = false;
                let mut values_reported = false;
                for (key, value) in entries.iter_mut() {
                    let key_ty = self.check_expr(key, key_hint.as_ref().or(first_key.as_ref()));
                    let value_ty =
                        self.check_expr(value, value_hint.as_ref().or(first_value.as_ref()));
                    match &first_key {
                        None => {
                            if !key_ty.is_valid_dict_key() {
                                let message = format!(
                                    "`{}` cannot be a dict key; keys are int, str, or bool",
                                    key_ty.display(self.interner)
                                );
                                let key_span = key.span.clone();
                                self.report(DiagnosticCode::InvalidDictKeyType, message, &key_span);
                            }
                            first_key = Some(key_ty);
                            first_value = Some(value_ty);
                        }
                        Some(expected_key) => {
                            if !keys_reported
                                && !expected_key.accepts(&key_ty)
                                && !key_ty.accepts(expected_key)
                            {
                                let message = format!(
                                    "dict keys must share one type: `{}` vs `{}`",
                                    expected_key.display(self.interner),
                                    key_ty.display(self.interner)
                                );
                                let key_span = key.span.clone();
                                self.report(DiagnosticCode::MixedDictKeys, message, &key_span);
                                keys_reported = true;
                            }
                            let expected_value =
                                first_value.as_ref().expect("set with first_key");
                            if !values_reported
                                && !expected_value.accepts(&value_ty)
                                && !value_ty.accepts(expected_value)
                            {
                                let message = format!(
                                    "dict values must share one type: `{}` vs `{}`",
                                    expected_value.display(self.interner),
                                    value_ty.display(self.interner)
                                );
                                let value_span = value.span.clone();
                                self.report(DiagnosticCode::MixedDictValues, message, &value_span);
                                values_reported = true;
                            }
                        }
                    }
                }
                Type::Dict(
                    Box::new(first_key.unwrap_or(Type::Any)),
                    Box::new(first_value.unwrap_or(Type::Any)),
                )
            }
            ExprKind::Range(start, end) => {
                for endpoint in [start.as_mut(), end.as_mut()] {
                    let ty = self.check_expr(endpoint, Some(&Type::Int));
                    if !matches!(ty, Type::Int | Type::Any) {
                        let message = format!(
                            "range endpoints must be `int`, found `{}`",
                            ty.display(self.interner)
                        );
                        let endpoint_span = endpoint.span.clone();
                        self.report(DiagnosticCode::RangeEndpointNotInt, message, &endpoint_span);
                    }
                }
                // A range iterates ints; giving it a list type means the
                // `for` typing rule needs no special case.
                Type::List(Box::new(Type::Int))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let op = *op;
                let lhs_ty = self.check_expr(lhs, None);
                let rhs_ty = self.check_expr(rhs, None);
                self.infer_binary(op, &lhs_ty, &rhs_ty, &span)
            }
            ExprKind::Unary { op, operand } => {
                let op = *op;
                let operand_ty = self.check_expr(operand, None);
                match (op, &operand_ty) {
                    (UnaryOp::Neg, Type::Int) => Type::Int,
                    (UnaryOp::Neg, Type::Float) => Type::Float,
                    (UnaryOp::Neg, Type::Any) => Type::Any,
                    (UnaryOp::Not, Type::Bool) | (UnaryOp::Not, Type::Any) => Type::Bool,
                    _ => {
                        let symbol = match op {
                            UnaryOp::Neg => "-",
                            UnaryOp::Not => "!",
                        };
                        let message = format!(
                            "cannot apply unary `{}` to `{}`",
                            symbol,
                            operand_ty.display(self.interner)
                        );
                        self.report(DiagnosticCode::InvalidUnaryOperand, message, &span);
                        if op == UnaryOp::Not {
                            Type::Bool
                        } else {
                            Type::Any
                        }
                    }
                }
            }
            ExprKind::Cast { kind, args } => {
                let kind = *kind;
                if args.len() != 1 {
                    let message = format!(
                        "`{}` takes exactly one argument, got {}",
                        kind.python_name(),
                        args.len()
                    );
                    self.report(DiagnosticCode::CastArgumentCount, message, &span);
                }
                for arg in args.iter_mut() {
                    let ty = self.check_expr(arg, None);
                    if !ty.is_printable() {
                        let message = format!(
                            "cannot cast `{}` to `{}`",
                            ty.display(self.interner),
                            kind.python_name()
                        );
                        let arg_span = arg.span.clone();
                        self.report(DiagnosticCode::ArgumentTypeMismatch, message, &arg_span);
                    }
                }
                kind.result_type()
            }
            ExprKind::Index { receiver, index } => {
                let receiver_ty = self.check_expr(receiver, None);
                match receiver_ty {
                    Type::List(elem) => {
                        let index_ty = self.check_expr(index, Some(&Type::Int));
                        if !matches!(index_ty, Type::Int | Type::Any) {
                            let message = format!(
                                "list index must be `int`, found `{}`",
                                index_ty.display(self.interner)
                            );
                            let index_span = index.span.clone();
                            self.report(DiagnosticCode::ListIndexNotInt, message, &index_span);
                        }
                        *elem
                    }
                    Type::Dict(key, value) => {
                        let index_ty = self.check_expr(index, Some(key.as_ref()));
                        if !key.accepts(&index_ty) {
                            let message = format!(
                                "dict key is `{}`, found `{}`",
                                key.display(self.interner),
                                index_ty.display(self.interner)
                            );
                            let index_span = index.span.clone();
                            self.report(DiagnosticCode::DictKeyMismatch, message, &index_span);
                        }
                        *value
                    }
                    Type::Any => {
                        self.check_expr(index, None);
                        Type::Any
                    }
                    other => {
                        self.check_expr(index, None);
                        let message = format!(
                            "cannot index a value of type `{}`",
                            other.display(self.interner)
                        );
                        self.report(DiagnosticCode::NotIndexable, message, &span);
                        Type::Any
                    }
                }
            }
            ExprKind::EnumVariant { enum_name, variant } => {
                let enum_name = *enum_name;
                let variant = *variant;
                self.validate_enum_variant(enum_name, variant, &span);
                Type::Enum(enum_name)
            }
            ExprKind::Member { .. }
            | ExprKind::MethodCall { .. }
            | ExprKind::Call { .. }
            | ExprKind::StructInit { .. } => {
                unreachable!("dispatched before the kind match")
            }
        }
    }

    fn infer_binary(&mut self, op: BinaryOp, lhs: &Type, rhs: &Type, span: &Span) -> Type {
        // Enums first: they admit only `==` and `!=`.
        let involves_enum = matches!(lhs, Type::Enum(_)) || matches!(rhs, Type::Enum(_));
        if involves_enum && !op.is_equality() {
            let message = format!("`{}` cannot be applied to enum values", op.as_source_str());
            self.report(DiagnosticCode::InvalidEnumOperator, message, span);
            return if op.is_arithmetic() { Type::Any } else { Type::Bool };
        }

        if op.is_arithmetic() {
            return match (lhs, rhs) {
                (Type::Int, Type::Int) => Type::Int,
                (Type::Float, Type::Float) => Type::Float,
                (Type::Str, Type::Str) if op == BinaryOp::Add => Type::Str,
                (Type::Any, other) | (other, Type::Any)
                    if other.is_numeric()
                        || *other == Type::Any
                        || (*other == Type::Str && op == BinaryOp::Add) =>
                {
                    other.clone()
                }
                _ => {
                    let message = format!(
                        "cannot apply `{}` to `{}` and `{}`",
                        op.as_source_str(),
                        lhs.display(self.interner),
                        rhs.display(self.interner)
                    );
                    self.report(DiagnosticCode::ArithmeticTypeMismatch, message, span);
                    Type::Any
                }
            };
        }

        if op.is_equality() {
            if let (Type::Enum(left), Type::Enum(right)) = (lhs, rhs) {
                if left != right {
                    let message = format!(
                        "cannot compare `{}` with `{}`",
                        lhs.display(self.interner),
                        rhs.display(self.interner)
                    );
                    self.report(DiagnosticCode::EnumTypeMismatch, message, span);
                }
                return Type::Bool;
            }
            if !lhs.accepts(rhs) && !rhs.accepts(lhs) {
                let message = format!(
                    "cannot compare `{}` with `{}`",
                    lhs.display(self.interner),
                    rhs.display(self.interner)
                );
                self.report(DiagnosticCode::EqualityTypeMismatch, message, span);
            }
            return Type::Bool;
        }

        if op.is_ordering() {
            let ordered = matches!(
                (lhs, rhs),
                (Type::Int, Type::Int)
                    | (Type::Float, Type::Float)
                    | (Type::Any, Type::Int)
                    | (Type::Any, Type::Float)
                    | (Type::Int, Type::Any)
                    | (Type::Float, Type::Any)
                    | (Type::Any, Type::Any)
            );
            if !ordered {
                let message = format!(
                    "`{}` needs two ints or two floats, found `{}` and `{}`",
                    op.as_source_str(),
                    lhs.display(self.interner),
                    rhs.display(self.interner)
                );
                self.report(DiagnosticCode::OrderingTypeMismatch, message, span);
            }
            return Type::Bool;
        }

        // Logical: && and ||.
        let boolish = |ty: &Type| matches!(ty, Type::Bool | Type::Any);
        if !boolish(lhs) || !boolish(rhs) {
            let message = format!(
                "`{}` needs `bool` operands, found `{}` and `{}`",
                op.as_source_str(),
                lhs.display(self.interner),
                rhs.display(self.interner)
            );
            self.report(DiagnosticCode::LogicalTypeMismatch, message, span);
        }
        Type::Bool
    }

    // ── Member access ───────────────────────────────────────────────────

    fn infer_member(&mut self, expr: &mut Expr) -> Type {
        let span = expr.span.clone();

        // `Color.Red` — the receiver names a declared enum. Rewrite into an
        // EnumVariant node so downstream passes match on disjoint shapes.
        if let ExprKind::Member { receiver, field } = &expr.kind {
            if let ExprKind::Ident(name) = receiver.kind {
                if matches!(self.lookup(name), Some(SymbolInfo::Enum)) {
                    let variant = *field;
                    self.validate_enum_variant(name, variant, &span);
                    expr.kind = ExprKind::EnumVariant {
                        enum_name: name,
                        variant,
                    };
                    return Type::Enum(name);
                }
            }
        }

        // `utils.Color.Red` — variant access through a local module's
        // exported enum. The node stays a member chain (it must emit with
        // the module prefix), only its type is pinned here.
        if let Some(ty) = self.try_module_enum_access(expr) {
            return ty;
        }

        let (receiver_ty, field) = match &mut expr.kind {
            ExprKind::Member { receiver, field } => {
                (self.check_expr(receiver, None), *field)
            }
            _ => unreachable!("infer_member on a non-member node"),
        };
        let shown = self.interner.resolve(field).to_string();

        match receiver_ty {
            Type::Struct(name) => {
                match self.structs.get(&name).and_then(|def| def.field_type(field)) {
                    Some(ty) => ty.clone(),
                    None => {
                        let struct_name = self.interner.resolve(name).to_string();
                        self.report(
                            DiagnosticCode::UnknownField,
                            format!("struct `{}` has no field `{}`", struct_name, shown),
                            &span,
                        );
                        Type::Any
                    }
                }
            }
            Type::Module(module) => match self.modules.get(&module) {
                Some(ModuleKind::Opaque) => Type::Any,
                Some(ModuleKind::Local(exports)) => {
                    if let Some(sig) = exports.functions.get(&field) {
                        Type::Function(sig.params.clone(), Box::new(sig.ret.clone()))
                    } else if exports.enums.contains_key(&field)
                        || exports.structs.contains_key(&field)
                    {
                        Type::Any
                    } else {
                        let module_name = self.interner.resolve(module).to_string();
                        self.report(
                            DiagnosticCode::UndefinedName,
                            format!("module `{}` has no member `{}`", module_name, shown),
                            &span,
                        );
                        Type::Any
                    }
                }
                None => Type::Any,
            },
            Type::Any => Type::Any,
            other => {
                let message = format!(
                    "a value of type `{}` has no members",
                    other.display(self.interner)
                );
                self.report(DiagnosticCode::NoMembers, message, &span);
                Type::Any
            }
        }
    }

    /// Recognizes `module.Enum.Variant` and types it without rewriting.
    fn try_module_enum_access(&mut self, expr: &mut Expr) -> Option<Type> {
        let span = expr.span.clone();
        let (module_sym, enum_sym, variant) = match &expr.kind {
            ExprKind::Member { receiver, field } => match &receiver.kind {
                ExprKind::Member {
                    receiver: inner,
                    field: enum_sym,
                } => match inner.kind {
                    ExprKind::Ident(module_sym) => (module_sym, *enum_sym, *field),
                    _ => return None,
                },
                _ => return None,
            },
            _ => return None,
        };

        match self.modules.get(&module_sym) {
            Some(ModuleKind::Local(exports)) if exports.enums.contains_key(&enum_sym) => {}
            _ => return None,
        }

        self.validate_enum_variant(enum_sym, variant, &span);

        // Pin the chain's intermediate types so the annotation invariant
        // holds for every node.
        if let ExprKind::Member { receiver, .. } = &mut expr.kind {
            receiver.ty = Some(Type::Any);
            if let ExprKind::Member { receiver: inner, .. } = &mut receiver.kind {
                inner.ty = Some(Type::Module(module_sym));
            }
        }
        Some(Type::Enum(enum_sym))
    }

    fn validate_enum_variant(&mut self, enum_name: quasar_base::Symbol, variant: quasar_base::Symbol, span: &Span) {
        let known = self
            .enums
            .get(&enum_name)
            .map(|def| def.variants.contains(&variant))
            .unwrap_or(false);
        if !known {
            let enum_shown = self.interner.resolve(enum_name).to_string();
            let variant_shown = self.interner.resolve(variant).to_string();
            self.report(
                DiagnosticCode::UnknownVariant,
                format!("enum `{}` has no variant `{}`", enum_shown, variant_shown),
                span,
            );
        }
    }

    // ── Method calls ────────────────────────────────────────────────────

    fn infer_method_call(&mut self, expr: &mut Expr) -> Type {
        let span = expr.span.clone();
        let (receiver_ty, method) = match &mut expr.kind {
            ExprKind::MethodCall {
                receiver, method, ..
            } => (self.check_expr(receiver, None), *method),
            _ => unreachable!("infer_method_call on a non-method node"),
        };
        let method_name = self.interner.resolve(method).to_string();

        let (family, elem, key, value) = match &receiver_ty {
            Type::Str => (Family::Str, None, None, None),
            Type::List(elem) => (Family::List, Some(elem.as_ref().clone()), None, None),
            Type::Dict(key, value) => (
                Family::Dict,
                None,
                Some(key.as_ref().clone()),
                Some(value.as_ref().clone()),
            ),
            Type::Module(module) => {
                let module = *module;
                return self.infer_module_call(expr, module, method, &span);
            }
            Type::Any => {
                self.check_args_untyped(expr);
                return Type::Any;
            }
            other => {
                let message = format!(
                    "a value of type `{}` has no methods",
                    other.display(self.interner)
                );
                self.report(DiagnosticCode::NoMethods, message, &span);
                self.check_args_untyped(expr);
                return Type::Any;
            }
        };

        let sig = match methods::lookup(family, &method_name) {
            Some(sig) => sig,
            None => {
                let message = format!(
                    "no method `{}` on `{}`",
                    method_name,
                    receiver_ty.display(self.interner)
                );
                self.report(DiagnosticCode::UnknownMethod, message, &span);
                self.check_args_untyped(expr);
                return Type::Any;
            }
        };

        // `join` concatenates strings; any other element type is rejected
        // before the signature is even consulted.
        if family == Family::List && method_name == "join" {
            if let Some(elem_ty) = &elem {
                if !matches!(elem_ty, Type::Str | Type::Any) {
                    let message = format!(
                        "`join` needs a `[str]` receiver, found `{}`",
                        receiver_ty.display(self.interner)
                    );
                    self.report(DiagnosticCode::JoinReceiverNotStringList, message, &span);
                }
            }
        }

        let args = match &mut expr.kind {
            ExprKind::MethodCall { args, .. } => args,
            _ => unreachable!(),
        };

        if args.len() != sig.params.len() {
            let message = format!(
                "`{}` takes {} argument(s), got {}",
                method_name,
                sig.params.len(),
                args.len()
            );
            self.report(DiagnosticCode::MethodArgumentCount, message, &span);
            self.check_args_untyped(expr);
            return sig.ret.substitute(elem.as_ref(), key.as_ref(), value.as_ref());
        }

        for (arg, param) in args.iter_mut().zip(sig.params.iter()) {
            let expected = param.substitute(elem.as_ref(), key.as_ref(), value.as_ref());
            let actual = self.check_expr(arg, Some(&expected));
            if !expected.accepts(&actual) {
                let code = if param.is_generic() {
                    DiagnosticCode::GenericArgumentMismatch
                } else {
                    DiagnosticCode::MethodArgumentType
                };
                let message = format!(
                    "`{}` expects `{}`, found `{}`",
                    method_name,
                    expected.display(self.interner),
                    actual.display(self.interner)
                );
                let arg_span = arg.span.clone();
                self.report(code, message, &arg_span);
            }
        }

        sig.ret.substitute(elem.as_ref(), key.as_ref(), value.as_ref())
    }

    /// `module.function(args)` — opaque modules accept anything; local
    /// modules check against the exported signature.
    fn infer_module_call(
        &mut self,
        expr: &mut Expr,
        module: quasar_base::Symbol,
        method: quasar_base::Symbol,
        span: &Span,
    ) -> Type {
        let sig = match self.modules.get(&module) {
            Some(ModuleKind::Opaque) | None => {
                self.check_args_untyped(expr);
                return Type::Any;
            }
            Some(ModuleKind::Local(exports)) => match exports.functions.get(&method) {
                Some(sig) => sig.clone(),
                None => {
                    let module_name = self.interner.resolve(module).to_string();
                    let method_name = self.interner.resolve(method).to_string();
                    self.report(
                        DiagnosticCode::UndefinedName,
                        format!("module `{}` has no function `{}`", module_name, method_name),
                        span,
                    );
                    self.check_args_untyped(expr);
                    return Type::Any;
                }
            },
        };
        self.check_sig_call(expr, &sig, span)
    }

    /// Checks the call arguments of `expr` against a known signature.
    fn check_sig_call(&mut self, expr: &mut Expr, sig: &FnSig, span: &Span) -> Type {
        let args = match &mut expr.kind {
            ExprKind::MethodCall { args, .. } | ExprKind::Call { args, .. } => args,
            _ => unreachable!("check_sig_call on a non-call node"),
        };
        if args.len() != sig.params.len() {
            let message = format!(
                "expected {} argument(s), got {}",
                sig.params.len(),
                args.len()
            );
            self.report(DiagnosticCode::WrongArgumentCount, message, span);
            for arg in args.iter_mut() {
                self.check_expr(arg, None);
            }
            return sig.ret.clone();
        }
        for (index, (arg, expected)) in args.iter_mut().zip(sig.params.iter()).enumerate() {
            let actual = self.check_expr(arg, Some(expected));
            if !expected.accepts(&actual) {
                let message = format!(
                    "argument {} expects `{}`, found `{}`",
                    index + 1,
                    expected.display(self.interner),
                    actual.display(self.interner)
                );
                let arg_span = arg.span.clone();
                self.report(DiagnosticCode::ArgumentTypeMismatch, message, &arg_span);
            }
        }
        sig.ret.clone()
    }

    /// Types every argument with no expectation; used on error paths and
    /// for opaque targets so the annotation invariant still holds.
    fn check_args_untyped(&mut self, expr: &mut Expr) {
        if let ExprKind::MethodCall { args, .. } | ExprKind::Call { args, .. } = &mut expr.kind {
            for arg in args {
                self.check_expr(arg, None);
            }
        }
    }

    // ── Calls ───────────────────────────────────────────────────────────

    fn infer_call(&mut self, expr: &mut Expr) -> Type {
        let span = expr.span.clone();

        // Built-ins and user functions are reached through a bare name.
        let callee_name = match &expr.kind {
            ExprKind::Call { callee, .. } => match callee.kind {
                ExprKind::Ident(name) => Some(name),
                _ => None,
            },
            _ => unreachable!("infer_call on a non-call node"),
        };

        if let Some(name) = callee_name {
            let text = self.interner.resolve(name).to_string();
            match text.as_str() {
                "len" => return self.check_len_call(expr, &span),
                "push" => return self.check_push_call(expr, &span),
                "keys" => return self.check_keys_values_call(expr, &span, true),
                "values" => return self.check_keys_values_call(expr, &span, false),
                "input" => return self.check_input_call(expr, &span),
                _ => {}
            }

            if matches!(self.lookup(name), Some(SymbolInfo::Function)) {
                let sig = self
                    .functions
                    .get(&name)
                    .cloned()
                    .unwrap_or(FnSig {
                        params: Vec::new(),
                        ret: Type::Any,
                    });
                if let ExprKind::Call { callee, .. } = &mut expr.kind {
                    callee.ty = Some(Type::Function(
                        sig.params.clone(),
                        Box::new(sig.ret.clone()),
                    ));
                }
                return self.check_sig_call(expr, &sig, &span);
            }

            if self.lookup(name).is_none() {
                self.report(
                    DiagnosticCode::NotCallable,
                    format!("unknown function `{}`", text),
                    &span,
                );
                if let ExprKind::Call { callee, .. } = &mut expr.kind {
                    callee.ty = Some(Type::Any);
                }
                self.check_args_untyped(expr);
                return Type::Any;
            }
        }

        // Anything else: type the callee and require a function or `Any`.
        let callee_ty = match &mut expr.kind {
            ExprKind::Call { callee, .. } => self.check_expr(callee, None),
            _ => unreachable!(),
        };
        match callee_ty {
            Type::Function(params, ret) => {
                let sig = FnSig {
                    params,
                    ret: *ret,
                };
                self.check_sig_call(expr, &sig, &span)
            }
            Type::Any => {
                self.check_args_untyped(expr);
                Type::Any
            }
            other => {
                let message = format!(
                    "a value of type `{}` is not callable",
                    other.display(self.interner)
                );
                self.report(DiagnosticCode::NotCallable, message, &span);
                self.check_args_untyped(expr);
                Type::Any
            }
        }
    }

    fn call_parts<'e>(expr: &'e mut Expr) -> (&'e mut Expr, &'e mut Vec<Expr>) {
        match &mut expr.kind {
            ExprKind::Call { callee, args } => (callee.as_mut(), args),
            _ => unreachable!("expected a call node"),
        }
    }

    fn check_len_call(&mut self, expr: &mut Expr, span: &Span) -> Type {
        {
            let (callee, _) = Self::call_parts(expr);
            callee.ty = Some(Type::Function(vec![Type::Any], Box::new(Type::Int)));
        }
        let arg_count = match &expr.kind {
            ExprKind::Call { args, .. } => args.len(),
            _ => unreachable!(),
        };
        if arg_count != 1 {
            self.report(
                DiagnosticCode::WrongArgumentCount,
                format!("`len` takes exactly one argument, got {}", arg_count),
                span,
            );
            self.check_args_untyped(expr);
            return Type::Int;
        }
        let arg_ty = self.check_arg_at(expr, 0, None);
        if !matches!(arg_ty, Type::List(_) | Type::Dict(_, _) | Type::Str | Type::Any) {
            let message = format!(
                "`len` expects a list, dict, or str, found `{}`",
                arg_ty.display(self.interner)
            );
            self.report(DiagnosticCode::ArgumentTypeMismatch, message, span);
        }
        Type::Int
    }

    fn check_push_call(&mut self, expr: &mut Expr, span: &Span) -> Type {
        {
            let (callee, _) = Self::call_parts(expr);
            callee.ty = Some(Type::Function(
                vec![Type::Any, Type::Any],
                Box::new(Type::Void),
            ));
        }
        let arg_count = match &expr.kind {
            ExprKind::Call { args, .. } => args.len(),
            _ => unreachable!(),
        };
        if arg_count != 2 {
            self.report(
                DiagnosticCode::WrongArgumentCount,
                format!("`push` takes a list and a value, got {} argument(s)", arg_count),
                span,
            );
            self.check_args_untyped(expr);
            return Type::Void;
        }

        let list_ty = self.check_arg_at(expr, 0, None);
        match list_ty {
            Type::List(elem) => {
                let value_ty = self.check_arg_at(expr, 1, Some(&elem));
                if !elem.accepts(&value_ty) {
                    let message = format!(
                        "`push` into `[{}]` cannot take `{}`",
                        elem.display(self.interner),
                        value_ty.display(self.interner)
                    );
                    self.report(DiagnosticCode::ArgumentTypeMismatch, message, span);
                }
            }
            Type::Any => {
                self.check_arg_at(expr, 1, None);
            }
            other => {
                let message = format!(
                    "`push` expects a list, found `{}`",
                    other.display(self.interner)
                );
                self.report(DiagnosticCode::ArgumentTypeMismatch, message, span);
                self.check_arg_at(expr, 1, None);
            }
        }
        Type::Void
    }

    fn check_keys_values_call(&mut self, expr: &mut Expr, span: &Span, keys: bool) -> Type {
        let name = if keys { "keys" } else { "values" };
        {
            let (callee, _) = Self::call_parts(expr);
            callee.ty = Some(Type::Function(
                vec![Type::Any],
                Box::new(Type::List(Box::new(Type::Any))),
            ));
        }
        let arg_count = match &expr.kind {
            ExprKind::Call { args, .. } => args.len(),
            _ => unreachable!(),
        };
        if arg_count != 1 {
            self.report(
                DiagnosticCode::WrongArgumentCount,
                format!("`{}` takes exactly one argument, got {}", name, arg_count),
                span,
            );
            self.check_args_untyped(expr);
            return Type::List(Box::new(Type::Any));
        }
        let arg_ty = self.check_arg_at(expr, 0, None);
        match arg_ty {
            Type::Dict(key, value) => Type::List(if keys { key } else { value }),
            Type::Any => Type::List(Box::new(Type::Any)),
            other => {
                let message = format!(
                    "`{}` expects a dict, found `{}`",
                    name,
                    other.display(self.interner)
                );
                self.report(DiagnosticCode::ArgumentTypeMismatch, message, span);
                Type::List(Box::new(Type::Any))
            }
        }
    }

    fn check_input_call(&mut self, expr: &mut Expr, span: &Span) -> Type {
        {
            let (callee, _) = Self::call_parts(expr);
            callee.ty = Some(Type::Function(vec![Type::Str], Box::new(Type::Str)));
        }
        let arg_count = match &expr.kind {
            ExprKind::Call { args, .. } => args.len(),
            _ => unreachable!(),
        };
        if arg_count > 1 {
            self.report(
                DiagnosticCode::InputArgumentCount,
                format!("`input` takes at most one argument, got {}", arg_count),
                span,
            );
            self.check_args_untyped(expr);
            return Type::Str;
        }
        if arg_count == 1 {
            let arg_ty = self.check_arg_at(expr, 0, Some(&Type::Str));
            if !matches!(arg_ty, Type::Str | Type::Any) {
                let message = format!(
                    "`input` prompt must be `str`, found `{}`",
                    arg_ty.display(self.interner)
                );
                self.report(DiagnosticCode::InputPromptNotString, message, span);
            }
        }
        Type::Str
    }

    /// Checks one call argument in place.
    fn check_arg_at(&mut self, expr: &mut Expr, index: usize, expected: Option<&Type>) -> Type {
        match &mut expr.kind {
            ExprKind::Call { args, .. } | ExprKind::MethodCall { args, .. } => {
                self.check_expr(&mut args[index], expected)
            }
            _ => unreachable!("check_arg_at on a non-call node"),
        }
    }

    // ── Struct initializers ─────────────────────────────────────────────

    pub(crate) fn infer_struct_init(&mut self, expr: &mut Expr) -> Type {
        let span = expr.span.clone();
        let name = match &expr.kind {
            ExprKind::StructInit { name, .. } => *name,
            _ => unreachable!("infer_struct_init on a non-initializer node"),
        };

        let def = match self.structs.get(&name).cloned() {
            Some(def) => def,
            None => {
                let shown = self.interner.resolve(name).to_string();
                self.report(
                    DiagnosticCode::UnknownStruct,
                    format!("unknown struct `{}`", shown),
                    &span,
                );
                let field_count = match &expr.kind {
                    ExprKind::StructInit { fields, .. } => fields.len(),
                    _ => unreachable!(),
                };
                for index in 0..field_count {
                    self.check_init_field(expr, index, None);
                }
                return Type::Any;
            }
        };

        let mut seen: Vec<quasar_base::Symbol> = Vec::new();
        let field_count = match &expr.kind {
            ExprKind::StructInit { fields, .. } => fields.len(),
            _ => unreachable!(),
        };
        for index in 0..field_count {
            let (field, value_span) = match &expr.kind {
                ExprKind::StructInit { fields, .. } => {
                    (fields[index].0, fields[index].1.span.clone())
                }
                _ => unreachable!(),
            };
            if seen.contains(&field) {
                let shown = self.interner.resolve(field).to_string();
                self.report(
                    DiagnosticCode::DuplicateFieldInInitializer,
                    format!("field `{}` given twice", shown),
                    &value_span,
                );
            } else {
                seen.push(field);
            }

            match def.field_type(field).cloned() {
                Some(field_ty) => {
                    let actual = self.check_init_field(expr, index, Some(&field_ty));
                    if !field_ty.accepts(&actual) {
                        let shown = self.interner.resolve(field).to_string();
                        let message = format!(
                            "field `{}` expects `{}`, found `{}`",
                            shown,
                            field_ty.display(self.interner),
                            actual.display(self.interner)
                        );
                        self.report(DiagnosticCode::FieldTypeMismatch, message, &value_span);
                    }
                }
                None => {
                    let struct_shown = self.interner.resolve(name).to_string();
                    let field_shown = self.interner.resolve(field).to_string();
                    self.report(
                        DiagnosticCode::UnknownFieldInInitializer,
                        format!("struct `{}` has no field `{}`", struct_shown, field_shown),
                        &value_span,
                    );
                    self.check_init_field(expr, index, None);
                }
            }
        }

        for (field, _) in &def.fields {
            if !seen.contains(field) {
                let struct_shown = self.interner.resolve(name).to_string();
                let field_shown = self.interner.resolve(*field).to_string();
                self.report(
                    DiagnosticCode::MissingField,
                    format!(
                        "initializer of `{}` is missing field `{}`",
                        struct_shown, field_shown
                    ),
                    &span,
                );
            }
        }

        Type::Struct(name)
    }

    fn check_init_field(&mut self, expr: &mut Expr, index: usize, expected: Option<&Type>) -> Type {
        match &mut expr.kind {
            ExprKind::StructInit { fields, .. } => {
                self.check_expr(&mut fields[index].1, expected)
            }
            _ => unreachable!("check_init_field on a non-initializer node"),
        }
    }
}
