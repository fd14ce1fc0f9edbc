//! Expression emission.
//!
//! Mostly a 1:1 spelling change; the notable cases are the primitive
//! methods whose Python counterparts invert receiver and argument
//! (`join`), become operators (`contains`, `has_key`), or become free
//! functions (`len`, `to_int`). Module member calls pass through verbatim
//! — the receiver's resolved type distinguishes `math.pow(x, 2)` from a
//! primitive method of the same spelling.
//!
//! Integer division is the one type-directed rule: `/` on two `int`
//! operands emits `//` so the program observes integer arithmetic.

use quasar_base::Interner;
use quasar_syntax::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use quasar_syntax::types::Type;

pub fn codegen_expr(expr: &Expr, interner: &Interner) -> String {
    match &expr.kind {
        ExprKind::Int(value) => value.to_string(),
        ExprKind::Float(value) => float_literal(*value),
        // The original lexeme, quotes and escapes included: Quasar string
        // escapes are a subset of Python's, and placeholders survive
        // exactly as written.
        ExprKind::Str { lexeme, .. } => lexeme.clone(),
        ExprKind::Bool(value) => if *value { "True" } else { "False" }.to_string(),
        ExprKind::Ident(name) => interner.resolve(*name).to_string(),
        ExprKind::List(elements) => {
            let parts: Vec<String> = elements
                .iter()
                .map(|element| codegen_expr(element, interner))
                .collect();
            format!("[{}]", parts.join(", "))
        }
        ExprKind::Dict(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}: {}",
                        codegen_expr(key, interner),
                        codegen_expr(value, interner)
                    )
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        ExprKind::Range(start, end) => format!(
            "range({}, {})",
            codegen_expr(start, interner),
            codegen_expr(end, interner)
        ),
        ExprKind::Binary { op, lhs, rhs } => {
            let operator = python_binary_op(*op, lhs, rhs);
            format!(
                "({} {} {})",
                codegen_expr(lhs, interner),
                operator,
                codegen_expr(rhs, interner)
            )
        }
        ExprKind::Unary { op, operand } => match op {
            UnaryOp::Neg => format!("(-{})", codegen_expr(operand, interner)),
            UnaryOp::Not => format!("(not {})", codegen_expr(operand, interner)),
        },
        ExprKind::Call { callee, args } => codegen_call(callee, args, interner),
        ExprKind::Cast { kind, args } => {
            let parts: Vec<String> =
                args.iter().map(|arg| codegen_expr(arg, interner)).collect();
            format!("{}({})", kind.python_name(), parts.join(", "))
        }
        ExprKind::MethodCall {
            receiver,
            method,
            args,
        } => codegen_method_call(receiver, *method, args, interner),
        ExprKind::Member { receiver, field } => format!(
            "{}.{}",
            codegen_expr(receiver, interner),
            interner.resolve(*field)
        ),
        ExprKind::Index { receiver, index } => format!(
            "{}[{}]",
            codegen_expr(receiver, interner),
            codegen_expr(index, interner)
        ),
        ExprKind::StructInit { name, fields } => {
            let parts: Vec<String> = fields
                .iter()
                .map(|(field, value)| {
                    format!(
                        "{}={}",
                        interner.resolve(*field),
                        codegen_expr(value, interner)
                    )
                })
                .collect();
            format!("{}({})", interner.resolve(*name), parts.join(", "))
        }
        ExprKind::EnumVariant { enum_name, variant } => format!(
            "{}.{}",
            interner.resolve(*enum_name),
            interner.resolve(*variant)
        ),
    }
}

/// A float literal that stays a float in Python (`1` would re-type as int).
fn float_literal(value: f64) -> String {
    let text = format!("{}", value);
    if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{}.0", text)
    }
}

fn python_binary_op(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        // Two int operands use floor division so `int / int` observes
        // integer arithmetic; everything else is true division.
        BinaryOp::Div => {
            if lhs.ty == Some(Type::Int) && rhs.ty == Some(Type::Int) {
                "//"
            } else {
                "/"
            }
        }
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::LtEq => "<=",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

/// Free-function calls. The intercepted builtins map onto list/dict
/// spellings; user functions and module calls emit unchanged.
fn codegen_call(callee: &Expr, args: &[Expr], interner: &Interner) -> String {
    let rendered: Vec<String> = args.iter().map(|arg| codegen_expr(arg, interner)).collect();

    if let ExprKind::Ident(name) = callee.kind {
        match interner.resolve(name) {
            "len" if rendered.len() == 1 => return format!("len({})", rendered[0]),
            "push" if rendered.len() == 2 => {
                return format!("{}.append({})", rendered[0], rendered[1])
            }
            "keys" if rendered.len() == 1 => return format!("list({}.keys())", rendered[0]),
            "values" if rendered.len() == 1 => return format!("list({}.values())", rendered[0]),
            _ => {}
        }
    }

    format!(
        "{}({})",
        codegen_expr(callee, interner),
        rendered.join(", ")
    )
}

fn codegen_method_call(
    receiver: &Expr,
    method: quasar_base::Symbol,
    args: &[Expr],
    interner: &Interner,
) -> String {
    let target = codegen_expr(receiver, interner);
    let rendered: Vec<String> = args.iter().map(|arg| codegen_expr(arg, interner)).collect();
    let name = interner.resolve(method);

    // Module function calls pass through untouched; `json.get(...)` must
    // not be rewritten as a dict method.
    if matches!(receiver.ty, Some(Type::Module(_))) {
        return format!("{}.{}({})", target, name, rendered.join(", "));
    }

    let first = rendered.first().cloned().unwrap_or_default();
    match name {
        "len" => format!("len({})", target),
        "push" => format!("{}.append({})", target, first),
        "contains" | "has_key" => format!("({} in {})", first, target),
        "join" => format!("{}.join({})", first, target),
        "remove" => format!("{}.pop({}, None)", target, first),
        "keys" => format!("list({}.keys())", target),
        "values" => format!("list({}.values())", target),
        "trim" => format!("{}.strip()", target),
        "trim_start" => format!("{}.lstrip()", target),
        "trim_end" => format!("{}.rstrip()", target),
        "starts_with" => format!("{}.startswith({})", target, first),
        "ends_with" => format!("{}.endswith({})", target, first),
        "to_int" => format!("int({})", target),
        "to_float" => format!("float({})", target),
        // pop, get, clear, reverse, upper, lower, split, replace share
        // their Python spelling.
        _ => format!("{}.{}({})", target, name, rendered.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_base::Span;
    use quasar_syntax::ast::CastKind;

    fn typed(kind: ExprKind, ty: Type) -> Expr {
        let mut expr = Expr::new(kind, Span::default());
        expr.ty = Some(ty);
        expr
    }

    #[test]
    fn float_literals_keep_a_decimal_point() {
        assert_eq!(float_literal(3.14), "3.14");
        assert_eq!(float_literal(1.0), "1.0");
        assert_eq!(float_literal(0.5), "0.5");
    }

    #[test]
    fn int_division_emits_floor_division() {
        let interner = Interner::new();
        let expr = typed(
            ExprKind::Binary {
                op: BinaryOp::Div,
                lhs: Box::new(typed(ExprKind::Int(7), Type::Int)),
                rhs: Box::new(typed(ExprKind::Int(2), Type::Int)),
            },
            Type::Int,
        );
        assert_eq!(codegen_expr(&expr, &interner), "(7 // 2)");
    }

    #[test]
    fn float_division_emits_true_division() {
        let interner = Interner::new();
        let expr = typed(
            ExprKind::Binary {
                op: BinaryOp::Div,
                lhs: Box::new(typed(ExprKind::Float(7.0), Type::Float)),
                rhs: Box::new(typed(ExprKind::Float(2.0), Type::Float)),
            },
            Type::Float,
        );
        assert_eq!(codegen_expr(&expr, &interner), "(7.0 / 2.0)");
    }

    #[test]
    fn logical_operators_become_keywords() {
        let interner = Interner::new();
        let expr = typed(
            ExprKind::Binary {
                op: BinaryOp::And,
                lhs: Box::new(typed(ExprKind::Bool(true), Type::Bool)),
                rhs: Box::new(typed(ExprKind::Bool(false), Type::Bool)),
            },
            Type::Bool,
        );
        assert_eq!(codegen_expr(&expr, &interner), "(True and False)");
    }

    #[test]
    fn string_lexeme_is_emitted_verbatim() {
        let interner = Interner::new();
        let expr = Expr::new(
            ExprKind::Str {
                value: "a\nb".to_string(),
                lexeme: "\"a\\nb\"".to_string(),
            },
            Span::default(),
        );
        assert_eq!(codegen_expr(&expr, &interner), "\"a\\nb\"");
    }

    #[test]
    fn cast_spellings_are_identical() {
        let interner = Interner::new();
        let expr = Expr::new(
            ExprKind::Cast {
                kind: CastKind::Int,
                args: vec![Expr::new(
                    ExprKind::Str {
                        value: "42".into(),
                        lexeme: "\"42\"".into(),
                    },
                    Span::default(),
                )],
            },
            Span::default(),
        );
        assert_eq!(codegen_expr(&expr, &interner), "int(\"42\")");
    }
}
