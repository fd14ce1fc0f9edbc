use crate::ast::{
    BinaryOp, Decl, Expr, ExprKind, ImportTarget, Item, Program, Stmt, TypeExprKind,
};
use crate::lexer::Lexer;
use crate::parser::Parser;
use quasar_base::{Diagnostic, DiagnosticCode, Interner};

fn parse(source: &str) -> Program {
    let mut interner = Interner::new();
    let (tokens, diagnostics) = Lexer::new(source, &mut interner).tokenize();
    assert!(diagnostics.is_empty(), "lex errors: {:?}", diagnostics);
    Parser::new(tokens).parse_program().expect("parse failed")
}

fn parse_err(source: &str) -> Vec<Diagnostic> {
    let mut interner = Interner::new();
    let (tokens, diagnostics) = Lexer::new(source, &mut interner).tokenize();
    assert!(diagnostics.is_empty(), "lex errors: {:?}", diagnostics);
    Parser::new(tokens)
        .parse_program()
        .expect_err("expected parse errors")
}

fn only_stmt(program: &Program) -> &Stmt {
    match &program.items[..] {
        [Item::Stmt(stmt)] => stmt,
        other => panic!("expected one statement, got {:?}", other),
    }
}

fn only_expr(program: &Program) -> &Expr {
    match only_stmt(program) {
        Stmt::Expr(expr) => expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn parses_let_with_mandatory_type() {
    let program = parse("let x: int = 1 + 2");
    match &program.items[0] {
        Item::Decl(Decl::Var(decl)) => {
            assert_eq!(decl.ty.kind, TypeExprKind::Int);
            assert!(matches!(decl.init.kind, ExprKind::Binary { .. }));
        }
        other => panic!("expected a variable declaration, got {:?}", other),
    }
}

#[test]
fn let_without_type_is_an_error() {
    let diagnostics = parse_err("let x = 1");
    assert_eq!(diagnostics[0].code, DiagnosticCode::ExpectedToken);
}

#[test]
fn parses_function_declaration() {
    let program = parse("fn add(a: int, b: int) -> int { return a + b }");
    match &program.items[0] {
        Item::Decl(Decl::Fn(decl)) => {
            assert_eq!(decl.params.len(), 2);
            assert_eq!(decl.return_type.kind, TypeExprKind::Int);
            assert_eq!(decl.body.stmts.len(), 1);
        }
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn precedence_multiplication_binds_tighter() {
    let program = parse("1 + 2 * 3");
    match &only_expr(&program).kind {
        ExprKind::Binary { op, rhs, .. } => {
            assert_eq!(*op, BinaryOp::Add);
            assert!(matches!(
                rhs.kind,
                ExprKind::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn precedence_comparison_over_logical() {
    let program = parse("a < b && c > d");
    match &only_expr(&program).kind {
        ExprKind::Binary { op, lhs, rhs } => {
            assert_eq!(*op, BinaryOp::And);
            assert!(matches!(
                lhs.kind,
                ExprKind::Binary {
                    op: BinaryOp::Lt,
                    ..
                }
            ));
            assert!(matches!(
                rhs.kind,
                ExprKind::Binary {
                    op: BinaryOp::Gt,
                    ..
                }
            ));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn unary_chains_parse() {
    let program = parse("!!x");
    assert!(matches!(
        only_expr(&program).kind,
        ExprKind::Unary { .. }
    ));
}

#[test]
fn method_call_is_detected_by_lookahead() {
    let program = parse("xs.push(1)");
    assert!(matches!(
        only_expr(&program).kind,
        ExprKind::MethodCall { .. }
    ));
}

#[test]
fn member_access_without_call_is_member() {
    let program = parse("p.x");
    assert!(matches!(only_expr(&program).kind, ExprKind::Member { .. }));
}

#[test]
fn chained_member_access_nests_left() {
    let program = parse("l.start.x");
    match &only_expr(&program).kind {
        ExprKind::Member { receiver, .. } => {
            assert!(matches!(receiver.kind, ExprKind::Member { .. }));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn struct_initializer_in_expression_position() {
    let program = parse("let p: Point = Point { x: 1, y: 2 }");
    match &program.items[0] {
        Item::Decl(Decl::Var(decl)) => match &decl.init.kind {
            ExprKind::StructInit { fields, .. } => assert_eq!(fields.len(), 2),
            other => panic!("expected a struct initializer, got {:?}", other),
        },
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn empty_struct_initializer_parses() {
    let program = parse("let p: Empty = Empty {}");
    match &program.items[0] {
        Item::Decl(Decl::Var(decl)) => {
            assert!(matches!(decl.init.kind, ExprKind::StructInit { .. }));
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn condition_identifier_does_not_eat_the_body_brace() {
    // `flag { ... }` must not parse as a struct initializer here.
    let program = parse("while flag { x = 1 }");
    match only_stmt(&program) {
        Stmt::While { cond, body, .. } => {
            assert!(matches!(cond.kind, ExprKind::Ident(_)));
            assert_eq!(body.stmts.len(), 1);
        }
        other => panic!("expected a while, got {:?}", other),
    }
}

#[test]
fn for_iterable_identifier_does_not_eat_the_body_brace() {
    let program = parse("for x in xs { print(x) }");
    match only_stmt(&program) {
        Stmt::For { iterable, .. } => {
            assert!(matches!(iterable.kind, ExprKind::Ident(_)));
        }
        other => panic!("expected a for, got {:?}", other),
    }
}

#[test]
fn parenthesized_struct_initializer_allowed_in_condition() {
    let program = parse("if (Point { x: 1, y: 2 }).x > 0 { print(1) }");
    assert!(matches!(only_stmt(&program), Stmt::If { .. }));
}

#[test]
fn range_parses_only_in_for_headers() {
    let program = parse("for i in 0..10 { print(i) }");
    match only_stmt(&program) {
        Stmt::For { iterable, .. } => {
            assert!(matches!(iterable.kind, ExprKind::Range(_, _)));
        }
        other => panic!("expected a for, got {:?}", other),
    }
    // Outside a for header `..` is a syntax error.
    parse_err("let x: int = 1..5");
}

#[test]
fn dict_literal_vs_block_statement() {
    let program = parse("{ \"a\": 1, \"b\": 2 }");
    assert!(matches!(only_expr(&program).kind, ExprKind::Dict(_)));

    let program = parse("{ x = 1 }");
    assert!(matches!(only_stmt(&program), Stmt::Block(_)));
}

#[test]
fn empty_braces_are_an_empty_block() {
    let program = parse("{}");
    match only_stmt(&program) {
        Stmt::Block(block) => assert!(block.stmts.is_empty()),
        other => panic!("expected a block, got {:?}", other),
    }
}

#[test]
fn print_with_sep_and_end() {
    let program = parse("print(a, b, sep=\", \", end=\"!\")");
    match only_stmt(&program) {
        Stmt::Print(print) => {
            assert_eq!(print.args.len(), 2);
            assert!(print.sep.is_some());
            assert!(print.end.is_some());
            assert!(!print.format_mode);
        }
        other => panic!("expected a print, got {:?}", other),
    }
}

#[test]
fn print_format_mode_flag_set_by_placeholders() {
    let program = parse("print(\"x={}\", x)");
    match only_stmt(&program) {
        Stmt::Print(print) => assert!(print.format_mode),
        other => panic!("expected a print, got {:?}", other),
    }

    let program = parse("print(\"plain\", x)");
    match only_stmt(&program) {
        Stmt::Print(print) => assert!(!print.format_mode),
        other => panic!("expected a print, got {:?}", other),
    }
}

#[test]
fn duplicate_sep_is_rejected() {
    let diagnostics = parse_err("print(a, sep=\",\", sep=\";\")");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::DuplicateSep));
}

#[test]
fn duplicate_end_is_rejected() {
    let diagnostics = parse_err("print(a, end=\"!\", end=\"?\")");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::DuplicateEnd));
}

#[test]
fn truncated_input_reports_unexpected_eof() {
    // Mid-parameter-list and mid-initializer truncations both end at Eof.
    let diagnostics = parse_err("fn f(");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::UnexpectedEof));

    let diagnostics = parse_err("let x: int =");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::UnexpectedEof));
}

#[test]
fn positional_after_named_is_rejected() {
    let diagnostics = parse_err("print(a, sep=\",\", b)");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::UnexpectedToken));
}

#[test]
fn assignment_targets_are_validated() {
    parse("x = 1");
    parse("xs[0] = 1");
    parse("p.x = 1");
    let diagnostics = parse_err("f(x) = 1");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::InvalidAssignmentTarget));
}

#[test]
fn imports_parse_both_forms() {
    let program = parse("import math\nimport \"./utils.qsr\"");
    match (&program.items[0], &program.items[1]) {
        (Item::Decl(Decl::Import(a)), Item::Decl(Decl::Import(b))) => {
            assert!(matches!(a.target, ImportTarget::Python(_)));
            assert!(matches!(b.target, ImportTarget::Local(ref path) if path == "./utils.qsr"));
        }
        other => panic!("expected two imports, got {:?}", other),
    }
}

#[test]
fn nested_type_annotations_parse() {
    let program = parse("let grid: Dict[str, [int]] = {}");
    match &program.items[0] {
        Item::Decl(Decl::Var(decl)) => match &decl.ty.kind {
            TypeExprKind::Dict(key, value) => {
                assert_eq!(key.kind, TypeExprKind::Str);
                assert!(matches!(value.kind, TypeExprKind::List(_)));
            }
            other => panic!("expected a dict annotation, got {:?}", other),
        },
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn cast_keywords_parse_as_calls() {
    let program = parse("int(\"42\")");
    assert!(matches!(only_expr(&program).kind, ExprKind::Cast { .. }));
}

#[test]
fn nested_function_declarations_are_rejected() {
    let diagnostics = parse_err("fn outer() -> int { fn inner() -> int { return 1 } return 1 }");
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::UnexpectedToken));
}

#[test]
fn recovery_reports_multiple_errors() {
    let diagnostics = parse_err("let : int = 1\nlet y int = 2");
    assert!(diagnostics.len() >= 2, "got {:?}", diagnostics);
}

#[test]
fn else_branch_parses() {
    let program = parse("if x { print(1) } else { print(2) }");
    match only_stmt(&program) {
        Stmt::If { else_block, .. } => assert!(else_block.is_some()),
        other => panic!("expected an if, got {:?}", other),
    }
}

#[test]
fn spans_cover_whole_constructs() {
    let program = parse("let total: int = 1 + 2");
    let span = match &program.items[0] {
        Item::Decl(decl) => decl.span(),
        other => panic!("expected a declaration, got {:?}", other),
    };
    assert_eq!(span.start_col, 1);
    assert_eq!(span.end_col, 23);
}
