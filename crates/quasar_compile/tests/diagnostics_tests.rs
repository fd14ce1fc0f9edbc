//! One test per diagnostic family: each feeds the pipeline a small
//! program that violates exactly one rule and asserts the stable code.

use quasar_compile::compile::{compile_source, MapResolver};
use std::path::Path;

fn codes(source: &str) -> Vec<String> {
    match compile_source(source, Path::new("."), &MapResolver::new()) {
        Ok(_) => Vec::new(),
        Err(diags) => diags.iter().map(|d| d.code.as_str().to_string()).collect(),
    }
}

fn assert_code(source: &str, expected: &str) {
    let found = codes(source);
    assert!(
        found.iter().any(|code| code == expected),
        "expected {} in {:?} for:\n{}",
        expected,
        found,
        source
    );
}

fn assert_only(source: &str, expected: &str) {
    let found = codes(source);
    assert_eq!(found, vec![expected.to_string()], "for:\n{}", source);
}

// ── Scope and identifiers ───────────────────────────────────────────────

#[test]
fn undefined_name_is_e0001() {
    assert_only("print(x)", "E0001");
}

#[test]
fn duplicate_declaration_is_e0002() {
    assert_only("let x: int = 1\nlet x: int = 2", "E0002");
}

#[test]
fn unknown_function_is_e0003() {
    assert_only("foo(1)", "E0003");
}

#[test]
fn const_rebinding_is_e0004() {
    assert_only("const X: int = 1\nX = 2", "E0004");
}

#[test]
fn assigning_to_undeclared_is_e0005() {
    assert_only("y = 1", "E0005");
}

// ── Types ───────────────────────────────────────────────────────────────

#[test]
fn initializer_mismatch_is_e0100() {
    assert_only("let x: int = \"nope\"", "E0100");
}

#[test]
fn non_bool_condition_is_e0101() {
    assert_only("if 1 { print(1) }", "E0101");
}

#[test]
fn mixed_arithmetic_is_e0102() {
    assert_only("let x: int = 1 + 2.0", "E0102");
}

#[test]
fn string_ordering_is_e0103() {
    assert_only("let b: bool = \"a\" < \"b\"", "E0103");
}

#[test]
fn non_bool_logical_operand_is_e0104() {
    assert_only("let b: bool = 1 && true", "E0104");
}

#[test]
fn cross_type_equality_is_e0105() {
    assert_only("let b: bool = 1 == \"a\"", "E0105");
}

#[test]
fn negating_a_string_is_e0106() {
    assert_only("let x: int = -\"a\"", "E0106");
}

#[test]
fn call_arity_mismatch_is_e0107() {
    assert_only(
        "fn f(a: int) -> int { return a }\nlet x: int = f(1, 2)",
        "E0107",
    );
}

#[test]
fn call_argument_type_mismatch_is_e0108() {
    assert_only(
        "fn f(a: int) -> int { return a }\nlet x: int = f(\"a\")",
        "E0108",
    );
}

#[test]
fn return_value_mismatch_is_e0109() {
    assert_only("fn f(a: int) -> int { return \"a\" }", "E0109");
}

#[test]
fn indexing_an_int_is_e0110() {
    assert_only("let x: int = 5\nprint(x[0])", "E0110");
}

// ── Control flow ────────────────────────────────────────────────────────

#[test]
fn break_outside_loop_is_e0200() {
    assert_only("break", "E0200");
}

#[test]
fn continue_outside_loop_is_e0201() {
    assert_only("continue", "E0201");
}

#[test]
fn reassigning_the_loop_variable_is_e0202() {
    assert_only("for i in 0..3 { i = 5 }", "E0202");
}

#[test]
fn shadowing_a_builtin_is_e0203() {
    assert_code("fn len(x: int) -> int { return x }", "E0203");
    assert_code("let push: int = 1", "E0203");
}

// ── Return paths ────────────────────────────────────────────────────────

#[test]
fn missing_return_path_is_e0303() {
    assert_only("fn f(x: int) -> int { while x > 0 { return 1 } }", "E0303");
}

#[test]
fn return_at_top_level_is_e0304() {
    assert_only("return 1", "E0304");
}

// ── Print ───────────────────────────────────────────────────────────────

#[test]
fn printing_a_list_is_e0401() {
    assert_only("let xs: [int] = [1]\nprint(xs)", "E0401");
}

#[test]
fn non_string_sep_is_e0402() {
    assert_only("print(1, sep=2)", "E0402");
}

#[test]
fn non_string_end_is_e0403() {
    assert_only("print(1, end=2)", "E0403");
}

#[test]
fn empty_print_is_e0406() {
    assert_only("print()", "E0406");
}

#[test]
fn too_few_format_arguments_is_e0410() {
    assert_only("print(\"{} and {}\", 1)", "E0410");
}

#[test]
fn too_many_format_arguments_is_e0411() {
    assert_only("print(\"{}\", 1, 2)", "E0411");
}

// ── Lists and ranges ────────────────────────────────────────────────────

#[test]
fn heterogeneous_list_is_e0500() {
    assert_only("let xs: [int] = [1, \"a\"]", "E0500");
}

#[test]
fn non_int_list_index_is_e0501() {
    assert_only("let xs: [int] = [1]\nlet y: int = xs[\"a\"]", "E0501");
}

#[test]
fn untyped_empty_list_is_e0502() {
    assert_only("let n: int = len([])", "E0502");
}

#[test]
fn float_range_endpoint_is_e0503() {
    assert_only("for i in 0..2.5 { print(i) }", "E0503");
}

#[test]
fn iterating_an_int_is_e0505() {
    assert_only("for x in 5 { print(x) }", "E0505");
}

// ── Input and casts ─────────────────────────────────────────────────────

#[test]
fn non_string_prompt_is_e0600() {
    assert_only("let s: str = input(5)", "E0600");
}

#[test]
fn input_with_two_arguments_is_e0601() {
    assert_only("let s: str = input(\"a\", \"b\")", "E0601");
}

#[test]
fn cast_with_two_arguments_is_e0602() {
    assert_only("let x: int = int(1, 2)", "E0602");
}

// ── Structs ─────────────────────────────────────────────────────────────

#[test]
fn unknown_struct_in_initializer_is_e0800() {
    assert_code("let p: Foo = Foo { x: 1 }", "E0800");
}

#[test]
fn missing_field_is_e0801() {
    assert_only(
        "struct P { x: int, y: int }\nlet p: P = P { x: 1 }",
        "E0801",
    );
}

#[test]
fn unknown_field_in_initializer_is_e0802() {
    assert_only(
        "struct P { x: int }\nlet p: P = P { x: 1, z: 2 }",
        "E0802",
    );
}

#[test]
fn field_value_mismatch_is_e0803() {
    assert_only(
        "struct P { x: int }\nlet p: P = P { x: \"a\" }",
        "E0803",
    );
}

#[test]
fn unknown_field_access_is_e0804() {
    assert_only(
        "struct P { x: int }\nlet p: P = P { x: 1 }\nprint(p.z)",
        "E0804",
    );
}

#[test]
fn member_access_on_int_is_e0805() {
    assert_only("let x: int = 5\nprint(x.y)", "E0805");
}

#[test]
fn duplicate_field_declaration_is_e0806() {
    assert_code("struct P { x: int, x: int }", "E0806");
}

#[test]
fn duplicate_field_in_initializer_is_e0807() {
    assert_only(
        "struct P { x: int }\nlet p: P = P { x: 1, x: 2 }",
        "E0807",
    );
}

// ── Dicts ───────────────────────────────────────────────────────────────

#[test]
fn mixed_dict_keys_are_e1000() {
    assert_only("let d: Dict[str, int] = {\"a\": 1, 2: 3}", "E1000");
}

#[test]
fn mixed_dict_values_are_e1001() {
    assert_only("let d: Dict[str, int] = {\"a\": 1, \"b\": \"c\"}", "E1001");
}

#[test]
fn float_dict_key_annotation_is_e1002() {
    assert_only("let d: Dict[float, int] = {}", "E1002");
}

#[test]
fn float_dict_key_literal_is_e1002() {
    assert_code("let d: Dict[str, int] = {1.5: 1}", "E1002");
}

#[test]
fn wrong_dict_key_type_on_index_is_e1003() {
    assert_only(
        "let d: Dict[str, int] = {\"a\": 1}\nlet x: int = d[5]",
        "E1003",
    );
}

// ── Primitive methods ───────────────────────────────────────────────────

#[test]
fn generic_parameter_mismatch_is_e1100() {
    assert_only("let xs: [int] = [1]\nxs.push(\"a\")", "E1100");
}

#[test]
fn method_on_int_is_e1101() {
    assert_only("let x: int = 5\nx.foo()", "E1101");
}

#[test]
fn join_on_int_list_is_e1102() {
    assert_only(
        "let xs: [int] = [1]\nlet s: str = xs.join(\",\")",
        "E1102",
    );
}

#[test]
fn unknown_method_is_e1105() {
    assert_only("let s: str = \"a\"\ns.shout()", "E1105");
}

#[test]
fn method_arity_mismatch_is_e1106() {
    assert_only("let s: str = \"ab\".replace(\"a\")", "E1106");
}

#[test]
fn method_argument_type_mismatch_is_e1107() {
    assert_only("let parts: [str] = \"a,b\".split(1)", "E1107");
}

// ── Enums ───────────────────────────────────────────────────────────────

#[test]
fn type_name_conflict_is_e1200() {
    assert_code("enum A { X }\nstruct A { y: int }", "E1200");
    assert_code("enum A { X }\nenum A { Y }", "E1200");
}

#[test]
fn duplicate_variant_is_e1201() {
    assert_code("enum A { X, X }", "E1201");
}

#[test]
fn unknown_variant_is_e1202() {
    assert_only("enum A { X }\nlet a: A = A.Y", "E1202");
}

#[test]
fn unknown_type_annotation_is_e1203() {
    assert_only("let x: Foo = 1", "E1203");
}

#[test]
fn comparing_different_enums_is_e1204() {
    assert_only(
        "enum A { X }\nenum B { Y }\nlet ok: bool = A.X == B.Y",
        "E1204",
    );
}

#[test]
fn ordering_enums_is_e1205() {
    assert_only("enum A { X }\nlet ok: bool = A.X < A.X", "E1205");
}

// ── Error batching ──────────────────────────────────────────────────────

#[test]
fn independent_errors_are_all_reported() {
    let found = codes("let x: int = 3.14\nlet y: str = 5\nbreak");
    assert_eq!(
        found,
        vec!["E0100".to_string(), "E0100".to_string(), "E0200".to_string()]
    );
}

#[test]
fn analysis_continues_past_a_bad_function() {
    let found = codes(
        "fn bad(x: int) -> int { return \"a\" }\nfn also_bad() -> int { if true { return 1 } }",
    );
    assert!(found.contains(&"E0109".to_string()));
    assert!(found.contains(&"E0303".to_string()));
}
