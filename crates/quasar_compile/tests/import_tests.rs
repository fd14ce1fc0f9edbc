//! Module import behavior: opaque Python modules, recursively compiled
//! local files, duplicate and missing imports, cycles, and the multi-file
//! output of `compile_file`.

use quasar_compile::compile::{compile_file, compile_source, MapResolver};
use std::path::Path;

fn resolver(files: &[(&str, &str)]) -> MapResolver {
    let mut resolver = MapResolver::new();
    for (name, source) in files {
        resolver.insert(Path::new(".").join(name), *source);
    }
    resolver
}

fn codes(source: &str, files: &[(&str, &str)]) -> Vec<String> {
    match compile_source(source, Path::new("."), &resolver(files)) {
        Ok(output) => output
            .warnings
            .iter()
            .map(|d| d.code.as_str().to_string())
            .collect(),
        Err(diags) => diags.iter().map(|d| d.code.as_str().to_string()).collect(),
    }
}

#[test]
fn python_imports_are_opaque() {
    let source = "\
import math
let x: float = math.sqrt(2.0)
let y: int = math.floor(x)
print(y)
";
    let output = compile_source(source, Path::new("."), &MapResolver::new()).unwrap();
    assert_eq!(
        output.python,
        "import math\n\nx = math.sqrt(2.0)\ny = math.floor(x)\nprint(y)\n"
    );
}

#[test]
fn duplicate_python_import_is_e0900() {
    assert_eq!(codes("import math\nimport math", &[]), vec!["E0900"]);
}

#[test]
fn local_import_compiles_and_type_checks() {
    let files = [(
        "utils.qsr",
        "fn triple(x: int) -> int { return x * 3 }",
    )];
    let source = "import \"./utils.qsr\"\nprint(utils.triple(2))\n";
    let output = compile_source(source, Path::new("."), &resolver(&files)).unwrap();

    assert_eq!(output.python, "import utils\n\nprint(utils.triple(2))\n");
    assert_eq!(output.modules.len(), 1);
    assert_eq!(output.modules[0].0, "utils");
    assert_eq!(
        output.modules[0].1,
        "def triple(x):\n    return (x * 3)\n\n"
    );
}

#[test]
fn local_module_signatures_are_enforced() {
    let files = [(
        "utils.qsr",
        "fn triple(x: int) -> int { return x * 3 }",
    )];
    assert_eq!(
        codes("import \"./utils.qsr\"\nprint(utils.triple(\"a\"))", &files),
        vec!["E0108"]
    );
    assert_eq!(
        codes("import \"./utils.qsr\"\nprint(utils.quadruple(2))", &files),
        vec!["E0001"]
    );
}

#[test]
fn structs_flow_out_of_local_modules() {
    let files = [(
        "geometry.qsr",
        "struct Point { x: int, y: int }\nfn origin() -> Point { return Point { x: 0, y: 0 } }",
    )];
    let source = "\
import \"./geometry.qsr\"
let p: Point = geometry.origin()
p.x = 9
print(p.x)
";
    let output = compile_source(source, Path::new("."), &resolver(&files)).unwrap();
    assert_eq!(
        output.python,
        "import geometry\n\np = geometry.origin()\np.x = 9\nprint(p.x)\n"
    );
}

#[test]
fn enum_variants_resolve_through_local_modules() {
    let files = [(
        "colors.qsr",
        "enum Color { Red, Green }\nfn best() -> Color { return Color.Red }",
    )];
    let source = "\
import \"./colors.qsr\"
let c: Color = colors.best()
let ok: bool = c == colors.Color.Red
print(ok)
";
    let output = compile_source(source, Path::new("."), &resolver(&files)).unwrap();
    assert!(output.python.contains("ok = (c == colors.Color.Red)"));
}

#[test]
fn missing_local_import_is_e0901() {
    assert_eq!(codes("import \"./absent.qsr\"", &[]), vec!["E0901"]);
}

#[test]
fn duplicate_local_import_is_e0900() {
    let files = [("utils.qsr", "fn id(x: int) -> int { return x }")];
    assert_eq!(
        codes("import \"./utils.qsr\"\nimport \"./utils.qsr\"", &files),
        vec!["E0900"]
    );
}

#[test]
fn import_cycles_warn_and_compile() {
    let files = [
        (
            "a.qsr",
            "import \"./b.qsr\"\nfn from_a(x: int) -> int { return x + 1 }",
        ),
        (
            "b.qsr",
            "import \"./a.qsr\"\nfn from_b(x: int) -> int { return x + 2 }",
        ),
    ];
    let source = "import \"./a.qsr\"\nprint(a.from_a(1))\n";
    let output = compile_source(source, Path::new("."), &resolver(&files)).unwrap();

    // The cycle is reported as a warning, not an error.
    assert!(output
        .warnings
        .iter()
        .any(|d| d.code.as_str() == "E0902"));
    // Both modules still compile and emit.
    let names: Vec<&str> = output.modules.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"a"));
    assert!(names.contains(&"b"));
}

#[test]
fn cycle_partial_exports_satisfy_the_importer() {
    // `b` calls back into `a` while `a` is still on the analysis stack;
    // the pre-registered signature satisfies the call.
    let files = [
        (
            "a.qsr",
            "import \"./b.qsr\"\nfn from_a(x: int) -> int { return x + 1 }",
        ),
        (
            "b.qsr",
            "import \"./a.qsr\"\nfn use_a(x: int) -> int { return a.from_a(x) }",
        ),
    ];
    let source = "import \"./a.qsr\"\nprint(a.from_a(0))\n";
    let output = compile_source(source, Path::new("."), &resolver(&files)).unwrap();
    assert!(output.warnings.iter().any(|d| d.code.as_str() == "E0902"));
}

#[test]
fn broken_imported_file_is_e0903_plus_its_own_errors() {
    let files = [("bad.qsr", "let x: int = \"oops\"")];
    let found = codes("import \"./bad.qsr\"", &files);
    assert!(found.contains(&"E0100".to_string()), "{:?}", found);
    assert!(found.contains(&"E0903".to_string()), "{:?}", found);
}

#[test]
fn diagnostics_from_imports_carry_their_own_file() {
    let files = [("bad.qsr", "let x: int = \"oops\"")];
    let diags = compile_source(
        "import \"./bad.qsr\"",
        Path::new("."),
        &resolver(&files),
    )
    .unwrap_err();
    let mismatch = diags
        .iter()
        .find(|d| d.code.as_str() == "E0100")
        .expect("the module's own error is surfaced");
    let file = mismatch.span.file.as_deref().unwrap_or("");
    assert!(file.contains("bad.qsr"), "span file was `{}`", file);
}

#[test]
fn transitive_imports_resolve_relative_to_the_importer() {
    let files = [
        ("lib.qsr", "import \"./deep.qsr\"\nfn two(x: int) -> int { return deep.one(x) + 1 }"),
        ("deep.qsr", "fn one(x: int) -> int { return x }"),
    ];
    let source = "import \"./lib.qsr\"\nprint(lib.two(5))\n";
    let output = compile_source(source, Path::new("."), &resolver(&files)).unwrap();
    // Dependencies precede their importers.
    let names: Vec<&str> = output.modules.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["deep", "lib"]);
}

#[test]
fn compile_file_writes_through_the_filesystem_resolver() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("util.qsr"),
        "fn double(x: int) -> int { return x * 2 }",
    )
    .unwrap();
    let main = dir.path().join("main.qsr");
    std::fs::write(&main, "import \"./util.qsr\"\nprint(util.double(4))\n").unwrap();

    let output = compile_file(&main).unwrap();
    assert_eq!(output.python, "import util\n\nprint(util.double(4))\n");
    assert_eq!(output.modules.len(), 1);
    assert_eq!(output.modules[0].0, "util");
}

#[test]
fn compile_reports_an_unreadable_root_file() {
    let diags = quasar_compile::compile(Path::new("/definitely/not/here.qsr")).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.as_str(), "E0901");
}
