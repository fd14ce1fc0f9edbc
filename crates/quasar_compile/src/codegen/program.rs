//! Whole-program emission: preamble, then the items in source order.
//!
//! The preamble is derived from what the program actually uses:
//! `dataclass` when any struct is declared, `Enum` when any enum is, and
//! one `import` line per import declaration — local `"./utils.qsr"`
//! imports emit `import utils`, the module the compiler wrote alongside
//! the output.

use super::stmt::{codegen_block, codegen_stmt};
use crate::analysis::imports::module_name_of;
use quasar_base::Interner;
use quasar_syntax::ast::{
    Decl, EnumDecl, FnDecl, ImportTarget, Item, Program, StructDecl, TypeExpr, TypeExprKind,
};

pub fn codegen_program(program: &Program, interner: &Interner) -> String {
    let mut out = String::new();

    let has_structs = program
        .items
        .iter()
        .any(|item| matches!(item, Item::Decl(Decl::Struct(_))));
    let has_enums = program
        .items
        .iter()
        .any(|item| matches!(item, Item::Decl(Decl::Enum(_))));

    if has_structs {
        out.push_str("from dataclasses import dataclass\n");
    }
    if has_enums {
        out.push_str("from enum import Enum\n");
    }
    for item in &program.items {
        if let Item::Decl(Decl::Import(import)) = item {
            match &import.target {
                ImportTarget::Python(name) => {
                    out.push_str(&format!("import {}\n", interner.resolve(*name)));
                }
                ImportTarget::Local(path) => {
                    out.push_str(&format!("import {}\n", module_name_of(path)));
                }
            }
        }
    }
    if !out.is_empty() {
        out.push('\n');
    }

    for item in &program.items {
        match item {
            Item::Decl(Decl::Struct(decl)) => {
                out.push_str(&codegen_struct(decl, interner));
                out.push('\n');
            }
            Item::Decl(Decl::Enum(decl)) => {
                out.push_str(&codegen_enum(decl, interner));
                out.push('\n');
            }
            Item::Decl(Decl::Fn(decl)) => {
                out.push_str(&codegen_fn(decl, interner));
                out.push('\n');
            }
            // Hoisted into the preamble.
            Item::Decl(Decl::Import(_)) => {}
            Item::Decl(Decl::Var(decl)) | Item::Decl(Decl::Const(decl)) => {
                out.push_str(&format!(
                    "{} = {}\n",
                    interner.resolve(decl.name),
                    super::expr::codegen_expr(&decl.init, interner)
                ));
            }
            Item::Stmt(stmt) => out.push_str(&codegen_stmt(stmt, interner, 0)),
        }
    }

    out
}

fn codegen_struct(decl: &StructDecl, interner: &Interner) -> String {
    let mut out = String::from("@dataclass\n");
    out.push_str(&format!("class {}:\n", interner.resolve(decl.name)));
    if decl.fields.is_empty() {
        out.push_str("    pass\n");
        return out;
    }
    for (field, annotation) in &decl.fields {
        out.push_str(&format!(
            "    {}: {}\n",
            interner.resolve(*field),
            python_annotation(annotation, interner)
        ));
    }
    out
}

fn codegen_enum(decl: &EnumDecl, interner: &Interner) -> String {
    let mut out = format!("class {}(Enum):\n", interner.resolve(decl.name));
    if decl.variants.is_empty() {
        out.push_str("    pass\n");
        return out;
    }
    for variant in &decl.variants {
        let name = interner.resolve(*variant);
        out.push_str(&format!("    {} = \"{}\"\n", name, name));
    }
    out
}

fn codegen_fn(decl: &FnDecl, interner: &Interner) -> String {
    let params: Vec<&str> = decl
        .params
        .iter()
        .map(|param| interner.resolve(param.name))
        .collect();
    let mut out = format!(
        "def {}({}):\n",
        interner.resolve(decl.name),
        params.join(", ")
    );
    out.push_str(&codegen_block(&decl.body, interner, 1));
    out
}

/// Python spelling of a type annotation, for dataclass fields. User types
/// emit their bare name.
fn python_annotation(annotation: &TypeExpr, interner: &Interner) -> String {
    match &annotation.kind {
        TypeExprKind::Int => "int".to_string(),
        TypeExprKind::Float => "float".to_string(),
        TypeExprKind::Bool => "bool".to_string(),
        TypeExprKind::Str => "str".to_string(),
        TypeExprKind::List(elem) => format!("list[{}]", python_annotation(elem, interner)),
        TypeExprKind::Dict(key, value) => format!(
            "dict[{}, {}]",
            python_annotation(key, interner),
            python_annotation(value, interner)
        ),
        TypeExprKind::Named(name) => interner.resolve(*name).to_string(),
    }
}
