use super::*;
use crate::options::{DEFAULT_MACRO_SOURCE, TransformOptions};
use crate::resolve_bindings;
use crate::source::SourceText;

fn parse(source: &str) -> (SourceText, Program) {
    let text = SourceText::new("refs.js", source);
    let mut program = text.parse(&TransformOptions::default()).expect("parse");
    resolve_bindings(&mut program);
    (text, program)
}

fn references(source: &str) -> (SourceText, Vec<MarkerReference>) {
    let (text, program) = parse(source);
    let imports = find_macro_imports(&program, DEFAULT_MACRO_SOURCE);
    let markers = MarkerSet::from_imports(&imports);
    let found = collect_references(&program, &markers);
    (text, found)
}

fn usages(source: &str) -> Vec<MarkerUsage> {
    references(source).1.into_iter().map(|r| r.usage).collect()
}

#[test]
fn test_default_import_is_found() {
    let (_, program) = parse("import renderhook from 'renderhook/macro';\nimport other from 'other';");
    let imports = find_macro_imports(&program, DEFAULT_MACRO_SOURCE);

    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].locals.len(), 1);
    assert_eq!(&*imports[0].locals[0].0, "renderhook");
}

#[test]
fn test_named_default_and_require_are_found() {
    let (_, program) = parse("import { default as hook } from 'renderhook/macro';");
    let imports = find_macro_imports(&program, DEFAULT_MACRO_SOURCE);
    assert_eq!(&*imports[0].locals[0].0, "hook");

    let (_, program) = parse("const hook = require('renderhook/macro');");
    let imports = find_macro_imports(&program, DEFAULT_MACRO_SOURCE);
    assert_eq!(imports.len(), 1);
    assert_eq!(&*imports[0].locals[0].0, "hook");
}

#[test]
fn test_other_requires_are_ignored() {
    let (_, program) = parse("const a = require('a'), b = require('renderhook/macro');\nconst c = load('renderhook/macro');");
    assert!(find_macro_imports(&program, DEFAULT_MACRO_SOURCE).is_empty());
}

#[test]
fn test_custom_macro_source() {
    let (_, program) = parse("import hook from './my-macro';");
    assert!(find_macro_imports(&program, DEFAULT_MACRO_SOURCE).is_empty());
    assert_eq!(find_macro_imports(&program, "./my-macro").len(), 1);
}

#[test]
fn test_call_usages_are_classified() {
    let found = usages(
        "import rh from 'renderhook/macro';
        function f() {
            rh(a);
            rh();
            rh(a, b);
            rh(...args);
            (rh)(a);
        }",
    );
    assert_eq!(
        found,
        [
            MarkerUsage::Call { args: 1, spread: false },
            MarkerUsage::Call { args: 0, spread: false },
            MarkerUsage::Call { args: 2, spread: false },
            MarkerUsage::Call { args: 1, spread: true },
            MarkerUsage::Call { args: 1, spread: false },
        ]
    );
}

#[test]
fn test_other_usages_are_classified() {
    let found = usages(
        "import rh from 'renderhook/macro';
        function f() {
            const alias = rh;
            new rh(a);
            rh`tpl`;
            g(rh);
        }",
    );
    assert_eq!(
        found,
        [
            MarkerUsage::Bare,
            MarkerUsage::New,
            MarkerUsage::TaggedTemplate,
            MarkerUsage::Bare,
        ]
    );
}

#[test]
fn test_nested_marker_calls_are_both_found() {
    let found = usages("import rh from 'renderhook/macro';\nfunction f() { rh(rh(a)); }");
    assert_eq!(found.len(), 2);
}

#[test]
fn test_shadowed_bindings_are_not_markers() {
    let found = usages(
        "import rh from 'renderhook/macro';
        function f(rh) { return rh(a); }
        function g() { const rh = x; rh(b); }
        function h() { return obj.rh(c); }",
    );
    assert!(found.is_empty(), "unexpected references: {found:?}");
}

const NESTED: &str = "import rh from 'renderhook/macro';
function outer() {
    rh(a);
    const inner = () => rh(b);
}
rh(c);";

#[test]
fn test_enclosing_function_is_innermost() {
    let (text, found) = references(NESTED);
    assert_eq!(found.len(), 3);
    assert!(found[0].enclosing.is_some());
    assert!(found[1].enclosing.is_some());
    assert_ne!(found[0].enclosing, found[1].enclosing);
    assert_eq!(found[2].enclosing, None);

    let (start, length) = text.relative_range(found[2].span);
    assert_eq!(&NESTED[start as usize..(start + length) as usize], "rh(c)");
}

#[test]
fn test_signature_references_are_scoped_outside_the_body() {
    let (_, found) = references(
        "import rh from 'renderhook/macro';
        function outer() {
            const o = { get [rh(a)]() { return rh(b); } };
            function g(x = rh(c)) {}
        }",
    );
    assert_eq!(found.len(), 3);
    let getter_key = found[0];
    let getter_body = found[1];
    let parameter = found[2];

    assert!(getter_key.enclosing.is_some());
    assert!(getter_body.enclosing.is_some());
    assert_ne!(getter_key.enclosing, getter_body.enclosing);
    assert!(!getter_key.in_parameters);

    assert!(parameter.in_parameters);
    assert!(matches!(
        parameter.validate(DEFAULT_MACRO_SOURCE),
        Err(TransformError::InParameterList { .. })
    ));
}

#[test]
fn test_validate_reports_usage_then_location() {
    let (_, found) = references(
        "import rh from 'renderhook/macro';
        rh(a);
        function f() { new rh(b); rh(c); }",
    );

    let top_level = found[0].validate(DEFAULT_MACRO_SOURCE).expect_err("no function");
    assert!(matches!(top_level, TransformError::NoEnclosingFunction { .. }));

    let new_call = found[1].validate(DEFAULT_MACRO_SOURCE).expect_err("new");
    assert!(matches!(
        new_call,
        TransformError::InvalidUsage { usage: MarkerUsage::New, .. }
    ));
    assert!(new_call
        .to_string()
        .starts_with("renderhook/macro must be invoked as a normal function call"));

    assert!(found[2].validate(DEFAULT_MACRO_SOURCE).is_ok());
}

#[test]
fn test_remove_macro_imports() {
    let (text, mut program) = parse(
        "'use strict';
        const rh = require('renderhook/macro');
        const other = require('other');
        other();",
    );
    assert_eq!(remove_macro_imports(&mut program, DEFAULT_MACRO_SOURCE), 1);

    let printed: String = text
        .print(&program)
        .expect("print")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    assert_eq!(printed, "'usestrict';constother=require('other');other();");
}
