use super::*;
use crate::options::TransformOptions;
use crate::source::SourceText;
use swc_core::ecma::ast::{Decl, Program, Stmt};

fn squash(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

struct Fixture {
    text: SourceText,
    program: Program,
    templates: Templates,
    names: NameGenerator,
    helpers: RuntimeHelperInjector,
    instrumenter: FunctionInstrumenter,
}

impl Fixture {
    fn new(source: &str) -> Self {
        let text = SourceText::new("instrument.js", source);
        let program = text.parse(&TransformOptions::default()).expect("parse");
        let names = NameGenerator::from_program(&program);
        Fixture {
            text,
            program,
            templates: Templates::build().expect("templates"),
            names,
            helpers: RuntimeHelperInjector::new(),
            instrumenter: FunctionInstrumenter::new(),
        }
    }

    /// Instrument the top-level function declaration at `index`.
    fn instrument(&mut self, index: usize) -> Result<Ident, TemplateError> {
        let Program::Script(script) = &mut self.program else {
            panic!("expected script");
        };
        let Some(Stmt::Decl(Decl::Fn(decl))) = script.body.get_mut(index) else {
            panic!("expected function declaration at {index}");
        };
        self.instrumenter.init_for_func(
            FunctionNode::Function(&mut decl.function),
            &self.templates,
            &mut self.names,
            &mut self.helpers,
        )
    }

    fn printed(&self) -> String {
        squash(&self.text.print(&self.program).expect("print"))
    }
}

fn expected(source: &str) -> String {
    let text = SourceText::new("expected.js", source);
    let program = text.parse(&TransformOptions::default()).expect("parse");
    squash(&text.print(&program).expect("print"))
}

#[test]
fn test_queue_is_declared_and_returns_rewritten() {
    let mut fx = Fixture::new("function f(x) { if (x) { return 1; } return 2; }");
    let queue = fx.instrument(0).expect("instrument");

    assert_eq!(&*queue.sym, "_renderhook_operations");
    assert_eq!(
        fx.printed(),
        expected(
            "function f(x) {
                const _renderhook_operations = [];
                if (x) { return _perform_ops(_renderhook_operations, 1); }
                return _perform_ops(_renderhook_operations, 2);
            }"
        )
    );
    assert_eq!(fx.instrumenter.rewritten_returns(), 2);
    assert_eq!(fx.instrumenter.instrumented_count(), 1);
}

#[test]
fn test_second_call_is_a_no_op() {
    let mut fx = Fixture::new("function f() { return 1; }");
    let first = fx.instrument(0).expect("instrument");
    let once = fx.printed();
    let second = fx.instrument(0).expect("instrument");

    assert_eq!(first.sym, second.sym);
    assert_eq!(fx.printed(), once);
    assert_eq!(fx.instrumenter.rewritten_returns(), 1);
}

#[test]
fn test_nested_functions_and_classes_are_untouched() {
    let mut fx = Fixture::new(
        "function f() {
            function g() { return 1; }
            const h = () => 2;
            const k = function () { return 3; };
            class C { m() { return 4; } }
            return g;
        }",
    );
    fx.instrument(0).expect("instrument");

    assert_eq!(
        fx.printed(),
        expected(
            "function f() {
                const _renderhook_operations = [];
                function g() { return 1; }
                const h = () => 2;
                const k = function () { return 3; };
                class C { m() { return 4; } }
                return _perform_ops(_renderhook_operations, g);
            }"
        )
    );
}

#[test]
fn test_valueless_return_folds_undefined() {
    let mut fx = Fixture::new("function f() { return; }");
    fx.instrument(0).expect("instrument");

    assert_eq!(
        fx.printed(),
        expected(
            "function f() {
                const _renderhook_operations = [];
                return _perform_ops(_renderhook_operations, void 0);
            }"
        )
    );
}

#[test]
fn test_function_without_returns_needs_no_helpers() {
    let mut fx = Fixture::new("function f() { g(); }");
    fx.instrument(0).expect("instrument");

    assert!(fx.helpers.idents().is_none());
    assert_eq!(
        fx.printed(),
        expected("function f() { const _renderhook_operations = []; g(); }")
    );
}

#[test]
fn test_queue_follows_function_directives() {
    let mut fx = Fixture::new("function f() { 'use strict'; return 1; }");
    fx.instrument(0).expect("instrument");

    assert!(fx
        .printed()
        .starts_with("functionf(){'usestrict';const_renderhook_operations=[];"));
}

#[test]
fn test_sibling_functions_get_distinct_queues() {
    let mut fx = Fixture::new("function f() { return 1; }\nfunction g() { return 2; }");
    let f = fx.instrument(0).expect("instrument f");
    let g = fx.instrument(1).expect("instrument g");

    assert_eq!(&*f.sym, "_renderhook_operations");
    assert_eq!(&*g.sym, "_renderhook_operations2");
    assert_eq!(fx.instrumenter.instrumented_count(), 2);

    let helpers = fx.helpers.idents().expect("helpers requested");
    assert_eq!(&*helpers.perform_ops.sym, "_perform_ops");
}

#[test]
fn test_expression_bodied_arrow_becomes_a_block() {
    let text = SourceText::new("arrow.js", "const f = (x) => x + 1;");
    let mut program = text.parse(&TransformOptions::default()).expect("parse");
    let templates = Templates::build().expect("templates");
    let mut names = NameGenerator::from_program(&program);
    let mut helpers = RuntimeHelperInjector::new();
    let mut instrumenter = FunctionInstrumenter::new();

    let Program::Script(script) = &mut program else {
        panic!("expected script");
    };
    let Some(Stmt::Decl(Decl::Var(var))) = script.body.first_mut() else {
        panic!("expected variable declaration");
    };
    let Some(Expr::Arrow(arrow)) = var.decls[0].init.as_deref_mut() else {
        panic!("expected arrow");
    };
    instrumenter
        .init_for_func(
            FunctionNode::Arrow(arrow),
            &templates,
            &mut names,
            &mut helpers,
        )
        .expect("instrument");

    assert_eq!(
        squash(&text.print(&program).expect("print")),
        expected(
            "const f = (x) => {
                const _renderhook_operations = [];
                return _perform_ops(_renderhook_operations, x + 1);
            };"
        )
    );
}
