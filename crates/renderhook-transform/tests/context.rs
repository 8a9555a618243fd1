use super::*;
use crate::options::TransformOptions;
use crate::source::SourceText;
use swc_core::common::{DUMMY_SP, SyntaxContext};
use swc_core::ecma::ast::{Decl, Stmt};

fn parse(source: &str) -> (SourceText, Program) {
    let text = SourceText::new("context.js", source);
    let program = text.parse(&TransformOptions::default()).expect("parse");
    (text, program)
}

#[test]
fn test_templates_are_built_lazily() {
    let (_, program) = parse("f();");
    let ctx = TransformContext::new(&program);
    assert!(!ctx.templates_built());

    ctx.get_templates().expect("templates");
    assert!(ctx.templates_built());
}

#[test]
fn test_generated_names_avoid_file_identifiers() {
    let (_, program) = parse("var _handle_hook, _perform_ops;");
    let mut ctx = TransformContext::new(&program);
    let idents = ctx.get_impl_idents().expect("idents");

    assert_eq!(&*idents.handle_hook.sym, "_handle_hook2");
    assert_eq!(&*idents.perform_ops.sym, "_perform_ops2");
    assert!(ctx.helpers_declared());
}

#[test]
fn test_queue_binding_is_recorded() {
    let (_, mut program) = parse("function f() {}");
    let mut ctx = TransformContext::new(&program);

    let Program::Script(script) = &mut program else {
        panic!("expected script");
    };
    let Some(Stmt::Decl(Decl::Fn(decl))) = script.body.first_mut() else {
        panic!("expected function");
    };
    let id = FunctionId::from_span(decl.function.span);
    assert!(ctx.queue_for(id).is_none());

    let queue = ctx
        .init_for_func(FunctionNode::Function(&mut decl.function))
        .expect("instrument");
    assert_eq!(ctx.queue_for(id).map(|q| q.sym.clone()), Some(queue.sym));
    assert_eq!(ctx.instrumented_functions(), 1);
    assert_eq!(ctx.rewritten_returns(), 0);
}

#[test]
fn test_handle_hook_call_declares_helpers_once() {
    let (text, mut program) = parse("'use strict';\nfoo();");
    let mut ctx = TransformContext::new(&program);
    let queue = Ident::new("_q".into(), DUMMY_SP, SyntaxContext::empty());
    let value = Box::new(Expr::Ident(Ident::new(
        "value".into(),
        DUMMY_SP,
        SyntaxContext::empty(),
    )));

    let first = ctx.handle_hook_call(&queue, value.clone()).expect("call");
    let second = ctx.handle_hook_call(&queue, value).expect("call");
    assert_eq!(first, second);

    assert_eq!(ctx.inject_helpers(&mut program), 2);
    assert_eq!(ctx.inject_helpers(&mut program), 0);

    let printed: String = text
        .print(&program)
        .expect("print")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    assert_eq!(printed.matches("function_handle_hook(").count(), 1);
    assert_eq!(printed.matches("const_perform_ops=").count(), 1);
}
