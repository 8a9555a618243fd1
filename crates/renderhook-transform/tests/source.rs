use super::*;
use renderhook_common::diagnostic_codes;

fn squash(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_parse_and_print_script() {
    let text = SourceText::new("app.js", "function f() { return a; }");
    let program = text.parse(&TransformOptions::default()).expect("parse");

    assert!(matches!(program, Program::Script(_)));
    let code = text.print(&program).expect("print");
    assert_eq!(squash(&code), "functionf(){returna;}");
}

#[test]
fn test_import_makes_a_module() {
    let text = SourceText::new("app.js", "import x from \"y\";\nx();");
    let program = text.parse(&TransformOptions::default()).expect("parse");
    assert!(matches!(program, Program::Module(_)));
}

#[test]
fn test_jsx_requires_option() {
    let source = "const el = <div />;";
    let text = SourceText::new("app.jsx", source);

    assert!(text.parse(&TransformOptions::default()).is_err());

    let options = TransformOptions {
        jsx: true,
        ..TransformOptions::default()
    };
    assert!(text.parse(&options).is_ok());
}

#[test]
fn test_syntax_error_becomes_diagnostic() {
    let text = SourceText::new("broken.js", "function f( {");
    let error = text
        .parse(&TransformOptions::default())
        .expect_err("syntax error expected");

    assert_eq!(error.code(), diagnostic_codes::SYNTAX_ERROR);
    let diagnostic = text.diagnostic(&error);
    assert_eq!(diagnostic.file, "broken.js");
    assert!(diagnostic.start <= "function f( {".len() as u32);
    assert_eq!(diagnostic.code, diagnostic_codes::SYNTAX_ERROR);
}

#[test]
fn test_dummy_span_has_empty_range() {
    let text = SourceText::new("app.js", "a;");
    assert_eq!(text.relative_range(swc_core::common::DUMMY_SP), (0, 0));
}
