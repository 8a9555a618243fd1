//! Marker discovery.
//!
//! The marker is whatever the file binds to the default export of the
//! macro module:
//!
//! ```javascript
//! import renderhook from "renderhook/macro";
//! const renderhook = require("renderhook/macro");
//! ```
//!
//! Bindings are compared by `Id` (symbol plus syntax context), so the
//! program must have been through the resolver for shadowed names to be
//! told apart. Every use of a marker binding becomes a `MarkerReference`.

use swc_core::common::Span;
use swc_core::ecma::ast::{
    ArrowExpr, Callee, Constructor, Decl, Expr, Function, GetterProp, Id, Ident, ImportDecl,
    ImportSpecifier, Lit, ModuleDecl, ModuleExportName, ModuleItem, Pat, Program, SetterProp,
    Stmt, VarDecl,
};
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::error::{MarkerUsage, TransformError};
use crate::function::FunctionId;

/// A top-level statement that binds the marker.
#[derive(Debug, Clone)]
pub struct MacroImport {
    /// Local bindings of the default export. May be empty, e.g. for
    /// `import "renderhook/macro"`.
    pub locals: Vec<Id>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerReference {
    pub span: Span,
    pub usage: MarkerUsage,
    /// Innermost function-like whose body contains the reference.
    pub enclosing: Option<FunctionId>,
    /// Whether the reference sits in a parameter list, where the queue of
    /// the function is not yet declared.
    pub in_parameters: bool,
}

impl MarkerReference {
    /// The function to instrument for this reference, or the usage error.
    pub fn validate(&self, macro_source: &str) -> Result<FunctionId, TransformError> {
        if !self.usage.is_valid() {
            return Err(TransformError::InvalidUsage {
                macro_source: macro_source.to_string(),
                usage: self.usage,
                span: self.span,
            });
        }
        if self.in_parameters {
            return Err(TransformError::InParameterList {
                macro_source: macro_source.to_string(),
                span: self.span,
            });
        }
        self.enclosing
            .ok_or_else(|| TransformError::NoEnclosingFunction {
                macro_source: macro_source.to_string(),
                span: self.span,
            })
    }
}

/// The marker bindings of one file.
#[derive(Debug, Default)]
pub struct MarkerSet {
    ids: Vec<Id>,
    declarations: Vec<Span>,
}

impl MarkerSet {
    pub fn from_imports(imports: &[MacroImport]) -> Self {
        MarkerSet {
            ids: imports.iter().flat_map(|i| i.locals.iter().cloned()).collect(),
            declarations: imports.iter().map(|i| i.span).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_marker(&self, ident: &Ident) -> bool {
        self.ids
            .iter()
            .any(|(sym, ctxt)| *sym == ident.sym && *ctxt == ident.ctxt)
    }

    /// Whether `expr`, ignoring parentheses, is a marker identifier.
    pub fn is_marker_expr(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Ident(ident) => self.is_marker(ident),
            Expr::Paren(paren) => self.is_marker_expr(&paren.expr),
            _ => false,
        }
    }

    fn is_declaration(&self, span: Span) -> bool {
        self.declarations.contains(&span)
    }
}

// ============================================================================
// Import discovery
// ============================================================================

pub fn find_macro_imports(program: &Program, macro_source: &str) -> Vec<MacroImport> {
    match program {
        Program::Module(module) => module
            .body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    esm_import(import, macro_source)
                }
                ModuleItem::Stmt(stmt) => require_import(stmt, macro_source),
                _ => None,
            })
            .collect(),
        Program::Script(script) => script
            .body
            .iter()
            .filter_map(|stmt| require_import(stmt, macro_source))
            .collect(),
    }
}

/// Remove every top-level statement that imports the macro module.
pub fn remove_macro_imports(program: &mut Program, macro_source: &str) -> usize {
    match program {
        Program::Module(module) => {
            let before = module.body.len();
            module.body.retain(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    esm_import(import, macro_source).is_none()
                }
                ModuleItem::Stmt(stmt) => require_import(stmt, macro_source).is_none(),
                _ => true,
            });
            before - module.body.len()
        }
        Program::Script(script) => {
            let before = script.body.len();
            script
                .body
                .retain(|stmt| require_import(stmt, macro_source).is_none());
            before - script.body.len()
        }
    }
}

fn esm_import(import: &ImportDecl, macro_source: &str) -> Option<MacroImport> {
    if &*import.src.value != macro_source {
        return None;
    }
    let locals = import
        .specifiers
        .iter()
        .filter_map(|specifier| match specifier {
            ImportSpecifier::Default(default) => Some(default.local.to_id()),
            ImportSpecifier::Named(named) => match &named.imported {
                Some(ModuleExportName::Ident(imported)) if &*imported.sym == "default" => {
                    Some(named.local.to_id())
                }
                Some(ModuleExportName::Str(imported)) if &*imported.value == "default" => {
                    Some(named.local.to_id())
                }
                _ => None,
            },
            ImportSpecifier::Namespace(_) => None,
        })
        .collect();
    Some(MacroImport {
        locals,
        span: import.span,
    })
}

/// `const marker = require("renderhook/macro");` with a single declarator.
fn require_import(stmt: &Stmt, macro_source: &str) -> Option<MacroImport> {
    let Stmt::Decl(Decl::Var(var)) = stmt else {
        return None;
    };
    let [decl] = var.decls.as_slice() else {
        return None;
    };
    let Pat::Ident(binding) = &decl.name else {
        return None;
    };
    let Some(Expr::Call(call)) = decl.init.as_deref() else {
        return None;
    };
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(require) = &**callee else {
        return None;
    };
    if &*require.sym != "require" || call.args.len() != 1 || call.args[0].spread.is_some() {
        return None;
    }
    match &*call.args[0].expr {
        Expr::Lit(Lit::Str(src)) if &*src.value == macro_source => Some(MacroImport {
            locals: vec![binding.id.to_id()],
            span: var.span,
        }),
        _ => None,
    }
}

// ============================================================================
// Reference collection
// ============================================================================

/// Every use of a marker binding, in source order.
pub fn collect_references(program: &Program, markers: &MarkerSet) -> Vec<MarkerReference> {
    if markers.is_empty() {
        return Vec::new();
    }
    let mut collector = ReferenceCollector {
        markers,
        scopes: Vec::new(),
        found: Vec::new(),
    };
    program.visit_with(&mut collector);
    collector.found
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Body(FunctionId),
    Parameters,
}

struct ReferenceCollector<'a> {
    markers: &'a MarkerSet,
    scopes: Vec<Scope>,
    found: Vec<MarkerReference>,
}

impl ReferenceCollector<'_> {
    fn record(&mut self, span: Span, usage: MarkerUsage) {
        let (enclosing, in_parameters) = match self.scopes.last() {
            Some(Scope::Body(id)) => (Some(*id), false),
            Some(Scope::Parameters) => (None, true),
            None => (None, false),
        };
        self.found.push(MarkerReference {
            span,
            usage,
            enclosing,
            in_parameters,
        });
    }

    fn scoped<N: VisitWith<Self>>(&mut self, scope: Scope, node: &N) {
        self.scopes.push(scope);
        node.visit_with(self);
        self.scopes.pop();
    }
}

// Computed keys and decorators are evaluated in the surrounding scope, so
// they are visited before the function's own scope is entered.
impl Visit for ReferenceCollector<'_> {
    fn visit_function(&mut self, n: &Function) {
        n.decorators.visit_with(self);
        self.scoped(Scope::Parameters, &n.params);
        self.scoped(Scope::Body(FunctionId::from_span(n.span)), &n.body);
    }

    fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
        self.scoped(Scope::Parameters, &n.params);
        self.scoped(Scope::Body(FunctionId::from_span(n.span)), &n.body);
    }

    fn visit_constructor(&mut self, n: &Constructor) {
        n.key.visit_with(self);
        self.scoped(Scope::Parameters, &n.params);
        self.scoped(Scope::Body(FunctionId::from_span(n.span)), &n.body);
    }

    fn visit_getter_prop(&mut self, n: &GetterProp) {
        n.key.visit_with(self);
        self.scoped(Scope::Body(FunctionId::from_span(n.span)), &n.body);
    }

    fn visit_setter_prop(&mut self, n: &SetterProp) {
        n.key.visit_with(self);
        self.scoped(Scope::Parameters, &n.param);
        self.scoped(Scope::Body(FunctionId::from_span(n.span)), &n.body);
    }

    // Import bindings are declarations, not uses.
    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_var_decl(&mut self, n: &VarDecl) {
        if !self.markers.is_declaration(n.span) {
            n.visit_children_with(self);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    if self.markers.is_marker_expr(callee) {
                        let usage = MarkerUsage::Call {
                            args: call.args.len(),
                            spread: call.args.iter().any(|arg| arg.spread.is_some()),
                        };
                        self.record(call.span, usage);
                        call.args.visit_with(self);
                        return;
                    }
                }
            }
            Expr::New(new) if self.markers.is_marker_expr(&new.callee) => {
                self.record(new.span, MarkerUsage::New);
                new.args.visit_with(self);
                return;
            }
            Expr::TaggedTpl(tagged) if self.markers.is_marker_expr(&tagged.tag) => {
                self.record(tagged.span, MarkerUsage::TaggedTemplate);
                tagged.tpl.visit_with(self);
                return;
            }
            _ => {}
        }
        expr.visit_children_with(self);
    }

    fn visit_ident(&mut self, ident: &Ident) {
        if self.markers.is_marker(ident) {
            self.record(ident.span, MarkerUsage::Bare);
        }
    }
}

#[cfg(test)]
#[path = "../tests/references.rs"]
mod tests;
