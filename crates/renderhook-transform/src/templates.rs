//! Code Templates
//!
//! Generated code is described as small JavaScript fragments with
//! placeholders, in the style of `babel.template`:
//!
//! ```javascript
//! HANDLE_HOOK(OPS, RESULT)
//! ```
//!
//! Any identifier made only of `A-Z`, `0-9`, `_` and `$` is a placeholder.
//! A template is parsed once, with every span reset to `DUMMY_SP`, and then
//! instantiated by cloning the fragment and substituting each placeholder
//! with either an identifier or an expression.
//!
//! # Template set
//!
//! | Template | Kind | Placeholders |
//! |----------|------|--------------|
//! | `array_init` | statement | `OPS` |
//! | `handle_hook` | expression | `HANDLE_HOOK`, `OPS`, `RESULT` |
//! | `perform_ops` | expression | `PERFORM_OPS`, `OPS`, `VALUE` |
//! | `handle_hook_impl` | statement | `IDENT` |
//! | `perform_ops_impl` | statement | `IDENT` |

use once_cell::unsync::OnceCell;
use rustc_hash::FxHashMap;
use swc_core::common::sync::Lrc;
use swc_core::common::{DUMMY_SP, FileName, SourceMap, Span};
use swc_core::ecma::ast::{EsVersion, Expr, Ident, ParenExpr, Script, Stmt};
use swc_core::ecma::parser::{Syntax, parse_file_as_script};
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

use crate::error::TemplateError;

const ARRAY_INIT: &str = "const OPS = [];";

const HANDLE_HOOK: &str = "HANDLE_HOOK(OPS, RESULT);";

const PERFORM_OPS: &str = "PERFORM_OPS(OPS, VALUE);";

// The tuple argument is indexed, never destructured.
const HANDLE_HOOK_IMPL: &str = r#"
function IDENT(ops, ret_func_tuple) {
    const retValue = ret_func_tuple[0];
    const wrapRender = ret_func_tuple[1];
    if (wrapRender) {
        ops.push(wrapRender);
    }
    return retValue;
}
"#;

const PERFORM_OPS_IMPL: &str =
    "const IDENT = (ops, retValue) => ops.reduce((acc, op) => op(acc), retValue);";

/// Value substituted for a placeholder.
#[derive(Debug, Clone)]
pub enum Replacement {
    Ident(Ident),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    entries: FxHashMap<String, Replacement>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ident(mut self, placeholder: &str, ident: Ident) -> Self {
        self.entries
            .insert(placeholder.to_string(), Replacement::Ident(ident));
        self
    }

    pub fn expr(mut self, placeholder: &str, expr: Box<Expr>) -> Self {
        self.entries
            .insert(placeholder.to_string(), Replacement::Expr(expr));
        self
    }

    fn get(&self, placeholder: &str) -> Option<&Replacement> {
        self.entries.get(placeholder)
    }
}

#[derive(Debug, Clone)]
enum Fragment {
    Stmt(Stmt),
    Expr(Box<Expr>),
}

/// An immutable parsed fragment with named holes.
#[derive(Debug, Clone)]
pub struct Template {
    name: &'static str,
    fragment: Fragment,
    placeholders: Vec<String>,
}

impl Template {
    /// Parse a template consisting of exactly one statement.
    pub fn statement(name: &'static str, source: &str) -> Result<Self, TemplateError> {
        let mut script = parse_template(name, source)?;
        if script.body.len() != 1 {
            return Err(TemplateError::Shape {
                template: name,
                expected: "statement",
            });
        }
        let stmt = script.body.remove(0);
        Ok(Self::new(name, Fragment::Stmt(stmt)))
    }

    /// Parse a template consisting of exactly one expression statement; the
    /// expression is kept.
    pub fn expression(name: &'static str, source: &str) -> Result<Self, TemplateError> {
        let mut script = parse_template(name, source)?;
        match script.body.pop() {
            Some(Stmt::Expr(expr_stmt)) if script.body.is_empty() => {
                Ok(Self::new(name, Fragment::Expr(expr_stmt.expr)))
            }
            _ => Err(TemplateError::Shape {
                template: name,
                expected: "expression",
            }),
        }
    }

    fn new(name: &'static str, fragment: Fragment) -> Self {
        let mut finder = PlaceholderFinder::default();
        match &fragment {
            Fragment::Stmt(stmt) => stmt.visit_with(&mut finder),
            Fragment::Expr(expr) => expr.visit_with(&mut finder),
        }
        let mut placeholders = finder.found;
        placeholders.sort();
        placeholders.dedup();
        Template {
            name,
            fragment,
            placeholders,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Placeholder names, sorted.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    pub fn instantiate_stmt(&self, substitutions: Substitutions) -> Result<Stmt, TemplateError> {
        let Fragment::Stmt(stmt) = &self.fragment else {
            return Err(TemplateError::Shape {
                template: self.name,
                expected: "statement",
            });
        };
        self.check(&substitutions)?;
        let mut stmt = stmt.clone();
        let mut filler = Filler::new(self.name, &substitutions);
        stmt.visit_mut_with(&mut filler);
        filler.finish()?;
        Ok(stmt)
    }

    pub fn instantiate_expr(
        &self,
        substitutions: Substitutions,
    ) -> Result<Box<Expr>, TemplateError> {
        let Fragment::Expr(expr) = &self.fragment else {
            return Err(TemplateError::Shape {
                template: self.name,
                expected: "expression",
            });
        };
        self.check(&substitutions)?;
        let mut expr = expr.clone();
        let mut filler = Filler::new(self.name, &substitutions);
        expr.visit_mut_with(&mut filler);
        filler.finish()?;
        Ok(expr)
    }

    fn check(&self, substitutions: &Substitutions) -> Result<(), TemplateError> {
        if let Some(unknown) = substitutions
            .entries
            .keys()
            .find(|name| !self.placeholders.contains(name))
        {
            return Err(TemplateError::UnknownPlaceholder {
                template: self.name,
                name: unknown.clone(),
            });
        }
        if let Some(missing) = self
            .placeholders
            .iter()
            .find(|name| substitutions.get(name).is_none())
        {
            return Err(TemplateError::MissingPlaceholder {
                template: self.name,
                name: missing.clone(),
            });
        }
        Ok(())
    }
}

/// The fixed set of templates used by the transform.
#[derive(Debug, Clone)]
pub struct Templates {
    pub array_init: Template,
    pub handle_hook: Template,
    pub perform_ops: Template,
    pub handle_hook_impl: Template,
    pub perform_ops_impl: Template,
}

impl Templates {
    pub fn build() -> Result<Self, TemplateError> {
        tracing::debug!("building renderhook templates");
        Ok(Templates {
            array_init: Template::statement("array_init", ARRAY_INIT)?,
            handle_hook: Template::expression("handle_hook", HANDLE_HOOK)?,
            perform_ops: Template::expression("perform_ops", PERFORM_OPS)?,
            handle_hook_impl: Template::statement("handle_hook_impl", HANDLE_HOOK_IMPL)?,
            perform_ops_impl: Template::statement("perform_ops_impl", PERFORM_OPS_IMPL)?,
        })
    }
}

/// Lazily built template set, owned by one transform context.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: OnceCell<Templates>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built on first call; later calls return the same set.
    pub fn get_templates(&self) -> Result<&Templates, TemplateError> {
        self.templates.get_or_try_init(Templates::build)
    }

    pub fn is_built(&self) -> bool {
        self.templates.get().is_some()
    }
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'$')
}

fn parse_template(name: &'static str, source: &str) -> Result<Script, TemplateError> {
    let cm: Lrc<SourceMap> = Default::default();
    let file = cm.new_source_file(
        FileName::Custom(format!("<template {name}>")).into(),
        source.to_string(),
    );
    let mut recovered = Vec::new();
    let mut script = parse_file_as_script(
        &file,
        Syntax::Es(Default::default()),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .map_err(|err| TemplateError::Parse {
        template: name,
        message: err.kind().msg().into_owned(),
    })?;
    if let Some(err) = recovered.first() {
        return Err(TemplateError::Parse {
            template: name,
            message: err.kind().msg().into_owned(),
        });
    }

    script.visit_mut_with(&mut DropSpan);
    Ok(script)
}

struct DropSpan;

impl VisitMut for DropSpan {
    fn visit_mut_span(&mut self, span: &mut Span) {
        *span = DUMMY_SP;
    }
}

#[derive(Default)]
struct PlaceholderFinder {
    found: Vec<String>,
}

impl Visit for PlaceholderFinder {
    fn visit_ident(&mut self, ident: &Ident) {
        if is_placeholder(&ident.sym) {
            self.found.push(ident.sym.to_string());
        }
    }
}

struct Filler<'a> {
    template: &'static str,
    substitutions: &'a Substitutions,
    error: Option<TemplateError>,
}

impl<'a> Filler<'a> {
    fn new(template: &'static str, substitutions: &'a Substitutions) -> Self {
        Filler {
            template,
            substitutions,
            error: None,
        }
    }

    fn finish(self) -> Result<(), TemplateError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl VisitMut for Filler<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Ident(ident) = expr {
            if let Some(Replacement::Expr(replacement)) = self.substitutions.get(&ident.sym) {
                // Substituted code is never rescanned for placeholders.
                *expr = match &**replacement {
                    seq @ Expr::Seq(_) => Expr::Paren(ParenExpr {
                        span: DUMMY_SP,
                        expr: Box::new(seq.clone()),
                    }),
                    other => other.clone(),
                };
                return;
            }
        }
        expr.visit_mut_children_with(self);
    }

    fn visit_mut_ident(&mut self, ident: &mut Ident) {
        match self.substitutions.get(&ident.sym) {
            Some(Replacement::Ident(replacement)) => *ident = replacement.clone(),
            Some(Replacement::Expr(_)) => {
                self.error.get_or_insert(TemplateError::ExpressionInBindingPosition {
                    template: self.template,
                    name: ident.sym.to_string(),
                });
            }
            None => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/templates.rs"]
mod tests;
