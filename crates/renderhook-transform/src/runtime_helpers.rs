//! Runtime helper declarations.
//!
//! The expanded code calls two helpers, declared once per file:
//!
//! - `_handle_hook(ops, [value, wrapRender])` queues `wrapRender` when it is
//!   truthy and returns `value`.
//! - `_perform_ops(ops, value)` threads `value` through the queued
//!   operations in order.
//!
//! Names are chosen on first use and the declarations are kept pending
//! until the rewrite of the file has finished, then spliced in after the
//! directive prologue. The `handle_hook` helper always precedes
//! `perform_ops`.

use swc_core::ecma::ast::{Expr, Ident, Lit, ModuleItem, Program, Stmt};

use crate::error::TemplateError;
use crate::names::NameGenerator;
use crate::templates::{Substitutions, Templates};

const HANDLE_HOOK_HINT: &str = "handle_hook";
const PERFORM_OPS_HINT: &str = "perform_ops";

#[derive(Debug, Clone)]
pub struct ImplIdents {
    pub handle_hook: Ident,
    pub perform_ops: Ident,
}

#[derive(Debug, Default)]
pub struct RuntimeHelperInjector {
    idents: Option<ImplIdents>,
    pending: Vec<Stmt>,
    injected: bool,
}

impl RuntimeHelperInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Helper identifiers for this file, declaring the helpers on first
    /// call.
    pub fn get_impl_idents(
        &mut self,
        names: &mut NameGenerator,
        templates: &Templates,
    ) -> Result<ImplIdents, TemplateError> {
        if let Some(idents) = &self.idents {
            return Ok(idents.clone());
        }

        let handle_hook = names.generate(HANDLE_HOOK_HINT);
        let perform_ops = names.generate(PERFORM_OPS_HINT);

        let perform_decl = templates
            .perform_ops_impl
            .instantiate_stmt(Substitutions::new().ident("IDENT", perform_ops.clone()))?;
        let handle_decl = templates
            .handle_hook_impl
            .instantiate_stmt(Substitutions::new().ident("IDENT", handle_hook.clone()))?;

        // Each declaration goes to the front, so handle_hook ends up first.
        self.pending.insert(0, perform_decl);
        self.pending.insert(0, handle_decl);

        tracing::debug!(
            handle_hook = %handle_hook.sym,
            perform_ops = %perform_ops.sym,
            "declared runtime helpers"
        );

        let idents = ImplIdents {
            handle_hook,
            perform_ops,
        };
        self.idents = Some(idents.clone());
        Ok(idents)
    }

    pub fn idents(&self) -> Option<&ImplIdents> {
        self.idents.as_ref()
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// Insert the pending declarations into `program`, after any leading
    /// directives. Returns the number of statements inserted.
    pub fn inject_into(&mut self, program: &mut Program) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let stmts = std::mem::take(&mut self.pending);
        let count = stmts.len();
        match program {
            Program::Module(module) => {
                let at = module
                    .body
                    .iter()
                    .take_while(|item| matches!(item, ModuleItem::Stmt(stmt) if is_directive(stmt)))
                    .count();
                module
                    .body
                    .splice(at..at, stmts.into_iter().map(ModuleItem::Stmt));
            }
            Program::Script(script) => {
                let at = script.body.iter().take_while(|stmt| is_directive(stmt)).count();
                script.body.splice(at..at, stmts);
            }
        }
        self.injected = true;
        count
    }
}

pub(crate) fn is_directive(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(expr_stmt) => matches!(&*expr_stmt.expr, Expr::Lit(Lit::Str(_))),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/runtime_helpers.rs"]
mod tests;
