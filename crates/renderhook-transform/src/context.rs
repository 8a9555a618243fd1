//! Per-file transform state.
//!
//! Every cache the transform needs lives here and is dropped with the
//! context: the template set, the name generator, the helper identifiers
//! and the per-function queue bindings.

use swc_core::ecma::ast::{Expr, Ident, Program};

use crate::error::TemplateError;
use crate::function::{FunctionId, FunctionNode};
use crate::instrument::FunctionInstrumenter;
use crate::names::NameGenerator;
use crate::runtime_helpers::{ImplIdents, RuntimeHelperInjector};
use crate::templates::{Substitutions, TemplateRegistry, Templates};

pub struct TransformContext {
    templates: TemplateRegistry,
    names: NameGenerator,
    helpers: RuntimeHelperInjector,
    instrumenter: FunctionInstrumenter,
}

impl TransformContext {
    /// Create a context for `program`. Every identifier already in the
    /// program is reserved.
    pub fn new(program: &Program) -> Self {
        TransformContext {
            templates: TemplateRegistry::new(),
            names: NameGenerator::from_program(program),
            helpers: RuntimeHelperInjector::new(),
            instrumenter: FunctionInstrumenter::new(),
        }
    }

    pub fn get_templates(&self) -> Result<&Templates, TemplateError> {
        self.templates.get_templates()
    }

    pub fn templates_built(&self) -> bool {
        self.templates.is_built()
    }

    pub fn get_impl_idents(&mut self) -> Result<ImplIdents, TemplateError> {
        let templates = self.templates.get_templates()?;
        self.helpers.get_impl_idents(&mut self.names, templates)
    }

    pub fn init_for_func(&mut self, func: FunctionNode<'_>) -> Result<Ident, TemplateError> {
        let templates = self.templates.get_templates()?;
        self.instrumenter
            .init_for_func(func, templates, &mut self.names, &mut self.helpers)
    }

    pub fn queue_for(&self, id: FunctionId) -> Option<&Ident> {
        self.instrumenter.queue_for(id)
    }

    /// `_handle_hook(queue, value)`
    pub fn handle_hook_call(
        &mut self,
        queue: &Ident,
        value: Box<Expr>,
    ) -> Result<Box<Expr>, TemplateError> {
        let idents = self.get_impl_idents()?;
        let templates = self.templates.get_templates()?;
        templates.handle_hook.instantiate_expr(
            Substitutions::new()
                .ident("HANDLE_HOOK", idents.handle_hook)
                .ident("OPS", queue.clone())
                .expr("RESULT", value),
        )
    }

    /// Splice the pending helper declarations into `program`.
    pub fn inject_helpers(&mut self, program: &mut Program) -> usize {
        self.helpers.inject_into(program)
    }

    pub fn helpers_declared(&self) -> bool {
        self.helpers.idents().is_some()
    }

    pub fn instrumented_functions(&self) -> usize {
        self.instrumenter.instrumented_count()
    }

    pub fn rewritten_returns(&self) -> usize {
        self.instrumenter.rewritten_returns()
    }
}

#[cfg(test)]
#[path = "../tests/context.rs"]
mod tests;
