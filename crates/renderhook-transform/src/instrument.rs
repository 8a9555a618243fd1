//! Function instrumentation.
//!
//! Instrumenting a function gives it a local operation queue:
//!
//! ```javascript
//! function f() {
//!     const _renderhook_operations = [];
//!     ...
//!     return _perform_ops(_renderhook_operations, value);
//! }
//! ```
//!
//! Only returns that belong to the function itself are rewritten. The walk
//! does not enter nested functions or classes.

use rustc_hash::FxHashMap;
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{Expr, Ident, ReturnStmt};
use tracing::{debug, trace};

use crate::error::TemplateError;
use crate::function::{FunctionId, FunctionNode};
use crate::names::NameGenerator;
use crate::runtime_helpers::{RuntimeHelperInjector, is_directive};
use crate::templates::{Substitutions, Templates};
use crate::walk::{Flow, NodeMut, ScopedVisitor, ScopedWalker};

pub const QUEUE_HINT: &str = "renderhook_operations";

/// Per-function queue bindings.
#[derive(Debug, Default)]
pub struct FunctionInstrumenter {
    queues: FxHashMap<FunctionId, Ident>,
    rewritten_returns: usize,
}

impl FunctionInstrumenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_for(&self, id: FunctionId) -> Option<&Ident> {
        self.queues.get(&id)
    }

    pub fn instrumented_count(&self) -> usize {
        self.queues.len()
    }

    pub fn rewritten_returns(&self) -> usize {
        self.rewritten_returns
    }

    /// Queue identifier for `func`, instrumenting it on first call.
    pub fn init_for_func(
        &mut self,
        mut func: FunctionNode<'_>,
        templates: &Templates,
        names: &mut NameGenerator,
        helpers: &mut RuntimeHelperInjector,
    ) -> Result<Ident, TemplateError> {
        let id = func.id();
        if let Some(queue) = self.queues.get(&id) {
            return Ok(queue.clone());
        }

        let kind = func.kind_name();
        let queue = names.generate(QUEUE_HINT);
        let decl = templates
            .array_init
            .instantiate_stmt(Substitutions::new().ident("OPS", queue.clone()))?;

        self.queues.insert(id, queue.clone());
        let (rewritten, error) = func.with_block(|body| {
            let at = body.stmts.iter().take_while(|stmt| is_directive(stmt)).count();
            body.stmts.insert(at, decl);

            let mut walker = ScopedWalker::new(ReturnRewriter {
                queue: &queue,
                templates,
                names,
                helpers,
                rewritten: 0,
                error: None,
            });
            walker.walk_block(body);
            let rewriter = walker.into_inner();
            (rewriter.rewritten, rewriter.error)
        });
        if let Some(err) = error {
            return Err(err);
        }
        self.rewritten_returns += rewritten;

        debug!(
            queue = %queue.sym,
            kind,
            returns = rewritten,
            "instrumented function"
        );
        Ok(queue)
    }
}

struct ReturnRewriter<'a> {
    queue: &'a Ident,
    templates: &'a Templates,
    names: &'a mut NameGenerator,
    helpers: &'a mut RuntimeHelperInjector,
    rewritten: usize,
    error: Option<TemplateError>,
}

impl ReturnRewriter<'_> {
    fn rewrite(&mut self, ret: &mut ReturnStmt) -> Result<(), TemplateError> {
        let idents = self.helpers.get_impl_idents(self.names, self.templates)?;
        let value = ret.arg.take().unwrap_or_else(|| Expr::undefined(DUMMY_SP));
        let folded = self.templates.perform_ops.instantiate_expr(
            Substitutions::new()
                .ident("PERFORM_OPS", idents.perform_ops)
                .ident("OPS", self.queue.clone())
                .expr("VALUE", value),
        )?;
        ret.arg = Some(folded);
        self.rewritten += 1;
        trace!(queue = %self.queue.sym, "rewrote return");
        Ok(())
    }
}

impl ScopedVisitor for ReturnRewriter<'_> {
    fn enter(&mut self, node: NodeMut<'_>) -> Flow {
        match node {
            NodeMut::Function(_) | NodeMut::Class(_) => Flow::SkipSubtree,
            NodeMut::Return(ret) => match self.rewrite(ret) {
                // The original value may hold nested functions; none of
                // their returns belong to this function.
                Ok(()) => Flow::SkipSubtree,
                Err(err) => {
                    self.error = Some(err);
                    Flow::Stop
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/instrument.rs"]
mod tests;
