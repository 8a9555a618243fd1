//! Call-site rewriting, the entry point of the transform.
//!
//! `expand_macro` runs in three phases over one program:
//!
//! 1. **Discover**: find the macro imports and every reference to the
//!    marker bindings.
//! 2. **Validate**: every reference must be `marker(expr)` inside some
//!    function. The first violation aborts the file before anything is
//!    mutated.
//! 3. **Rewrite**: a single top-down walk instruments each function that
//!    contains a marker call (on entry, before its children are visited)
//!    and replaces each marker call with `_handle_hook(queue, expr)`. The
//!    helper declarations are spliced in and the macro imports removed once
//!    the walk is done.

use rustc_hash::FxHashSet;
use serde::Serialize;
use swc_core::ecma::ast::{
    ArrowExpr, Callee, Constructor, Expr, Function, GetterProp, Ident, Program, SetterProp,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use tracing::{debug, trace};

use crate::context::TransformContext;
use crate::error::TransformError;
use crate::function::{FunctionId, FunctionNode};
use crate::options::TransformOptions;
use crate::references::{MarkerSet, collect_references, find_macro_imports, remove_macro_imports};

/// What one run of the transform did to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformSummary {
    pub references: usize,
    pub rewritten_calls: usize,
    pub instrumented_functions: usize,
    pub rewritten_returns: usize,
    pub helpers_injected: usize,
    pub removed_imports: usize,
}

impl TransformSummary {
    pub fn is_unchanged(&self) -> bool {
        *self == TransformSummary::default()
    }
}

/// Expand every marker call in `program`.
///
/// Marker bindings are matched by syntax context, so the program should
/// already be resolved; `transform_program` does that.
pub fn expand_macro(
    program: &mut Program,
    options: &TransformOptions,
) -> Result<TransformSummary, TransformError> {
    let imports = find_macro_imports(program, &options.macro_source);
    if imports.is_empty() {
        return Ok(TransformSummary::default());
    }

    let markers = MarkerSet::from_imports(&imports);
    let references = collect_references(program, &markers);

    let mut targets = FxHashSet::default();
    for reference in &references {
        targets.insert(reference.validate(&options.macro_source)?);
    }

    let mut ctx = TransformContext::new(program);
    let rewritten_calls = if targets.is_empty() {
        0
    } else {
        let mut rewriter = CallSiteRewriter::new(&mut ctx, &markers, &targets);
        program.visit_mut_with(&mut rewriter);
        rewriter.finish()?
    };

    let helpers_injected = ctx.inject_helpers(program);
    let removed_imports = remove_macro_imports(program, &options.macro_source);

    let summary = TransformSummary {
        references: references.len(),
        rewritten_calls,
        instrumented_functions: ctx.instrumented_functions(),
        rewritten_returns: ctx.rewritten_returns(),
        helpers_injected,
        removed_imports,
    };
    debug!(?summary, "expanded {}", options.macro_source);
    Ok(summary)
}

struct CallSiteRewriter<'a> {
    ctx: &'a mut TransformContext,
    markers: &'a MarkerSet,
    targets: &'a FxHashSet<FunctionId>,
    /// Queue of each function on the current path; `None` for functions
    /// that are not instrumented.
    queues: Vec<Option<Ident>>,
    rewritten: usize,
    error: Option<TransformError>,
}

impl<'a> CallSiteRewriter<'a> {
    fn new(
        ctx: &'a mut TransformContext,
        markers: &'a MarkerSet,
        targets: &'a FxHashSet<FunctionId>,
    ) -> Self {
        CallSiteRewriter {
            ctx,
            markers,
            targets,
            queues: Vec::new(),
            rewritten: 0,
            error: None,
        }
    }

    fn finish(self) -> Result<usize, TransformError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.rewritten),
        }
    }

    fn enter_function(&mut self, mut func: FunctionNode<'_>) {
        if self.error.is_some() {
            return;
        }
        let queue = if self.targets.contains(&func.id()) {
            match self.ctx.init_for_func(func.reborrow()) {
                Ok(queue) => Some(queue),
                Err(err) => {
                    self.error = Some(err.into());
                    return;
                }
            }
        } else {
            None
        };

        // Keys and parameters belong to the surrounding scope.
        func.visit_mut_signature_with(self);
        self.queues.push(queue);
        func.visit_mut_body_with(self);
        self.queues.pop();
    }

    fn rewrite_call(&mut self, expr: &mut Expr) -> Result<(), TransformError> {
        let Expr::Call(call) = expr else {
            return Ok(());
        };
        let Callee::Expr(callee) = &call.callee else {
            return Ok(());
        };
        if !self.markers.is_marker_expr(callee) {
            return Ok(());
        }
        // Validation guarantees one argument and an instrumented
        // enclosing function.
        let Some(Some(queue)) = self.queues.last() else {
            return Ok(());
        };
        let queue = queue.clone();
        let Some(arg) = call.args.pop() else {
            return Ok(());
        };

        *expr = *self.ctx.handle_hook_call(&queue, arg.expr)?;
        self.rewritten += 1;
        trace!(queue = %queue.sym, "rewrote marker call");
        Ok(())
    }
}

impl VisitMut for CallSiteRewriter<'_> {
    fn visit_mut_function(&mut self, n: &mut Function) {
        self.enter_function(FunctionNode::Function(n));
    }

    fn visit_mut_arrow_expr(&mut self, n: &mut ArrowExpr) {
        self.enter_function(FunctionNode::Arrow(n));
    }

    fn visit_mut_constructor(&mut self, n: &mut Constructor) {
        self.enter_function(FunctionNode::Constructor(n));
    }

    fn visit_mut_getter_prop(&mut self, n: &mut GetterProp) {
        self.enter_function(FunctionNode::Getter(n));
    }

    fn visit_mut_setter_prop(&mut self, n: &mut SetterProp) {
        self.enter_function(FunctionNode::Setter(n));
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        // Arguments first, so `marker(marker(x))` rewrites inside out.
        expr.visit_mut_children_with(self);
        if let Err(err) = self.rewrite_call(expr) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
#[path = "../tests/rewriter.rs"]
mod tests;
