//! renderhook transform engine.
//!
//! Rewrites functions that call the `renderhook/macro` marker so that each
//! call registers a wrapper on a per-function operation queue, and every
//! return value of the function is folded through that queue:
//!
//! ```javascript
//! import renderhook from "renderhook/macro";
//!
//! function Panel(props) {
//!     const theme = renderhook(useTheme());
//!     return render(theme);
//! }
//! ```
//!
//! becomes
//!
//! ```javascript
//! function _handle_hook(ops, ret_func_tuple) { ... }
//! const _perform_ops = (ops, retValue) => ops.reduce((acc, op) => op(acc), retValue);
//!
//! function Panel(props) {
//!     const _renderhook_operations = [];
//!     const theme = _handle_hook(_renderhook_operations, useTheme());
//!     return _perform_ops(_renderhook_operations, render(theme));
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Role |
//! |--------|------|
//! | `templates` | Placeholder templates and the lazily built template set |
//! | `names` | Collision-free identifier generation |
//! | `walk` | Scope-aware traversal with continue / skip / stop |
//! | `runtime_helpers` | Once-per-file helper declarations |
//! | `instrument` | Once-per-function queue and return rewriting |
//! | `references` | Macro import discovery and marker references |
//! | `rewriter` | Validation and call-site rewriting |
//! | `source` | Parse / print front end |

use renderhook_common::Diagnostic;
use swc_core::common::{GLOBALS, Globals, Mark};
use swc_core::ecma::ast::Program;
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::visit::VisitMutWith;

pub mod context;
pub mod error;
pub mod function;
pub mod instrument;
pub mod names;
pub mod options;
pub mod references;
pub mod rewriter;
pub mod runtime_helpers;
pub mod source;
pub mod templates;
pub mod walk;

pub use context::TransformContext;
pub use error::{MarkerUsage, TemplateError, TransformError};
pub use options::{DEFAULT_MACRO_SOURCE, TransformOptions};
pub use rewriter::{TransformSummary, expand_macro};
pub use source::SourceText;

/// Printed output of one file and what the transform did to it.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    pub summary: TransformSummary,
}

/// Tag every identifier with the syntax context of the binding it refers
/// to, so that shadowed names compare unequal.
pub fn resolve_bindings(program: &mut Program) {
    GLOBALS.set(&Globals::new(), || {
        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();
        program.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));
    });
}

/// Resolve bindings and expand every marker call in `program`.
///
/// On error the program is left as the resolver produced it.
pub fn transform_program(
    program: &mut Program,
    options: &TransformOptions,
) -> Result<TransformSummary, TransformError> {
    resolve_bindings(program);
    expand_macro(program, options)
}

/// Parse, transform and print one file.
pub fn transform_source(
    name: &str,
    source: &str,
    options: &TransformOptions,
) -> Result<TransformOutput, Diagnostic> {
    let text = SourceText::new(name, source);
    let run = || -> Result<TransformOutput, TransformError> {
        let mut program = text.parse(options)?;
        let summary = transform_program(&mut program, options)?;
        let code = text.print(&program)?;
        Ok(TransformOutput { code, summary })
    };
    run().map_err(|err| text.diagnostic(&err))
}
