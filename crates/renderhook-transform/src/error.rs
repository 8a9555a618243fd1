//! Error types for the transform.
//!
//! `InvalidUsage` and `InParameterList` report a misplaced marker; every
//! other variant is fatal for the file being processed and is propagated
//! unchanged.

use renderhook_common::diagnostic_codes;
use swc_core::common::Span;
use thiserror::Error;

/// How a marker reference appears in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerUsage {
    /// Callee of a normal call expression.
    Call { args: usize, spread: bool },
    /// Any use that is not a callee (assignment, export, argument, ...).
    Bare,
    /// Callee of a `new` expression.
    New,
    /// Tag of a tagged template literal.
    TaggedTemplate,
}

impl MarkerUsage {
    /// The only accepted shape: `marker(expr)`.
    pub fn is_valid(&self) -> bool {
        matches!(self, MarkerUsage::Call { args: 1, spread: false })
    }
}

impl std::fmt::Display for MarkerUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerUsage::Call { spread: true, .. } => f.write_str("a call with a spread argument"),
            MarkerUsage::Call { args: 1, .. } => f.write_str("a call with one argument"),
            MarkerUsage::Call { args, .. } => write!(f, "a call with {args} arguments"),
            MarkerUsage::Bare => f.write_str("a plain value"),
            MarkerUsage::New => f.write_str("a `new` expression"),
            MarkerUsage::TaggedTemplate => f.write_str("a template tag"),
        }
    }
}

/// Failures while parsing or instantiating a code template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template `{template}` failed to parse: {message}")]
    Parse {
        template: &'static str,
        message: String,
    },

    #[error("template `{template}` must contain a single {expected}")]
    Shape {
        template: &'static str,
        expected: &'static str,
    },

    #[error("template `{template}` has no placeholder named `{name}`")]
    UnknownPlaceholder {
        template: &'static str,
        name: String,
    },

    #[error("template `{template}` is missing a substitution for `{name}`")]
    MissingPlaceholder {
        template: &'static str,
        name: String,
    },

    #[error("placeholder `{name}` in template `{template}` only accepts an identifier")]
    ExpressionInBindingPosition {
        template: &'static str,
        name: String,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{macro_source} must be invoked as a normal function call with one argument, found {usage}")]
    InvalidUsage {
        macro_source: String,
        usage: MarkerUsage,
        span: Span,
    },

    #[error("{macro_source} is called outside of any function")]
    NoEnclosingFunction { macro_source: String, span: Span },

    #[error("{macro_source} cannot be called in a parameter list")]
    InParameterList { macro_source: String, span: Span },

    #[error("{message}")]
    Parse { message: String, span: Span },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("failed to print program: {0}")]
    Emit(#[from] std::io::Error),
}

impl TransformError {
    /// Source span the error points at, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            TransformError::InvalidUsage { span, .. }
            | TransformError::NoEnclosingFunction { span, .. }
            | TransformError::InParameterList { span, .. }
            | TransformError::Parse { span, .. } => Some(*span),
            TransformError::Template(_) | TransformError::Emit(_) => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            TransformError::InvalidUsage { .. } => diagnostic_codes::INVALID_MACRO_USAGE,
            TransformError::NoEnclosingFunction { .. } => diagnostic_codes::NO_ENCLOSING_FUNCTION,
            TransformError::InParameterList { .. } => diagnostic_codes::MACRO_IN_PARAMETERS,
            TransformError::Parse { .. } => diagnostic_codes::SYNTAX_ERROR,
            TransformError::Template(_) => diagnostic_codes::TEMPLATE_FAILURE,
            TransformError::Emit(_) => diagnostic_codes::EMIT_FAILURE,
        }
    }
}
