//! Function-like nodes.
//!
//! Arrow functions, constructors and object getters/setters are separate
//! node types in the AST, but the transform treats all of them as "a
//! function with a body". `FunctionNode` is that view.

use swc_core::common::{DUMMY_SP, Span};
use swc_core::ecma::ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, Constructor, Function, GetterProp, ReturnStmt,
    SetterProp, Stmt,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

/// Identity of a function in the parsed file: its source range.
///
/// Functions coming from templates carry `DUMMY_SP` and are never
/// instrumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId {
    lo: u32,
    hi: u32,
}

impl FunctionId {
    pub fn from_span(span: Span) -> Self {
        FunctionId {
            lo: span.lo.0,
            hi: span.hi.0,
        }
    }
}

pub enum FunctionNode<'a> {
    Function(&'a mut Function),
    Arrow(&'a mut ArrowExpr),
    Constructor(&'a mut Constructor),
    Getter(&'a mut GetterProp),
    Setter(&'a mut SetterProp),
}

impl FunctionNode<'_> {
    pub fn span(&self) -> Span {
        match self {
            FunctionNode::Function(n) => n.span,
            FunctionNode::Arrow(n) => n.span,
            FunctionNode::Constructor(n) => n.span,
            FunctionNode::Getter(n) => n.span,
            FunctionNode::Setter(n) => n.span,
        }
    }

    pub fn id(&self) -> FunctionId {
        FunctionId::from_span(self.span())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FunctionNode::Function(_) => "function",
            FunctionNode::Arrow(_) => "arrow",
            FunctionNode::Constructor(_) => "constructor",
            FunctionNode::Getter(_) => "getter",
            FunctionNode::Setter(_) => "setter",
        }
    }

    pub fn reborrow(&mut self) -> FunctionNode<'_> {
        match self {
            FunctionNode::Function(n) => FunctionNode::Function(n),
            FunctionNode::Arrow(n) => FunctionNode::Arrow(n),
            FunctionNode::Constructor(n) => FunctionNode::Constructor(n),
            FunctionNode::Getter(n) => FunctionNode::Getter(n),
            FunctionNode::Setter(n) => FunctionNode::Setter(n),
        }
    }

    /// Run `f` on the function's block body.
    ///
    /// An expression-bodied arrow `x => e` becomes `x => { return e; }`.
    /// A missing body becomes an empty block.
    pub fn with_block<R>(&mut self, f: impl FnOnce(&mut BlockStmt) -> R) -> R {
        match self {
            FunctionNode::Function(n) => f(n.body.get_or_insert_with(BlockStmt::default)),
            FunctionNode::Arrow(n) => {
                let placeholder = BlockStmtOrExpr::BlockStmt(BlockStmt::default());
                let mut block = match std::mem::replace(&mut *n.body, placeholder) {
                    BlockStmtOrExpr::BlockStmt(block) => block,
                    BlockStmtOrExpr::Expr(value) => BlockStmt {
                        stmts: vec![Stmt::Return(ReturnStmt {
                            span: DUMMY_SP,
                            arg: Some(value),
                        })],
                        ..Default::default()
                    },
                };
                let result = f(&mut block);
                *n.body = BlockStmtOrExpr::BlockStmt(block);
                result
            }
            FunctionNode::Constructor(n) => f(n.body.get_or_insert_with(BlockStmt::default)),
            FunctionNode::Getter(n) => f(n.body.get_or_insert_with(BlockStmt::default)),
            FunctionNode::Setter(n) => f(n.body.get_or_insert_with(BlockStmt::default)),
        }
    }

    /// Visit everything evaluated outside the body: decorators, computed
    /// keys and parameters.
    pub fn visit_mut_signature_with<V: VisitMut>(&mut self, visitor: &mut V) {
        match self {
            FunctionNode::Function(n) => {
                n.decorators.visit_mut_with(visitor);
                n.params.visit_mut_with(visitor);
            }
            FunctionNode::Arrow(n) => n.params.visit_mut_with(visitor),
            FunctionNode::Constructor(n) => {
                n.key.visit_mut_with(visitor);
                n.params.visit_mut_with(visitor);
            }
            FunctionNode::Getter(n) => n.key.visit_mut_with(visitor),
            FunctionNode::Setter(n) => {
                n.key.visit_mut_with(visitor);
                n.param.visit_mut_with(visitor);
            }
        }
    }

    pub fn visit_mut_body_with<V: VisitMut>(&mut self, visitor: &mut V) {
        match self {
            FunctionNode::Function(n) => n.body.visit_mut_with(visitor),
            FunctionNode::Arrow(n) => n.body.visit_mut_with(visitor),
            FunctionNode::Constructor(n) => n.body.visit_mut_with(visitor),
            FunctionNode::Getter(n) => n.body.visit_mut_with(visitor),
            FunctionNode::Setter(n) => n.body.visit_mut_with(visitor),
        }
    }
}

#[cfg(test)]
#[path = "../tests/function.rs"]
mod tests;
