//! Scope-aware mutable traversal.
//!
//! `ScopedWalker` drives a `VisitMut` traversal and hands the scope
//! boundaries that matter to this transform (function-likes, classes and
//! `return` statements) to a `ScopedVisitor`, which decides whether the
//! walk should descend, skip the node's subtree, or stop entirely.

use swc_core::ecma::ast::{
    ArrowExpr, BlockStmt, Class, Constructor, Function, GetterProp, ReturnStmt, SetterProp, Stmt,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::function::FunctionNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    SkipSubtree,
    Stop,
}

pub enum NodeMut<'a> {
    Function(FunctionNode<'a>),
    Class(&'a mut Class),
    Return(&'a mut ReturnStmt),
}

pub trait ScopedVisitor {
    fn enter(&mut self, node: NodeMut<'_>) -> Flow;
}

pub struct ScopedWalker<V> {
    visitor: V,
    stopped: bool,
}

impl<V: ScopedVisitor> ScopedWalker<V> {
    pub fn new(visitor: V) -> Self {
        ScopedWalker {
            visitor,
            stopped: false,
        }
    }

    /// Walk the statements of `block`. The block itself is not reported.
    pub fn walk_block(&mut self, block: &mut BlockStmt) {
        block.visit_mut_children_with(self);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn into_inner(self) -> V {
        self.visitor
    }

    // Returns true when the node's children should be visited.
    fn dispatch(&mut self, node: NodeMut<'_>) -> bool {
        if self.stopped {
            return false;
        }
        match self.visitor.enter(node) {
            Flow::Continue => true,
            Flow::SkipSubtree => false,
            Flow::Stop => {
                self.stopped = true;
                false
            }
        }
    }
}

impl<V: ScopedVisitor> VisitMut for ScopedWalker<V> {
    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        if !self.stopped {
            stmt.visit_mut_children_with(self);
        }
    }

    fn visit_mut_function(&mut self, n: &mut Function) {
        if self.dispatch(NodeMut::Function(FunctionNode::Function(n))) {
            n.visit_mut_children_with(self);
        }
    }

    fn visit_mut_arrow_expr(&mut self, n: &mut ArrowExpr) {
        if self.dispatch(NodeMut::Function(FunctionNode::Arrow(n))) {
            n.visit_mut_children_with(self);
        }
    }

    fn visit_mut_constructor(&mut self, n: &mut Constructor) {
        if self.dispatch(NodeMut::Function(FunctionNode::Constructor(n))) {
            n.visit_mut_children_with(self);
        }
    }

    fn visit_mut_getter_prop(&mut self, n: &mut GetterProp) {
        if self.dispatch(NodeMut::Function(FunctionNode::Getter(n))) {
            n.visit_mut_children_with(self);
        }
    }

    fn visit_mut_setter_prop(&mut self, n: &mut SetterProp) {
        if self.dispatch(NodeMut::Function(FunctionNode::Setter(n))) {
            n.visit_mut_children_with(self);
        }
    }

    fn visit_mut_class(&mut self, n: &mut Class) {
        if self.dispatch(NodeMut::Class(n)) {
            n.visit_mut_children_with(self);
        }
    }

    fn visit_mut_return_stmt(&mut self, n: &mut ReturnStmt) {
        if self.dispatch(NodeMut::Return(n)) {
            n.visit_mut_children_with(self);
        }
    }
}

#[cfg(test)]
#[path = "../tests/walk.rs"]
mod tests;
