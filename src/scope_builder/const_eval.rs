//! Constant folding of array sizes.
//!
//! Array dimensions are sized during pass 1 when their expression is a
//! compile-time constant. Supported expressions:
//!
//! - Literals: integers, characters (code point), booleans (0/1)
//! - Arithmetic: `+ - * / %`, wrapping like the evaluator
//! - Names of scalars declared with a literal initializer
//!
//! Anything else folds to `None` and the dimension is sized at runtime.

use crate::{
    ast::ast::{Node, NodeKind},
    symbols::{
        scope::{ScopeId, ScopeTree},
        symbol::SymbolValue,
    },
};

pub struct ConstEvaluator<'a> {
    tree: &'a ScopeTree,
    scope: ScopeId,
}

impl<'a> ConstEvaluator<'a> {
    pub fn new(tree: &'a ScopeTree, scope: ScopeId) -> Self {
        ConstEvaluator { tree, scope }
    }

    pub fn eval(&self, node: &Node) -> Option<i32> {
        match node.kind {
            NodeKind::Int | NodeKind::Bool | NodeKind::Char => {
                SymbolValue::from_literal(node).map(SymbolValue::as_int)
            }
            NodeKind::Id => {
                let symbol = self.tree.resolve(self.scope, node.value())?;
                let symbol = self.tree.follow_references(symbol);
                self.tree.symbol(symbol).value.map(SymbolValue::as_int)
            }
            kind if kind.is_arithmetic() => {
                let left = self.eval(node.child(0)?)?;
                let right = self.eval(node.child(1)?)?;
                match kind {
                    NodeKind::Add => Some(left.wrapping_add(right)),
                    NodeKind::Sub => Some(left.wrapping_sub(right)),
                    NodeKind::Mul => Some(left.wrapping_mul(right)),
                    NodeKind::Div => left.checked_div(right),
                    _ => left.checked_rem(right),
                }
            }
            _ => None,
        }
    }

    /// Folds a dimension; negative sizes do not fold.
    pub fn eval_size(&self, node: &Node) -> Option<usize> {
        self.eval(node).and_then(|size| usize::try_from(size).ok())
    }
}
