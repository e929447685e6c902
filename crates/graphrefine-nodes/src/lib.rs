//! Arithmetic node kinds for graphrefine models.
//!
//! Every node here knows how to compute itself and how to copy itself into
//! a model under construction. The vector-valued ones also refine: a wide
//! [`UnaryOperationNode`] or [`BinaryOperationNode`] splits into one scalar
//! node per element, a [`SumNode`] becomes a chain of additions and a
//! [`DotProductNode`] becomes a multiply feeding a sum. Refining under
//! [`scalar_context`] therefore drives a model down to scalar arithmetic.

pub mod binary;
pub mod constant;
pub mod dot_product;
mod elementwise;
pub mod ops;
pub mod output;
pub mod sum;
pub mod unary;

use graphrefine_core::{InputNode, Node, TransformContext};

pub use binary::BinaryOperationNode;
pub use constant::ConstantNode;
pub use dot_product::DotProductNode;
pub use ops::{BinaryOp, UnaryOp};
pub use output::OutputNode;
pub use sum::SumNode;
pub use unary::UnaryOperationNode;

/// Whether `node` is already scalar arithmetic or a plain source or sink.
pub fn is_scalar_primitive(node: &dyn Node) -> bool {
    if node.downcast_ref::<InputNode>().is_some()
        || node.downcast_ref::<ConstantNode>().is_some()
        || node.downcast_ref::<OutputNode>().is_some()
    {
        return true;
    }
    if let Some(unary) = node.downcast_ref::<UnaryOperationNode>() {
        return unary.output().size() <= 1;
    }
    if let Some(binary) = node.downcast_ref::<BinaryOperationNode>() {
        return binary.output().size() <= 1;
    }
    false
}

/// A context accepting exactly the nodes [`is_scalar_primitive`] accepts.
pub fn scalar_context() -> TransformContext {
    TransformContext::new(is_scalar_primitive)
}
