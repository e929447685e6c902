//! Read-only scans used to explain refinement failures.

use crate::model::Model;
use crate::node::Node;

use super::context::TransformContext;

/// Lists every node of `model`, in model order, that `context` does not
/// consider compilable.
pub fn find_uncompilable_nodes<'m>(model: &'m Model, context: &TransformContext) -> Vec<&'m dyn Node> {
    model
        .iter()
        .filter(|node| !context.is_node_compilable(*node))
        .collect()
}
