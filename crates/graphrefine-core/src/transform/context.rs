//! The per-call policy object handed to copy and refine.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::node::Node;

type CompilablePredicate = dyn Fn(&dyn Node) -> bool + Send + Sync;

/// Decides which nodes need no further refinement.
///
/// Cloning is cheap: the predicate is shared behind an `Arc`. The default
/// context considers nothing compilable.
#[derive(Clone)]
pub struct TransformContext {
    is_node_compilable: Arc<CompilablePredicate>,
}

impl TransformContext {
    /// Creates a context from a compilability predicate.
    pub fn new<F>(is_node_compilable: F) -> Self
    where
        F: Fn(&dyn Node) -> bool + Send + Sync + 'static,
    {
        TransformContext {
            is_node_compilable: Arc::new(is_node_compilable),
        }
    }

    /// A context under which exactly the listed node kinds are compilable.
    pub fn from_type_names<I>(type_names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        let names: HashSet<&'static str> = type_names.into_iter().collect();
        Self::new(move |node| names.contains(node.type_name()))
    }

    pub fn is_node_compilable(&self, node: &dyn Node) -> bool {
        (self.is_node_compilable)(node)
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        Self::new(|_| false)
    }
}

impl fmt::Debug for TransformContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::input_node::InputNode;

    #[test]
    fn default_context_rejects_everything() {
        let node = InputNode::new(NodeId(0), 1);
        assert!(!TransformContext::default().is_node_compilable(&node));
    }

    #[test]
    fn custom_predicate_is_consulted() {
        let context = TransformContext::new(|node| node.id() == NodeId(3));
        assert!(context.is_node_compilable(&InputNode::new(NodeId(3), 1)));
        assert!(!context.is_node_compilable(&InputNode::new(NodeId(4), 1)));
    }

    #[test]
    fn type_name_context() {
        let context = TransformContext::from_type_names(["InputNode"]);
        assert!(context.is_node_compilable(&InputNode::new(NodeId(0), 2)));

        let clone = context.clone();
        assert!(clone.is_node_compilable(&InputNode::new(NodeId(1), 2)));
    }
}
