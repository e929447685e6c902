//! The [`Node`] trait every model vertex implements.
//!
//! A node owns its input references and output ports and knows how to do
//! three things: compute its outputs from its inputs, reproduce itself in a
//! model under construction ([`copy`](Node::copy)), and optionally rewrite
//! itself into a more primitive subgraph ([`refine`](Node::refine)).
//!
//! Both `copy` and `refine` receive the in-progress
//! [`ModelTransformer`]. The usual shape of a `copy` is:
//!
//! ```ignore
//! fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
//!     let input = transformer.transform_port_elements(&self.input)?;
//!     let output = transformer
//!         .add_node(|id| NegateNode::new(id, input))?
//!         .output()
//!         .clone();
//!     transformer.map_node_output(&self.output, &PortElements::from(&output))
//! }
//! ```

use std::any::Any;
use std::fmt;

use crate::error::{CoreError, TransformError};
use crate::id::NodeId;
use crate::port::{OutputPort, PortElements};
use crate::transform::ModelTransformer;
use crate::values::PortValues;

/// A vertex of a [`Model`](crate::model::Model).
pub trait Node: fmt::Debug + Any {
    /// The id this node was assigned when added to its model.
    fn id(&self) -> NodeId;

    /// Human-readable kind name used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Kind name plus any parameters, used in model listings.
    fn label(&self) -> String {
        self.type_name().to_string()
    }

    /// Every input, in input order.
    fn inputs(&self) -> Vec<&PortElements>;

    /// Every output port, in port order.
    fn outputs(&self) -> Vec<&OutputPort>;

    /// Reads input values from `values` and stores this node's outputs.
    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError>;

    /// Reproduces this node in the transformer's working model and maps each
    /// of its output elements to the counterpart.
    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError>;

    /// Rewrites this node into an equivalent, more primitive subgraph.
    ///
    /// Returns `true` if the node rewrote itself. Declining (the default)
    /// must leave the working model exactly as [`copy`](Node::copy) would.
    /// A rewrite whose replacement still fails the context predicate must
    /// call [`ModelTransformer::mark_uncompilable`].
    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        self.copy(transformer)?;
        Ok(false)
    }

    fn as_any(&self) -> &dyn Any;
}

impl dyn Node {
    /// Downcasts to a concrete node type.
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Total number of values across all outputs.
    pub fn output_size(&self) -> u32 {
        self.outputs().iter().map(|p| p.size()).sum()
    }
}
