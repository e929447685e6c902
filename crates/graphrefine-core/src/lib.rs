//! Computation-graph models and the copy/refine transformation engine.
//!
//! - [`model`]: the acyclic [`Model`] container and its traversal.
//! - [`node`]: the [`Node`] trait every vertex implements.
//! - [`port`]: output ports and the element references consumers hold.
//! - [`transform`]: [`ModelTransformer`], which copies a model or refines it
//!   to a fixed point under a [`TransformContext`].

pub mod edge;
pub mod error;
pub mod id;
pub mod input_node;
pub mod model;
pub mod node;
pub mod port;
pub mod transform;
pub mod values;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{CoreError, TransformError};
pub use id::{NodeId, PortId};
pub use input_node::InputNode;
pub use model::Model;
pub use node::Node;
pub use port::{OutputPort, PortElement, PortElements, PortRange};
pub use transform::{ElementMap, ModelTransformer, TransformConfig, TransformContext};
pub use values::PortValues;
