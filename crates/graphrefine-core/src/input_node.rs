//! The source node through which values enter a model.

use std::any::Any;

use crate::error::{CoreError, TransformError};
use crate::id::{NodeId, PortId};
use crate::node::Node;
use crate::port::{OutputPort, PortElements};
use crate::transform::ModelTransformer;
use crate::values::PortValues;

/// A node with no inputs whose output is supplied at evaluation time.
#[derive(Debug, Clone)]
pub struct InputNode {
    id: NodeId,
    output: OutputPort,
}

impl InputNode {
    pub fn new(id: NodeId, size: u32) -> Self {
        InputNode {
            id,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, size),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.output
    }

    pub fn size(&self) -> u32 {
        self.output.size()
    }
}

impl Node for InputNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "InputNode"
    }

    fn inputs(&self) -> Vec<&PortElements> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<&OutputPort> {
        vec![&self.output]
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        let supplied = values.input(self.id)?.to_vec();
        values.set(&self.output, supplied)
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let size = self.size();
        let output = transformer
            .add_node(|id| InputNode::new(id, size))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
