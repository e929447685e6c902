//! Sink node marking a model result.

use std::any::Any;

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, PortId, PortValues,
    TransformError,
};

/// Forwards its input unchanged. Marks the values a caller reads back.
#[derive(Debug, Clone)]
pub struct OutputNode {
    id: NodeId,
    input: PortElements,
    output: OutputPort,
}

impl OutputNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        let size = input.size() as u32;
        OutputNode {
            id,
            input,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, size),
        }
    }

    pub fn input(&self) -> &PortElements {
        &self.input
    }

    pub fn output(&self) -> &OutputPort {
        &self.output
    }
}

impl Node for OutputNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "OutputNode"
    }

    fn inputs(&self) -> Vec<&PortElements> {
        vec![&self.input]
    }

    fn outputs(&self) -> Vec<&OutputPort> {
        vec![&self.output]
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        let input = values.gather(&self.input)?;
        values.set(&self.output, input)
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.input)?;
        let output = transformer
            .add_node(|id| OutputNode::new(id, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
