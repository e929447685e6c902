//! Elementwise single-operand node.

use std::any::Any;

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, PortId, PortValues,
    TransformError,
};

use crate::elementwise::split_elementwise;
use crate::ops::UnaryOp;

/// Applies a [`UnaryOp`] to every element of its input.
///
/// When the active context rejects it and it is wider than one element, it
/// refines into one scalar node per element.
#[derive(Debug, Clone)]
pub struct UnaryOperationNode {
    id: NodeId,
    op: UnaryOp,
    input: PortElements,
    output: OutputPort,
}

impl UnaryOperationNode {
    pub fn new(id: NodeId, op: UnaryOp, input: PortElements) -> Self {
        let size = input.size() as u32;
        UnaryOperationNode {
            id,
            op,
            input,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, size),
        }
    }

    pub fn op(&self) -> UnaryOp {
        self.op
    }

    pub fn input(&self) -> &PortElements {
        &self.input
    }

    pub fn output(&self) -> &OutputPort {
        &self.output
    }
}

impl Node for UnaryOperationNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "UnaryOperationNode"
    }

    fn label(&self) -> String {
        format!("UnaryOperationNode<{}>", self.op)
    }

    fn inputs(&self) -> Vec<&PortElements> {
        vec![&self.input]
    }

    fn outputs(&self) -> Vec<&OutputPort> {
        vec![&self.output]
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        let result = values
            .gather(&self.input)?
            .into_iter()
            .map(|x| self.op.apply(x))
            .collect();
        values.set(&self.output, result)
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.input)?;
        let op = self.op;
        let output = transformer
            .add_node(|id| UnaryOperationNode::new(id, op, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        if self.output.size() <= 1 || transformer.is_node_compilable(self) {
            self.copy(transformer)?;
            return Ok(false);
        }

        let op = self.op;
        split_elementwise(transformer, &self.output, &[&self.input], |id, mut operands| {
            UnaryOperationNode::new(id, op, operands.remove(0))
        })?;
        tracing::trace!(
            node = %self.id,
            op = %self.op,
            width = self.output.size(),
            "split unary operation into scalars"
        );
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
