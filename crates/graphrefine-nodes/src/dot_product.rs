//! Inner product of two vectors.

use std::any::Any;

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, PortId, PortValues,
    TransformError,
};

use crate::binary::BinaryOperationNode;
use crate::ops::BinaryOp;
use crate::sum::SumNode;

/// Computes `sum(a[i] * b[i])` over two equally sized inputs.
///
/// Refines into a vector multiply feeding a [`SumNode`]; later passes break
/// both down to scalars.
#[derive(Debug, Clone)]
pub struct DotProductNode {
    id: NodeId,
    input1: PortElements,
    input2: PortElements,
    output: OutputPort,
}

impl DotProductNode {
    pub fn new(id: NodeId, input1: PortElements, input2: PortElements) -> Self {
        DotProductNode {
            id,
            input1,
            input2,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, 1),
        }
    }

    pub fn input1(&self) -> &PortElements {
        &self.input1
    }

    pub fn input2(&self) -> &PortElements {
        &self.input2
    }

    pub fn output(&self) -> &OutputPort {
        &self.output
    }

    fn check_widths(&self) -> Result<(), CoreError> {
        if self.input1.size() != self.input2.size() {
            return Err(CoreError::InputSizeMismatch {
                reason: format!(
                    "dot product operands of node {} have {} and {} elements",
                    self.id,
                    self.input1.size(),
                    self.input2.size()
                ),
            });
        }
        Ok(())
    }
}

impl Node for DotProductNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "DotProductNode"
    }

    fn inputs(&self) -> Vec<&PortElements> {
        vec![&self.input1, &self.input2]
    }

    fn outputs(&self) -> Vec<&OutputPort> {
        vec![&self.output]
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        self.check_widths()?;
        let a = values.gather(&self.input1)?;
        let b = values.gather(&self.input2)?;
        let dot = a.into_iter().zip(b).map(|(x, y)| x * y).sum();
        values.set(&self.output, vec![dot])
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input1 = transformer.transform_port_elements(&self.input1)?;
        let input2 = transformer.transform_port_elements(&self.input2)?;
        let output = transformer
            .add_node(|id| DotProductNode::new(id, input1, input2))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        if transformer.is_node_compilable(self) {
            self.copy(transformer)?;
            return Ok(false);
        }
        self.check_widths()?;

        let input1 = transformer.transform_port_elements(&self.input1)?;
        let input2 = transformer.transform_port_elements(&self.input2)?;
        let products = transformer
            .add_node(|id| BinaryOperationNode::new(id, BinaryOp::Multiply, input1, input2))?
            .output()
            .clone();
        transformer.check_refined_node(products.node())?;

        let total = transformer
            .add_node(|id| SumNode::new(id, PortElements::from(&products)))?
            .output()
            .clone();
        transformer.check_refined_node(total.node())?;

        transformer.map_node_output(&self.output, &PortElements::from(&total))?;
        tracing::trace!(
            node = %self.id,
            width = self.input1.size(),
            "split dot product into multiply and sum"
        );
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
