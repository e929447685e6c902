//! Reduction of a vector to the sum of its elements.

use std::any::Any;

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, PortId, PortValues,
    TransformError,
};

use crate::binary::BinaryOperationNode;
use crate::constant::ConstantNode;
use crate::ops::BinaryOp;

/// Sums every element of its input into a single value.
///
/// Refines into a left-to-right chain of scalar additions. A one-element sum
/// refines into its input directly and an empty one into the constant `0`.
#[derive(Debug, Clone)]
pub struct SumNode {
    id: NodeId,
    input: PortElements,
    output: OutputPort,
}

impl SumNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        SumNode {
            id,
            input,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, 1),
        }
    }

    pub fn input(&self) -> &PortElements {
        &self.input
    }

    pub fn output(&self) -> &OutputPort {
        &self.output
    }
}

impl Node for SumNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "SumNode"
    }

    fn inputs(&self) -> Vec<&PortElements> {
        vec![&self.input]
    }

    fn outputs(&self) -> Vec<&OutputPort> {
        vec![&self.output]
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        let total = values.gather(&self.input)?.into_iter().sum();
        values.set(&self.output, vec![total])
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.input)?;
        let output = transformer
            .add_node(|id| SumNode::new(id, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        if transformer.is_node_compilable(self) {
            self.copy(transformer)?;
            return Ok(false);
        }

        let input = transformer.transform_port_elements(&self.input)?;
        let mut elements = input.iter();
        let result = match elements.next() {
            None => {
                let zero = transformer
                    .add_node(|id| ConstantNode::new(id, vec![0.0]))?
                    .output()
                    .clone();
                transformer.check_refined_node(zero.node())?;
                PortElements::from(&zero)
            }
            Some(first) => {
                let mut total = PortElements::from(first);
                for element in elements {
                    let lhs = total;
                    let partial = transformer
                        .add_node(|id| {
                            BinaryOperationNode::new(
                                id,
                                BinaryOp::Add,
                                lhs,
                                PortElements::from(element),
                            )
                        })?
                        .output()
                        .clone();
                    transformer.check_refined_node(partial.node())?;
                    total = PortElements::from(&partial);
                }
                total
            }
        };
        transformer.map_node_output(&self.output, &result)?;

        tracing::trace!(
            node = %self.id,
            width = self.input.size(),
            "expanded sum into scalar additions"
        );
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
