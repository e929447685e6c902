//! Elementwise two-operand node.

use std::any::Any;

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, PortId, PortValues,
    TransformError,
};

use crate::elementwise::split_elementwise;
use crate::ops::BinaryOp;

/// Applies a [`BinaryOp`] pairwise to two equally sized inputs.
///
/// When the active context rejects it and it is wider than one element, it
/// refines into one scalar node per element pair.
#[derive(Debug, Clone)]
pub struct BinaryOperationNode {
    id: NodeId,
    op: BinaryOp,
    input1: PortElements,
    input2: PortElements,
    output: OutputPort,
}

impl BinaryOperationNode {
    /// The output is as wide as `input1`. Unequal widths are reported when
    /// the node is computed or refined.
    pub fn new(id: NodeId, op: BinaryOp, input1: PortElements, input2: PortElements) -> Self {
        let size = input1.size() as u32;
        BinaryOperationNode {
            id,
            op,
            input1,
            input2,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, size),
        }
    }

    pub fn op(&self) -> BinaryOp {
        self.op
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
                    "{} operands of node {} have {} and {} elements",
                    self.op,
                    self.id,
                    self.input1.size(),
                    self.input2.size()
                ),
            });
        }
        Ok(())
    }
}

impl Node for BinaryOperationNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "BinaryOperationNode"
    }

    fn label(&self) -> String {
        format!("BinaryOperationNode<{}>", self.op)
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
        let result = a
            .into_iter()
            .zip(b)
            .map(|(x, y)| self.op.apply(x, y))
            .collect();
        values.set(&self.output, result)
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input1 = transformer.transform_port_elements(&self.input1)?;
        let input2 = transformer.transform_port_elements(&self.input2)?;
        let op = self.op;
        let output = transformer
            .add_node(|id| BinaryOperationNode::new(id, op, input1, input2))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        if self.output.size() <= 1 || transformer.is_node_compilable(self) {
            self.copy(transformer)?;
            return Ok(false);
        }
        self.check_widths()?;

        let op = self.op;
        split_elementwise(
            transformer,
            &self.output,
            &[&self.input1, &self.input2],
            |id, mut operands| {
                let b = operands.remove(1);
                let a = operands.remove(0);
                BinaryOperationNode::new(id, op, a, b)
            },
        )?;
        tracing::trace!(
            node = %self.id,
            op = %self.op,
            width = self.output.size(),
            "split binary operation into scalars"
        );
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
