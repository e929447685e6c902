//! Fixed-value source node.

use std::any::Any;

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, PortId, PortValues,
    TransformError,
};

/// A node with no inputs whose output is a fixed vector.
#[derive(Debug, Clone)]
pub struct ConstantNode {
    id: NodeId,
    values: Vec<f64>,
    output: OutputPort,
}

impl ConstantNode {
    pub fn new(id: NodeId, values: Vec<f64>) -> Self {
        let size = values.len() as u32;
        ConstantNode {
            id,
            values,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, size),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn output(&self) -> &OutputPort {
        &self.output
    }
}

impl Node for ConstantNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "ConstantNode"
    }

    fn label(&self) -> String {
        let values: Vec<String> = self.values.iter().map(f64::to_string).collect();
        format!("ConstantNode<{}>", values.join(", "))
    }

    fn inputs(&self) -> Vec<&PortElements> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<&OutputPort> {
        vec![&self.output]
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        values.set(&self.output, self.values.clone())
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let values = self.values.clone();
        let output = transformer
            .add_node(|id| ConstantNode::new(id, values))?
            .output()
            .clone();
        transformer.map_node_output(&self.output, &PortElements::from(&output))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphrefine_core::Model;
    use std::collections::HashMap;

    #[test]
    fn compute_publishes_values() {
        let mut model = Model::new();
        let output = model
            .add_node(|id| ConstantNode::new(id, vec![1.5, -2.0]))
            .unwrap()
            .output()
            .clone();
        let values = model.evaluate(HashMap::new()).unwrap();
        assert_eq!(values.get(&output), Some(&[1.5, -2.0][..]));
    }

    #[test]
    fn label_lists_values() {
        let node = ConstantNode::new(NodeId(0), vec![0.0, 2.5]);
        assert_eq!(node.label(), "ConstantNode<0, 2.5>");
    }
}
