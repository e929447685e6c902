//! Value table used when evaluating a model.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::id::{NodeId, PortId};
use crate::port::{OutputPort, PortElement, PortElements};

/// Computed output values keyed by port, plus the values supplied for input
/// nodes.
#[derive(Debug, Clone, Default)]
pub struct PortValues {
    inputs: HashMap<NodeId, Vec<f64>>,
    outputs: HashMap<(NodeId, PortId), Vec<f64>>,
}

impl PortValues {
    pub fn new(inputs: HashMap<NodeId, Vec<f64>>) -> Self {
        PortValues {
            inputs,
            outputs: HashMap::new(),
        }
    }

    /// The value supplied for input node `node`.
    pub fn input(&self, node: NodeId) -> Result<&[f64], CoreError> {
        self.inputs
            .get(&node)
            .map(Vec::as_slice)
            .ok_or(CoreError::MissingInputValue { node })
    }

    /// Stores the computed values of `port`, checking their count.
    pub fn set(&mut self, port: &OutputPort, values: Vec<f64>) -> Result<(), CoreError> {
        if values.len() != port.size() as usize {
            return Err(CoreError::ValueSizeMismatch {
                node: port.node(),
                port: port.id(),
                expected: port.size() as usize,
                actual: values.len(),
            });
        }
        self.outputs.insert((port.node(), port.id()), values);
        Ok(())
    }

    /// The computed values of `port`, if it has been evaluated.
    pub fn get(&self, port: &OutputPort) -> Option<&[f64]> {
        self.outputs
            .get(&(port.node(), port.id()))
            .map(Vec::as_slice)
    }

    /// The computed value at a single element.
    pub fn element(&self, element: PortElement) -> Result<f64, CoreError> {
        let values = self
            .outputs
            .get(&(element.node, element.port))
            .ok_or(CoreError::PortNotFound {
                node: element.node,
                port: element.port,
            })?;
        values
            .get(element.index as usize)
            .copied()
            .ok_or(CoreError::ElementOutOfRange {
                node: element.node,
                port: element.port,
                start: element.index,
                end: element.index.saturating_add(1),
                size: values.len() as u32,
            })
    }

    /// Collects the values referenced by `elements`, in order.
    pub fn gather(&self, elements: &PortElements) -> Result<Vec<f64>, CoreError> {
        elements.iter().map(|e| self.element(e)).collect()
    }
}
