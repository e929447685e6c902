//! Minimal node kinds for exercising the model and the transformer.

use std::any::Any;

use crate::error::{CoreError, TransformError};
use crate::id::{NodeId, PortId};
use crate::model::Model;
use crate::node::Node;
use crate::port::{OutputPort, PortElements};
use crate::transform::{ModelTransformer, TransformContext};
use crate::values::PortValues;

/// Fields shared by every single-input, single-output test node.
#[derive(Debug, Clone)]
struct Unary {
    id: NodeId,
    input: PortElements,
    output: OutputPort,
}

impl Unary {
    fn new(id: NodeId, input: PortElements) -> Self {
        let size = input.size() as u32;
        Unary {
            id,
            input,
            output: OutputPort::new(id, PortId(0), OutputPort::DEFAULT_NAME, size),
        }
    }

    fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
        let input = values.gather(&self.input)?;
        values.set(&self.output, input)
    }
}

macro_rules! unary_accessors {
    () => {
        fn id(&self) -> NodeId {
            self.base.id
        }

        fn inputs(&self) -> Vec<&PortElements> {
            vec![&self.base.input]
        }

        fn outputs(&self) -> Vec<&OutputPort> {
            vec![&self.base.output]
        }

        fn compute(&self, values: &mut PortValues) -> Result<(), CoreError> {
            self.base.compute(values)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    };
}

/// Copies its input through under a caller-chosen type name. Never rewrites.
#[derive(Debug, Clone)]
pub struct PassThroughNode {
    name: &'static str,
    base: Unary,
}

impl PassThroughNode {
    pub fn new(id: NodeId, name: &'static str, input: PortElements) -> Self {
        PassThroughNode {
            name,
            base: Unary::new(id, input),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.base.output
    }
}

impl Node for PassThroughNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        self.name
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        let name = self.name;
        let output = transformer
            .add_node(|id| PassThroughNode::new(id, name, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.base.output, &PortElements::from(&output))
    }
}

/// Rewrites itself into `Stage1 -> Stage2` pass-throughs when uncompilable.
#[derive(Debug, Clone)]
pub struct SplitNode {
    base: Unary,
}

impl SplitNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        SplitNode {
            base: Unary::new(id, input),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.base.output
    }
}

impl Node for SplitNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        "SplitNode"
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        let output = transformer
            .add_node(|id| SplitNode::new(id, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.base.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        if transformer.is_node_compilable(self) {
            self.copy(transformer)?;
            return Ok(false);
        }
        let input = transformer.transform_port_elements(&self.base.input)?;
        let first = transformer
            .add_node(|id| PassThroughNode::new(id, "Stage1", input))?
            .output()
            .clone();
        transformer.check_refined_node(first.node())?;
        let second = transformer
            .add_node(|id| PassThroughNode::new(id, "Stage2", PortElements::from(&first)))?
            .output()
            .clone();
        transformer.check_refined_node(second.node())?;
        transformer.map_node_output(&self.base.output, &PortElements::from(&second))?;
        Ok(true)
    }
}

/// Rewrites itself into a [`SplitNode`] when uncompilable.
#[derive(Debug, Clone)]
pub struct WrapperNode {
    base: Unary,
}

impl WrapperNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        WrapperNode {
            base: Unary::new(id, input),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.base.output
    }
}

impl Node for WrapperNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        "WrapperNode"
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        let output = transformer
            .add_node(|id| WrapperNode::new(id, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.base.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        if transformer.is_node_compilable(self) {
            self.copy(transformer)?;
            return Ok(false);
        }
        let input = transformer.transform_port_elements(&self.base.input)?;
        let split = transformer
            .add_node(|id| SplitNode::new(id, input))?
            .output()
            .clone();
        transformer.check_refined_node(split.node())?;
        transformer.map_node_output(&self.base.output, &PortElements::from(&split))?;
        Ok(true)
    }
}

/// Rewrites itself into another copy of itself on every pass.
#[derive(Debug, Clone)]
pub struct StubbornNode {
    base: Unary,
}

impl StubbornNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        StubbornNode {
            base: Unary::new(id, input),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.base.output
    }
}

impl Node for StubbornNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        "StubbornNode"
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        let output = transformer
            .add_node(|id| StubbornNode::new(id, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.base.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        self.copy(transformer)?;
        transformer.mark_uncompilable();
        Ok(true)
    }
}

/// Copies itself but never registers its output.
#[derive(Debug, Clone)]
pub struct ForgetfulNode {
    base: Unary,
}

impl ForgetfulNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        ForgetfulNode {
            base: Unary::new(id, input),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.base.output
    }
}

impl Node for ForgetfulNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        "ForgetfulNode"
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        transformer.add_node(|id| ForgetfulNode::new(id, input))?;
        Ok(())
    }
}

/// Always rewrites itself into an `Expanded` pass-through, whether or not the
/// context already accepts it.
#[derive(Debug, Clone)]
pub struct ExpandingNode {
    base: Unary,
}

impl ExpandingNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        ExpandingNode {
            base: Unary::new(id, input),
        }
    }

    pub fn output(&self) -> &OutputPort {
        &self.base.output
    }
}

impl Node for ExpandingNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        "ExpandingNode"
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        let output = transformer
            .add_node(|id| ExpandingNode::new(id, input))?
            .output()
            .clone();
        transformer.map_node_output(&self.base.output, &PortElements::from(&output))
    }

    fn refine(&self, transformer: &mut ModelTransformer) -> Result<bool, TransformError> {
        let input = transformer.transform_port_elements(&self.base.input)?;
        let expanded = transformer
            .add_node(|id| PassThroughNode::new(id, "Expanded", input))?
            .output()
            .clone();
        transformer.check_refined_node(expanded.node())?;
        transformer.map_node_output(&self.base.output, &PortElements::from(&expanded))?;
        Ok(true)
    }
}

/// Starts a nested copy from inside its own `copy`.
#[derive(Debug, Clone)]
pub struct NestingNode {
    base: Unary,
}

impl NestingNode {
    pub fn new(id: NodeId, input: PortElements) -> Self {
        NestingNode {
            base: Unary::new(id, input),
        }
    }
}

impl Node for NestingNode {
    unary_accessors!();

    fn type_name(&self) -> &'static str {
        "NestingNode"
    }

    fn copy(&self, transformer: &mut ModelTransformer) -> Result<(), TransformError> {
        transformer.copy_model(&Model::new(), &TransformContext::default())?;
        let input = transformer.transform_port_elements(&self.base.input)?;
        let output = transformer
            .add_node(|id| NestingNode::new(id, input))?
            .base
            .output
            .clone();
        transformer.map_node_output(&self.base.output, &PortElements::from(&output))
    }
}
