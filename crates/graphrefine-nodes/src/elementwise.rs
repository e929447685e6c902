//! Shared rewrite for elementwise vector operations.

use graphrefine_core::{
    CoreError, ModelTransformer, Node, NodeId, OutputPort, PortElements, TransformError,
};

/// Replaces a vector operation with one scalar node per output element.
///
/// `inputs` are the old node's inputs; each is remapped, then `build` is
/// called once per index with the index-th element of every remapped input.
/// The old output is mapped, element by element, to the scalar outputs.
pub(crate) fn split_elementwise<N, F>(
    transformer: &mut ModelTransformer,
    output: &OutputPort,
    inputs: &[&PortElements],
    build: F,
) -> Result<(), TransformError>
where
    N: Node,
    F: Fn(NodeId, Vec<PortElements>) -> N,
{
    let remapped = inputs
        .iter()
        .map(|input| transformer.transform_port_elements(input))
        .collect::<Result<Vec<_>, _>>()?;

    let width = output.size() as usize;
    let mut scalars = PortElements::with_capacity(width);
    for index in 0..width {
        let operands = remapped
            .iter()
            .map(|input| {
                input.element(index).map(PortElements::from).ok_or_else(|| {
                    CoreError::InputSizeMismatch {
                        reason: format!(
                            "input of {} element(s) cannot feed element {} of {}.{}",
                            input.size(),
                            index,
                            output.node(),
                            output.id()
                        ),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let element = {
            let node = transformer.add_node(|id| build(id, operands))?;
            let port = node
                .outputs()
                .into_iter()
                .next()
                .ok_or(TransformError::NoOutputs { node: node.id() })?;
            port.element(0)
        };
        transformer.check_refined_node(element.node)?;
        scalars.append(element);
    }

    transformer.map_node_output(output, &scalars)
}
