//! Model: the acyclic computation graph the transformer operates on.
//!
//! [`Model`] wraps a petgraph `StableGraph` whose node weights are boxed
//! [`Node`] trait objects and whose edges are [`DataEdge`]s derived from node
//! inputs. The graph is private; all mutations go through [`Model::add_node`],
//! which validates every input reference against producers already present.
//! Because a node can only reference nodes added before it, the data flow is
//! acyclic by construction.
//!
//! Traversal ([`Model::visit`]) runs Kahn's algorithm over the data edges,
//! always taking the lowest ready id, so producers are visited before
//! consumers and a model built in dependency order is visited in id order.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::edge::DataEdge;
use crate::error::CoreError;
use crate::id::{NodeId, PortId};
use crate::node::Node;
use crate::port::OutputPort;
use crate::values::PortValues;

/// An ordered, acyclic collection of nodes.
#[derive(Debug, Default)]
pub struct Model {
    graph: StableGraph<Box<dyn Node>, DataEdge, Directed, u32>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Adds a node built by `build`, which receives the id the node will get.
    ///
    /// Every input range must name an existing output port and stay within
    /// its bounds. Returns a reference to the stored node.
    pub fn add_node<N, F>(&mut self, build: F) -> Result<&N, CoreError>
    where
        N: Node,
        F: FnOnce(NodeId) -> N,
    {
        // Nodes are never removed, so the next index is the node count.
        let id = NodeId(self.graph.node_count() as u32);
        let node = build(id);
        if node.id() != id {
            return Err(CoreError::NodeIdMismatch {
                expected: id,
                found: node.id(),
            });
        }

        let mut edges = Vec::new();
        for (input_index, input) in node.inputs().into_iter().enumerate() {
            for range in input.ranges() {
                let port = self.output_port(range.node, range.port)?;
                range.check_bounds(port.size())?;
                edges.push((
                    range.node,
                    DataEdge {
                        source_port: range.port,
                        start: range.start,
                        len: range.len,
                        target_input: input_index as u16,
                    },
                ));
            }
        }

        let idx = self.graph.add_node(Box::new(node));
        debug_assert_eq!(NodeId::from(idx), id);
        for (source, edge) in edges {
            self.graph.add_edge(source.into(), idx, edge);
        }

        let stored: &dyn Node = &*self.graph[idx];
        stored
            .downcast_ref::<N>()
            .ok_or_else(|| CoreError::GraphInconsistency {
                reason: format!("node {} changed type on insertion", id),
            })
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&dyn Node> {
        let idx: NodeIndex<u32> = id.into();
        self.graph.node_weight(idx).map(|node| node.as_ref())
    }

    /// Looks up a node by id and downcasts it to `T`.
    pub fn node_as<T: Node>(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(|node| node.downcast_ref::<T>())
    }

    /// Looks up one output port of one node.
    pub fn output_port(&self, node: NodeId, port: PortId) -> Result<&OutputPort, CoreError> {
        let found = self.node(node).ok_or(CoreError::NodeNotFound { id: node })?;
        found
            .outputs()
            .into_iter()
            .find(|p| p.id() == port)
            .ok_or(CoreError::PortNotFound { node, port })
    }

    /// Iterates nodes in id order. Since inputs must exist before their
    /// consumers are added, this is also a dependency order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Node> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| self.graph[idx].as_ref())
    }

    /// Distinct producers feeding `id`, in id order.
    pub fn dependencies(&self, id: NodeId) -> Vec<NodeId> {
        let idx: NodeIndex<u32> = id.into();
        let producers: BTreeSet<NodeId> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| NodeId::from(edge.source()))
            .collect();
        producers.into_iter().collect()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of data edges (one per input range).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Sorts all nodes so that every producer precedes its consumers, using
    /// Kahn's algorithm.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CoreError> {
        let mut in_degree: HashMap<NodeIndex<u32>, usize> = HashMap::new();
        for idx in self.graph.node_indices() {
            in_degree.insert(
                idx,
                self.graph.edges_directed(idx, Direction::Incoming).count(),
            );
        }

        // Lowest ready id first, so a model built in dependency order is
        // visited in id order.
        let mut ready: BTreeSet<NodeIndex<u32>> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx] == 0)
            .collect();

        let mut sorted = Vec::with_capacity(self.graph.node_count());
        while let Some(idx) = ready.pop_first() {
            sorted.push(NodeId::from(idx));
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                if let Some(deg) = in_degree.get_mut(&edge.target()) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(edge.target());
                    }
                }
            }
        }

        if sorted.len() != self.graph.node_count() {
            return Err(CoreError::CycleDetected);
        }
        Ok(sorted)
    }

    /// Calls `f` on every node in dependency order, stopping at the first
    /// error.
    pub fn visit<E, F>(&self, mut f: F) -> Result<(), E>
    where
        E: From<CoreError>,
        F: FnMut(&dyn Node) -> Result<(), E>,
    {
        for id in self.topological_order()? {
            let node = self.node(id).ok_or(CoreError::NodeNotFound { id })?;
            f(node)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Evaluation
    // -----------------------------------------------------------------------

    /// Computes every output port given values for the input nodes.
    pub fn evaluate(&self, inputs: HashMap<NodeId, Vec<f64>>) -> Result<PortValues, CoreError> {
        let mut values = PortValues::new(inputs);
        self.visit(|node| node.compute(&mut values))?;
        Ok(values)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "n{} = {}(", node.id(), node.label())?;
            for (j, input) in node.inputs().into_iter().enumerate() {
                if j > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}", input)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
