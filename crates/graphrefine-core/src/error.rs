//! Error types for graphrefine-core.
//!
//! Uses `thiserror` for structured, matchable error variants. [`CoreError`]
//! covers the model substrate (construction, traversal, evaluation);
//! [`TransformError`] covers the copy/refine engine and wraps `CoreError`.

use thiserror::Error;

use crate::id::{NodeId, PortId};
use crate::port::PortElement;

/// Errors produced while building, traversing, or evaluating a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A node id was not found in the model.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A node does not have the referenced output port.
    #[error("node {node} has no output port {port}")]
    PortNotFound { node: NodeId, port: PortId },

    /// A port reference reaches past the end of the port.
    #[error("element range {start}..{end} is out of bounds for port {node}.{port} of size {size}")]
    ElementOutOfRange {
        node: NodeId,
        port: PortId,
        start: u32,
        end: u32,
        size: u32,
    },

    /// A node builder produced a node carrying a different id than the one
    /// it was handed.
    #[error("node built with id {found}, expected {expected}")]
    NodeIdMismatch { expected: NodeId, found: NodeId },

    /// The data edges of the model do not form a DAG.
    #[error("cycle detected in model data flow")]
    CycleDetected,

    /// An input node was evaluated without a supplied value.
    #[error("no value supplied for input node {node}")]
    MissingInputValue { node: NodeId },

    /// A computed or supplied value does not match its port size.
    #[error("port {node}.{port} expects {expected} value(s), got {actual}")]
    ValueSizeMismatch {
        node: NodeId,
        port: PortId,
        expected: usize,
        actual: usize,
    },

    /// A node was constructed from inputs of incompatible sizes.
    #[error("input size mismatch: {reason}")]
    InputSizeMismatch { reason: String },

    /// An internal model invariant was violated.
    #[error("model inconsistency: {reason}")]
    GraphInconsistency { reason: String },
}

/// Errors produced by [`ModelTransformer`](crate::transform::ModelTransformer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A node tried to remap an element that has no counterpart yet. Either
    /// the dependency order was broken or a producer failed to register one
    /// of its outputs.
    #[error("element {element} not found in new model")]
    ElementNotFound { element: PortElement },

    /// Refinement did not reach a fixed point within the pass ceiling.
    #[error(
        "more than {iterations} refinement iterations, first uncompilable node: {}",
        .first_uncompilable.as_deref().unwrap_or("<none>")
    )]
    NonConvergence {
        iterations: usize,
        first_uncompilable: Option<String>,
    },

    /// An old element was mapped twice within a single pass.
    #[error("element {element} already has a counterpart in this pass")]
    DuplicateMapping { element: PortElement },

    /// A node registered an output against elements of a different size.
    #[error("output {node}.{port} has {expected} element(s), mapped to {actual}")]
    OutputSizeMismatch {
        node: NodeId,
        port: PortId,
        expected: usize,
        actual: usize,
    },

    /// A typed counterpart lookup found a node of another type.
    #[error("counterpart node {node} is a {found}, expected {expected}")]
    NodeTypeMismatch {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    /// A node without outputs cannot be traced into the new model.
    #[error("node {node} has no outputs to trace")]
    NoOutputs { node: NodeId },

    /// A copy or refine call was started from inside another one.
    #[error("a copy or refine call is already in progress on this transformer")]
    SessionActive,

    /// A model-level failure raised while building the new model.
    #[error(transparent)]
    Core(#[from] CoreError),
}
