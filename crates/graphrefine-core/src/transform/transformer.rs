//! The transform session: working model, element map, active context, and
//! the copy/refine drivers.
//!
//! # Refinement loop
//!
//! Each pass reads the model produced by the previous pass (the source model
//! on the first pass), asks every node to [`refine`](Node::refine) itself
//! into a fresh working model, and records the pass's element map. Maps are
//! composed across passes so the session always translates elements of the
//! *source* model to the latest model.
//!
//! After a pass:
//! 1. no node rewrote itself: done, even if uncompilable nodes remain;
//! 2. otherwise the pass counts toward the ceiling, and reaching
//!    [`TransformConfig::max_refinement_iterations`] fails with
//!    [`TransformError::NonConvergence`];
//! 3. otherwise, if every node visited was compilable and no rewrite called
//!    [`ModelTransformer::mark_uncompilable`], done.
//!
//! The active context is installed for the duration of a call and reset to
//! the default on every exit path by [`SessionScope`].

use std::ops::{Deref, DerefMut};

use tracing::{debug, info, warn};

use crate::error::{CoreError, TransformError};
use crate::id::NodeId;
use crate::input_node::InputNode;
use crate::model::Model;
use crate::node::Node;
use crate::port::{OutputPort, PortElements};

use super::config::TransformConfig;
use super::context::TransformContext;
use super::diagnostics::find_uncompilable_nodes;
use super::element_map::ElementMap;

/// Rebuilds models by copying or refining them node by node.
///
/// Outside a [`copy_model`](Self::copy_model) or
/// [`refine_model`](Self::refine_model) call the context is the default one.
/// The element map of the last successful call is kept so callers can
/// translate source references into the returned model with
/// [`corresponding_outputs`](Self::corresponding_outputs).
#[derive(Debug, Default)]
pub struct ModelTransformer {
    config: TransformConfig,
    context: TransformContext,
    /// Model under construction during a call.
    model: Model,
    element_map: ElementMap,
    /// Cleared by any uncompilable node seen in the current pass.
    is_model_compilable: bool,
    /// Passes run by the last call.
    passes: usize,
    /// Set while a copy or refine call is running.
    in_session: bool,
}

impl ModelTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransformConfig) -> Self {
        ModelTransformer {
            config,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// The context of the call in progress, or the default one.
    pub fn context(&self) -> &TransformContext {
        &self.context
    }

    /// The model under construction.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn element_map(&self) -> &ElementMap {
        &self.element_map
    }

    /// Number of passes the last copy or refine call ran.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Whether the pass in progress (or the last pass) saw only compilable
    /// nodes.
    pub fn is_model_compilable(&self) -> bool {
        self.is_model_compilable
    }

    // -----------------------------------------------------------------------
    // Top-level operations
    // -----------------------------------------------------------------------

    /// Produces a structural clone of `old`.
    pub fn copy_model(
        &mut self,
        old: &Model,
        context: &TransformContext,
    ) -> Result<Model, TransformError> {
        let mut session = SessionScope::enter(self, context)?;
        old.visit(|node| node.copy(&mut session))?;
        session.passes = 1;

        let model = std::mem::take(&mut session.model);
        session.commit();
        info!(nodes = model.node_count(), "copied model");
        Ok(model)
    }

    /// Refines `old` until no node rewrites itself, every node is compilable
    /// under `context`, or the pass ceiling is reached.
    pub fn refine_model(
        &mut self,
        old: &Model,
        context: &TransformContext,
    ) -> Result<Model, TransformError> {
        let max_iterations = self.config.max_refinement_iterations;
        let mut session = SessionScope::enter(self, context)?;

        let mut previous: Option<Model> = None;
        let mut iteration = 0usize;
        let refined = loop {
            let current_model = previous.take();
            let current = current_model.as_ref().unwrap_or(old);

            let prior_map = std::mem::take(&mut session.element_map);
            session.model = Model::new();
            session.is_model_compilable = true;

            let mut did_refine_any = false;
            current.visit(|node| -> Result<(), TransformError> {
                if !session.context.is_node_compilable(node) {
                    session.is_model_compilable = false;
                }
                did_refine_any |= node.refine(&mut session)?;
                Ok(())
            })?;
            session.passes = iteration + 1;

            if iteration > 0 {
                session.element_map = prior_map.compose(&session.element_map);
            }
            let produced = std::mem::take(&mut session.model);
            debug!(
                pass = iteration + 1,
                nodes_before = current.node_count(),
                nodes_after = produced.node_count(),
                did_refine_any,
                compilable = session.is_model_compilable,
                "refinement pass complete"
            );

            if !did_refine_any {
                break produced;
            }

            iteration += 1;
            if iteration >= max_iterations {
                let first_uncompilable = find_uncompilable_nodes(current, context)
                    .first()
                    .map(|node| node.type_name().to_string());
                warn!(
                    iterations = max_iterations,
                    first_uncompilable = first_uncompilable.as_deref().unwrap_or("<none>"),
                    "refinement did not converge"
                );
                return Err(TransformError::NonConvergence {
                    iterations: max_iterations,
                    first_uncompilable,
                });
            }

            if session.is_model_compilable {
                break produced;
            }
            previous = Some(produced);
        };

        session.commit();
        info!(
            passes = session.passes,
            nodes = refined.node_count(),
            "refined model"
        );
        Ok(refined)
    }

    /// Nodes of `model` that `context` rejects, in model order.
    pub fn find_uncompilable_nodes<'m>(
        &self,
        model: &'m Model,
        context: &TransformContext,
    ) -> Vec<&'m dyn Node> {
        find_uncompilable_nodes(model, context)
    }

    // -----------------------------------------------------------------------
    // Remapping protocol
    // -----------------------------------------------------------------------

    /// Translates old elements into their counterparts in the new model,
    /// preserving order and length, then consolidates contiguous runs.
    pub fn transform_port_elements(
        &self,
        elements: &PortElements,
    ) -> Result<PortElements, TransformError> {
        let mut result = PortElements::with_capacity(elements.size());
        for old in elements.iter() {
            let new = self
                .element_map
                .get(&old)
                .ok_or(TransformError::ElementNotFound { element: old })?;
            result.append(new);
        }
        result.consolidate();
        Ok(result)
    }

    /// Counterparts of every element of `port`.
    pub fn corresponding_outputs(&self, port: &OutputPort) -> Result<PortElements, TransformError> {
        self.transform_port_elements(&PortElements::from(port))
    }

    /// Counterparts of `elements`.
    pub fn corresponding_elements(
        &self,
        elements: &PortElements,
    ) -> Result<PortElements, TransformError> {
        self.transform_port_elements(elements)
    }

    /// The node in the new model producing the counterpart of `old`'s first
    /// output element, downcast to `T`.
    pub fn corresponding_node_as<T: Node>(&self, old: &dyn Node) -> Result<&T, TransformError> {
        let port = old
            .outputs()
            .into_iter()
            .find(|port| port.size() > 0)
            .ok_or(TransformError::NoOutputs { node: old.id() })?;
        let element = port.element(0);
        let new = self
            .element_map
            .get(&element)
            .ok_or(TransformError::ElementNotFound { element })?;
        let node = self
            .model
            .node(new.node)
            .ok_or(CoreError::NodeNotFound { id: new.node })?;
        node.downcast_ref::<T>()
            .ok_or(TransformError::NodeTypeMismatch {
                node: new.node,
                expected: std::any::type_name::<T>(),
                found: node.type_name(),
            })
    }

    /// The counterpart of an input node.
    pub fn corresponding_input_node(&self, old: &InputNode) -> Result<&InputNode, TransformError> {
        self.corresponding_node_as::<InputNode>(old)
    }

    // -----------------------------------------------------------------------
    // Building the new model
    // -----------------------------------------------------------------------

    /// Adds a node to the model under construction.
    pub fn add_node<N, F>(&mut self, build: F) -> Result<&N, TransformError>
    where
        N: Node,
        F: FnOnce(NodeId) -> N,
    {
        Ok(self.model.add_node(build)?)
    }

    /// Registers element `i` of `new` as the counterpart of element `i` of
    /// the old port. `new` must reference the model under construction.
    pub fn map_node_output(
        &mut self,
        old: &OutputPort,
        new: &PortElements,
    ) -> Result<(), TransformError> {
        if new.size() != old.size() as usize {
            return Err(TransformError::OutputSizeMismatch {
                node: old.node(),
                port: old.id(),
                expected: old.size() as usize,
                actual: new.size(),
            });
        }
        for range in new.ranges() {
            let port = self.model.output_port(range.node, range.port)?;
            range.check_bounds(port.size())?;
        }
        for (index, element) in new.iter().enumerate() {
            self.element_map.insert(old.element(index as u32), element)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Compilability
    // -----------------------------------------------------------------------

    /// Applies the active context's predicate.
    pub fn is_node_compilable(&self, node: &dyn Node) -> bool {
        self.context.is_node_compilable(node)
    }

    /// Records that the current pass produced a node that still needs
    /// refining, so another pass is attempted.
    pub fn mark_uncompilable(&mut self) {
        self.is_model_compilable = false;
    }

    /// Checks a node just added to the new model against the active context,
    /// marking the pass uncompilable if it fails. Returns the verdict.
    pub fn check_refined_node(&mut self, id: NodeId) -> Result<bool, TransformError> {
        let node = self.model.node(id).ok_or(CoreError::NodeNotFound { id })?;
        let compilable = self.context.is_node_compilable(node);
        if !compilable {
            self.mark_uncompilable();
        }
        Ok(compilable)
    }
}

/// Installs a context and a fresh working model on a transformer for the
/// duration of one top-level call.
///
/// Dropping the scope restores the default context and discards the working
/// model. Unless [`commit`](Self::commit) was called, the element map is
/// discarded too, so a failed call leaves nothing half-built behind.
struct SessionScope<'a> {
    transformer: &'a mut ModelTransformer,
    committed: bool,
}

impl<'a> SessionScope<'a> {
    fn enter(
        transformer: &'a mut ModelTransformer,
        context: &TransformContext,
    ) -> Result<Self, TransformError> {
        if transformer.in_session {
            return Err(TransformError::SessionActive);
        }
        transformer.in_session = true;
        transformer.context = context.clone();
        transformer.model = Model::new();
        transformer.element_map.clear();
        transformer.is_model_compilable = true;
        transformer.passes = 0;
        Ok(SessionScope {
            transformer,
            committed: false,
        })
    }

    fn commit(&mut self) {
        self.committed = true;
    }
}

impl Deref for SessionScope<'_> {
    type Target = ModelTransformer;

    fn deref(&self) -> &ModelTransformer {
        self.transformer
    }
}

impl DerefMut for SessionScope<'_> {
    fn deref_mut(&mut self) -> &mut ModelTransformer {
        self.transformer
    }
}

impl Drop for SessionScope<'_> {
    fn drop(&mut self) {
        self.transformer.in_session = false;
        self.transformer.context = TransformContext::default();
        self.transformer.model = Model::new();
        if !self.committed {
            self.transformer.element_map.clear();
        }
    }
}
