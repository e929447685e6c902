//! Tunables for the copy/refine engine.

use serde::{Deserialize, Serialize};

/// Default ceiling on refinement passes.
pub const DEFAULT_MAX_REFINEMENT_ITERATIONS: usize = 10;

/// Configuration for a [`ModelTransformer`](super::ModelTransformer).
///
/// Missing fields deserialize to their defaults, so a partial JSON object
/// such as `{}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Refinement fails with
    /// [`TransformError::NonConvergence`](crate::error::TransformError::NonConvergence)
    /// once this many passes have each rewritten at least one node.
    pub max_refinement_iterations: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            max_refinement_iterations: DEFAULT_MAX_REFINEMENT_ITERATIONS,
        }
    }
}
