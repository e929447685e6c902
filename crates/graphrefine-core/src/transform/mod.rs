//! Copy and refine engine.
//!
//! [`ModelTransformer`] rebuilds a [`Model`](crate::model::Model) into a new
//! one by visiting every node in dependency order and letting the node
//! reproduce itself through the transformer. An [`ElementMap`] records, for
//! each output element of the old model, its counterpart in the new one, so
//! that consumers visited later can translate their inputs.
//!
//! - [`ModelTransformer::copy_model`]: one pass, structural clone.
//! - [`ModelTransformer::refine_model`]: repeated passes in which nodes may
//!   rewrite themselves into more primitive subgraphs, until a pass makes no
//!   progress or every node satisfies the [`TransformContext`] predicate.
//!   Exceeding [`TransformConfig::max_refinement_iterations`] is fatal.

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod element_map;
pub mod transformer;

pub use config::{TransformConfig, DEFAULT_MAX_REFINEMENT_ITERATIONS};
pub use context::TransformContext;
pub use diagnostics::find_uncompilable_nodes;
pub use element_map::ElementMap;
pub use transformer::ModelTransformer;
