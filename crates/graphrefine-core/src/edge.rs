//! Data flow edges of the model graph.
//!
//! Edges are derived from node inputs: one [`DataEdge`] per input range,
//! from the producing node to the consuming node. They exist so the model can
//! be traversed in dependency order with ordinary graph algorithms; the
//! authoritative wiring is still the consumer's [`PortElements`](crate::port::PortElements).

use serde::{Deserialize, Serialize};

use crate::id::PortId;

/// A data dependency: the target consumes `len` values of the source's
/// `source_port`, starting at `start`, through its `target_input`-th input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEdge {
    pub source_port: PortId,
    pub start: u32,
    pub len: u32,
    /// Which input of the target node this range belongs to.
    pub target_input: u16,
}
