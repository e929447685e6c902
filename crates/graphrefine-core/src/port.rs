//! Output ports and the references nodes use to consume them.
//!
//! A node produces values through one or more [`OutputPort`]s. Consumers never
//! hold pointers to producers; they hold [`PortElements`], an ordered list of
//! [`PortRange`]s, each naming a contiguous slice of one output port. The
//! atomic unit of reference is a [`PortElement`]: one value slot of one port.
//!
//! All three reference types compare by value (node id, port id, index), so
//! they can key hash maps independently of where the model lives in memory.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::CoreError;
use crate::id::{NodeId, PortId};

/// A named production point on a node yielding `size` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPort {
    node: NodeId,
    id: PortId,
    name: &'static str,
    size: u32,
}

impl OutputPort {
    /// Conventional name for a node's only output.
    pub const DEFAULT_NAME: &'static str = "output";

    pub fn new(node: NodeId, id: PortId, name: &'static str, size: u32) -> Self {
        OutputPort {
            node,
            id,
            name,
            size,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of values this port produces.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The element at `index` on this port. Does not check bounds.
    pub fn element(&self, index: u32) -> PortElement {
        PortElement::new(self.node, self.id, index)
    }
}

/// One value slot of one output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortElement {
    pub node: NodeId,
    pub port: PortId,
    pub index: u32,
}

impl PortElement {
    pub fn new(node: NodeId, port: PortId, index: u32) -> Self {
        PortElement { node, port, index }
    }
}

impl fmt::Display for PortElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}.{}[{}]", self.node, self.port, self.index)
    }
}

/// A contiguous slice `start..start + len` of one output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    pub node: NodeId,
    pub port: PortId,
    pub start: u32,
    pub len: u32,
}

impl PortRange {
    pub fn new(node: NodeId, port: PortId, start: u32, len: u32) -> Self {
        PortRange {
            node,
            port,
            start,
            len,
        }
    }

    /// The range covering every value of `port`.
    pub fn whole(port: &OutputPort) -> Self {
        PortRange::new(port.node(), port.id(), 0, port.size())
    }

    /// One past the last index covered, saturating at `u32::MAX`.
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.len)
    }

    /// One past the last index covered, or `None` if that overflows `u32`.
    pub fn checked_end(&self) -> Option<u32> {
        self.start.checked_add(self.len)
    }

    /// Fails unless the whole range lies within a port of `size` values.
    pub fn check_bounds(&self, size: u32) -> Result<(), CoreError> {
        match self.checked_end() {
            Some(end) if end <= size => Ok(()),
            _ => Err(CoreError::ElementOutOfRange {
                node: self.node,
                port: self.port,
                start: self.start,
                end: self.end(),
                size,
            }),
        }
    }

    /// Returns `true` if `next` continues this range on the same port.
    fn is_continued_by(&self, next: &PortRange) -> bool {
        self.node == next.node && self.port == next.port && self.end() == next.start
    }
}

impl From<PortElement> for PortRange {
    fn from(element: PortElement) -> Self {
        PortRange::new(element.node, element.port, element.index, 1)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 1 {
            write!(f, "n{}.{}[{}]", self.node, self.port, self.start)
        } else {
            write!(f, "n{}.{}[{}..{}]", self.node, self.port, self.start, self.end())
        }
    }
}

/// An ordered sequence of port elements, stored as ranges.
///
/// Two `PortElements` that yield the same element sequence may differ in how
/// that sequence is split into ranges; [`consolidate`](Self::consolidate)
/// produces the minimal grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortElements {
    ranges: SmallVec<[PortRange; 2]>,
}

impl PortElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with room for `capacity` ranges.
    pub fn with_capacity(capacity: usize) -> Self {
        PortElements {
            ranges: SmallVec::with_capacity(capacity),
        }
    }

    pub fn from_range(range: PortRange) -> Self {
        let mut elements = Self::new();
        elements.append_range(range);
        elements
    }

    /// Total number of elements across all ranges.
    pub fn size(&self) -> usize {
        self.ranges.iter().map(|r| r.len as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the element at logical position `index`.
    pub fn element(&self, index: usize) -> Option<PortElement> {
        let mut remaining = index;
        for range in &self.ranges {
            let len = range.len as usize;
            if remaining < len {
                return Some(PortElement::new(
                    range.node,
                    range.port,
                    range.start + remaining as u32,
                ));
            }
            remaining -= len;
        }
        None
    }

    /// Iterates every element in order.
    pub fn iter(&self) -> impl Iterator<Item = PortElement> + '_ {
        self.ranges.iter().flat_map(|r| {
            (r.start..r.end()).map(move |index| PortElement::new(r.node, r.port, index))
        })
    }

    pub fn ranges(&self) -> &[PortRange] {
        &self.ranges
    }

    /// Reserves room for `additional` more ranges.
    pub fn reserve(&mut self, additional: usize) {
        self.ranges.reserve(additional);
    }

    /// Appends a single element as its own range.
    pub fn append(&mut self, element: PortElement) {
        self.ranges.push(element.into());
    }

    /// Appends a range. Empty ranges are dropped.
    pub fn append_range(&mut self, range: PortRange) {
        if range.len > 0 {
            self.ranges.push(range);
        }
    }

    /// Appends every range of `other`.
    pub fn extend(&mut self, other: &PortElements) {
        for range in &other.ranges {
            self.append_range(*range);
        }
    }

    /// Merges maximal runs of contiguous ranges on the same port into single
    /// ranges. The element sequence is unchanged.
    pub fn consolidate(&mut self) {
        let mut merged: SmallVec<[PortRange; 2]> = SmallVec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if last.is_continued_by(&range) => last.len += range.len,
                _ => merged.push(range),
            }
        }
        self.ranges = merged;
    }
}

impl From<&OutputPort> for PortElements {
    fn from(port: &OutputPort) -> Self {
        PortElements::from_range(PortRange::whole(port))
    }
}

impl From<PortElement> for PortElements {
    fn from(element: PortElement) -> Self {
        PortElements::from_range(element.into())
    }
}

impl FromIterator<PortElement> for PortElements {
    fn from_iter<I: IntoIterator<Item = PortElement>>(iter: I) -> Self {
        let mut elements = PortElements::new();
        for element in iter {
            elements.append(element);
        }
        elements
    }
}

impl fmt::Display for PortElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}
