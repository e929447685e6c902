//! Old-to-new port element correspondence.

use indexmap::IndexMap;

use crate::error::TransformError;
use crate::port::PortElement;

/// Maps elements of the model being read to their counterparts in the model
/// being built.
///
/// Iteration follows insertion order, which is the order outputs were
/// registered during the pass, so composed maps are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMap {
    entries: IndexMap<PortElement, PortElement>,
}

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The counterpart of `old`, if one has been registered.
    pub fn get(&self, old: &PortElement) -> Option<PortElement> {
        self.entries.get(old).copied()
    }

    pub fn contains(&self, old: &PortElement) -> bool {
        self.entries.contains_key(old)
    }

    /// Registers `new` as the counterpart of `old`. Each old element may be
    /// registered once.
    pub fn insert(&mut self, old: PortElement, new: PortElement) -> Result<(), TransformError> {
        if self.entries.contains_key(&old) {
            return Err(TransformError::DuplicateMapping { element: old });
        }
        self.entries.insert(old, new);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PortElement, &PortElement)> {
        self.entries.iter()
    }

    /// Chains this map (`a -> b`) with `next` (`b -> c`) into `a -> c`.
    ///
    /// Entries whose intermediate element has no counterpart in `next` are
    /// dropped.
    pub fn compose(&self, next: &ElementMap) -> ElementMap {
        let entries = self
            .entries
            .iter()
            .filter_map(|(old, mid)| next.get(mid).map(|new| (*old, new)))
            .collect();
        ElementMap { entries }
    }
}
