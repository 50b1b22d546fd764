//! Source-id to element memo table.

use std::collections::HashMap;

use crate::biopax::ElementId;

/// Remembers which element was built for which source db id, so an entity
/// reachable from several parents is materialized once per run.
#[derive(Debug, Clone, Default)]
pub struct ObjectCache {
    entries: HashMap<i64, ElementId>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_key: i64) -> Option<ElementId> {
        self.entries.get(&source_key).copied()
    }

    /// Register `element` for `source_key`. The first registration wins.
    pub fn insert(&mut self, source_key: i64, element: ElementId) {
        self.entries.entry(source_key).or_insert(element);
    }

    /// Return the cached element, or build one with `factory` and remember it.
    /// The factory is not invoked on a hit.
    pub fn get_or_create<E>(
        &mut self,
        source_key: i64,
        factory: impl FnOnce() -> Result<ElementId, E>,
    ) -> Result<ElementId, E> {
        if let Some(hit) = self.get(source_key) {
            return Ok(hit);
        }
        let created = factory()?;
        self.entries.insert(source_key, created);
        Ok(created)
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
}
