//! Identity memoization

use rustc_hash::FxHashMap;

use crate::object::ObjRef;

/// Per-call map from source references to their clones
///
/// Keyed by allocation address. The source handle is kept alongside its
/// clone so the address cannot be freed and reused while the table lives.
#[derive(Debug, Default)]
pub struct MemoizationTable {
    entries: FxHashMap<usize, (ObjRef, ObjRef)>,
}

impl MemoizationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone previously recorded for `source`
    pub fn get(&self, source: &ObjRef) -> Option<&ObjRef> {
        self.entries.get(&source.identity()).map(|(_, clone)| clone)
    }

    /// Record `source -> clone`, replacing any earlier entry
    pub fn insert(&mut self, source: &ObjRef, clone: &ObjRef) {
        self.entries
            .insert(source.identity(), (source.clone(), clone.clone()));
    }

    /// Check whether `source` has been recorded
    pub fn contains(&self, source: &ObjRef) -> bool {
        self.entries.contains_key(&source.identity())
    }

    /// Number of recorded references
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
