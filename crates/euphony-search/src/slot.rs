use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{SearchError, SearchResult};
use crate::index::{AnnIndex, Neighbor};

/// Holder for the live index.
///
/// Installing a new index swaps the shared pointer; the old forest is
/// never touched, so a reader that already took [`IndexSlot::current`]
/// finishes against the index it started with.
#[derive(Debug, Default)]
pub struct IndexSlot {
    current: RwLock<Option<Arc<AnnIndex>>>,
}

impl IndexSlot {
    /// An empty slot. Queries fail until an index is installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live index, returning the previous one.
    pub fn install(&self, index: AnnIndex) -> Option<Arc<AnnIndex>> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.replace(Arc::new(index))
    }

    /// The live index.
    ///
    /// # Errors
    /// Returns [`SearchError::IndexNotBuilt`] before the first install.
    pub fn current(&self) -> SearchResult<Arc<AnnIndex>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SearchError::IndexNotBuilt)
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.current().is_ok()
    }

    /// Query the live index. See [`AnnIndex::query`].
    ///
    /// # Errors
    /// Returns [`SearchError::IndexNotBuilt`] before the first install, or
    /// any error from the index itself.
    pub fn query(&self, ordinal: usize, k: usize) -> SearchResult<Vec<Neighbor>> {
        self.current()?.query(ordinal, k)
    }
}
