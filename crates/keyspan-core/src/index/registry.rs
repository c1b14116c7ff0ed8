use crate::{error::ScanError, index::SortedIndex};
use derive_more::{Deref, DerefMut};
use std::{collections::BTreeMap, sync::Arc};

///
/// IndexRegistry
///
/// Name-keyed shared registry of live indexes. Lookup failure is how a
/// concurrently dropped index surfaces to scan opens.
///

#[derive(Default, Deref, DerefMut)]
pub struct IndexRegistry(BTreeMap<String, Arc<dyn SortedIndex>>);

impl IndexRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, index: Arc<dyn SortedIndex>) {
        self.0.insert(index.model().name.clone(), index);
    }

    pub fn try_get(&self, name: &str) -> Result<Arc<dyn SortedIndex>, ScanError> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| ScanError::index_unavailable(name))
    }
}

///
/// TESTS
///
