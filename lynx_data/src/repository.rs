// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset lookup seam between storage and query execution.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use serde::{Deserialize, Serialize};

use crate::Dataset;

/// Identifier of a stored dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub u64);

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of datasets for the query layer.
///
/// Storage lifecycle belongs to the implementor. Readers receive shared handles and never
/// mutate the dataset behind them.
pub trait DatasetRepository {
    /// Returns the dataset stored under `id`.
    fn get(&self, id: DatasetId) -> Option<Arc<Dataset>>;

    /// Stores a dataset, returning the one it replaced.
    fn insert(&mut self, id: DatasetId, dataset: Dataset) -> Option<Arc<Dataset>>;

    /// Removes a dataset.
    fn remove(&mut self, id: DatasetId) -> Option<Arc<Dataset>>;

    /// Returns every stored id, sorted.
    fn ids(&self) -> Vec<DatasetId>;
}

/// A process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    datasets: HashMap<DatasetId, Arc<Dataset>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` is stored.
    pub fn contains(&self, id: DatasetId) -> bool {
        self.datasets.contains_key(&id)
    }
}

impl DatasetRepository for InMemoryRepository {
    fn get(&self, id: DatasetId) -> Option<Arc<Dataset>> {
        self.datasets.get(&id).cloned()
    }

    fn insert(&mut self, id: DatasetId, dataset: Dataset) -> Option<Arc<Dataset>> {
        match self.datasets.entry(id) {
            Entry::Occupied(mut e) => Some(e.insert(Arc::new(dataset))),
            Entry::Vacant(e) => {
                e.insert(Arc::new(dataset));
                None
            }
        }
    }

    fn remove(&mut self, id: DatasetId) -> Option<Arc<Dataset>> {
        self.datasets.remove(&id)
    }

    fn ids(&self) -> Vec<DatasetId> {
        let mut ids: Vec<DatasetId> = self.datasets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
