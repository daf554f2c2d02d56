use super::class::ClassStatistics;
use crate::loader::{LoadError, StatisticsLoader};
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Reference statistics for every known class, keyed by class id.
///
/// Built once and treated as read-only afterwards. Runtime reloads go through
/// [`SharedStore`], which swaps whole snapshots.
#[derive(Clone, Debug, Default)]
pub struct ReferenceStatisticsStore {
    classes: HashMap<String, ClassStatistics>,
}

impl ReferenceStatisticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class, replacing any previous entry with the same id.
    pub fn insert(&mut self, class: ClassStatistics) -> Option<ClassStatistics> {
        self.classes.insert(class.class_id.clone(), class)
    }

    pub fn get(&self, class_id: &str) -> Option<&ClassStatistics> {
        self.classes.get(class_id)
    }

    pub fn contains(&self, class_id: &str) -> bool {
        self.classes.contains_key(class_id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class ids in unspecified order.
    pub fn class_ids(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassStatistics> {
        self.classes.values()
    }
}

impl From<HashMap<String, ClassStatistics>> for ReferenceStatisticsStore {
    fn from(classes: HashMap<String, ClassStatistics>) -> Self {
        Self { classes }
    }
}

impl FromIterator<ClassStatistics> for ReferenceStatisticsStore {
    fn from_iter<I: IntoIterator<Item = ClassStatistics>>(iter: I) -> Self {
        let mut store = Self::new();
        for class in iter {
            store.insert(class);
        }
        store
    }
}

/// Holder of the current store snapshot.
///
/// Readers take an `Arc` snapshot and keep scoring against it; writers build a
/// complete new store and publish it in one swap, so a partially loaded class
/// is never observable.
#[derive(Debug, Default)]
pub struct SharedStore {
    current: RwLock<Arc<ReferenceStatisticsStore>>,
}

impl SharedStore {
    pub fn new(store: ReferenceStatisticsStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ReferenceStatisticsStore> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Replace the current snapshot, returning the previous one.
    pub fn publish(&self, store: ReferenceStatisticsStore) -> Arc<ReferenceStatisticsStore> {
        let next = Arc::new(store);
        info!("SharedStore::publish classes={}", next.len());
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Load a complete store from `loader` and publish it. The current
    /// snapshot stays in place when loading fails.
    pub fn reload(&self, loader: &StatisticsLoader) -> Result<usize, LoadError> {
        let store = loader.load_store()?;
        let classes = store.len();
        self.publish(store);
        Ok(classes)
    }
}
