use std::collections::HashSet;

use parking_lot::Mutex;

use crate::store::StateDir;

const FAVORITES_KEY: &str = "favorite_movie_ids";

/// Persisted set of favorite movie ids. Both calls are synchronous and are
/// made from the update loop only.
pub trait FavoritesStore: Send + std::fmt::Debug {
    fn load(&self) -> HashSet<u64>;
    fn save(&self, ids: &HashSet<u64>);
}

/// Favorites kept as a sorted JSON array in the state directory
#[derive(Debug, Clone)]
pub struct JsonFavoritesStore {
    dir: StateDir,
}

impl JsonFavoritesStore {
    pub fn new(dir: StateDir) -> Self {
        Self { dir }
    }
}

impl FavoritesStore for JsonFavoritesStore {
    fn load(&self) -> HashSet<u64> {
        self.dir
            .read::<Vec<u64>>(FAVORITES_KEY)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    fn save(&self, ids: &HashSet<u64>) {
        let mut sorted: Vec<u64> = ids.iter().copied().collect();
        sorted.sort_unstable();
        if let Err(e) = self.dir.write(FAVORITES_KEY, &sorted) {
            tracing::warn!(error = %e, "failed to save favorites");
        }
    }
}

/// Process-local store, used when no data directory is available
#[derive(Debug, Default)]
pub struct MemoryFavoritesStore {
    ids: Mutex<HashSet<u64>>,
}

impl MemoryFavoritesStore {
    #[cfg(test)]
    pub fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
        }
    }
}

impl FavoritesStore for MemoryFavoritesStore {
    fn load(&self) -> HashSet<u64> {
        self.ids.lock().clone()
    }

    fn save(&self, ids: &HashSet<u64>) {
        *self.ids.lock() = ids.clone();
    }
}
