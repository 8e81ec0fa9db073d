//! Favorites: the user's working set of candidate dogs

use dogmatch_core::Dog;
use dogmatch_storage::{JsonStoreExt, KeyValueStore, StorageResult, keys};
use std::sync::Arc;
use tracing::{debug, warn};

/// Set of favorite dogs keyed by id, in insertion order
///
/// Full records are persisted under `favorites` so the set survives without
/// a re-fetch. Every mutation writes the whole set before returning; if the
/// write fails the in-memory set is left as it was.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    dogs: Vec<Dog>,
}

impl FavoritesStore {
    /// Create the store, hydrating from storage if a set was persisted
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let dogs = match storage.load_json::<Vec<Dog>>(keys::FAVORITES) {
            Ok(Some(dogs)) => dedup_by_id(dogs),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Ignoring unreadable persisted favorites: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} favorites", dogs.len());

        Self { storage, dogs }
    }

    /// Favorites in the order they were added
    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn ids(&self) -> Vec<String> {
        self.dogs.iter().map(|d| d.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.dogs.iter().any(|d| d.id == id)
    }

    /// Add `dog`; returns `false` if a dog with the same id is already present
    pub fn add(&mut self, dog: Dog) -> StorageResult<bool> {
        if self.is_favorite(&dog.id) {
            return Ok(false);
        }

        self.dogs.push(dog);
        if let Err(e) = self.persist() {
            self.dogs.pop();
            return Err(e);
        }
        Ok(true)
    }

    /// Remove the dog with `id`; returns `false` if it was not present
    pub fn remove(&mut self, id: &str) -> StorageResult<bool> {
        let Some(index) = self.dogs.iter().position(|d| d.id == id) else {
            return Ok(false);
        };

        let removed = self.dogs.remove(index);
        if let Err(e) = self.persist() {
            self.dogs.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Add `dog` if absent, remove it if present; returns whether it is now a favorite
    pub fn toggle(&mut self, dog: Dog) -> StorageResult<bool> {
        if self.is_favorite(&dog.id) {
            self.remove(&dog.id).map(|_| false)
        } else {
            self.add(dog).map(|_| true)
        }
    }

    /// Empty the set
    pub fn clear(&mut self) -> StorageResult<()> {
        let previous = std::mem::take(&mut self.dogs);
        if let Err(e) = self.persist() {
            self.dogs = previous;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> StorageResult<()> {
        self.storage.save_json(keys::FAVORITES, &self.dogs)
    }
}

fn dedup_by_id(dogs: Vec<Dog>) -> Vec<Dog> {
    let mut unique: Vec<Dog> = Vec::with_capacity(dogs.len());
    for dog in dogs {
        if !unique.iter().any(|d| d.id == dog.id) {
            unique.push(dog);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dog;
    use dogmatch_storage::{MemoryStore, StorageError};

    mockall::mock! {
        Storage {}

        impl KeyValueStore for Storage {
            fn get(&self, key: &str) -> StorageResult<Option<String>>;
            fn set(&self, key: &str, value: &str) -> StorageResult<()>;
            fn remove(&self, key: &str) -> StorageResult<()>;
        }
    }

    fn store() -> (FavoritesStore, MemoryStore) {
        let storage = MemoryStore::new();
        (FavoritesStore::new(Arc::new(storage.clone())), storage)
    }

    fn persisted(storage: &MemoryStore) -> Vec<Dog> {
        storage
            .load_json::<Vec<Dog>>(keys::FAVORITES)
            .unwrap()
            .unwrap_or_default()
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut favorites, storage) = store();

        assert!(favorites.add(dog("d1")).unwrap());
        assert!(!favorites.add(dog("d1")).unwrap());

        assert_eq!(favorites.len(), 1);
        assert_eq!(persisted(&storage).len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut favorites, storage) = store();
        favorites.add(dog("d1")).unwrap();

        assert!(!favorites.remove("d9").unwrap());
        assert_eq!(favorites.ids(), vec!["d1"]);
        assert_eq!(persisted(&storage), vec![dog("d1")]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (mut favorites, _) = store();
        favorites.add(dog("d3")).unwrap();
        favorites.add(dog("d1")).unwrap();
        favorites.add(dog("d2")).unwrap();
        favorites.remove("d1").unwrap();

        assert_eq!(favorites.ids(), vec!["d3", "d2"]);
    }

    #[test]
    fn test_membership_and_toggle() {
        let (mut favorites, _) = store();

        assert!(favorites.toggle(dog("d1")).unwrap());
        assert!(favorites.is_favorite("d1"));
        assert!(!favorites.toggle(dog("d1")).unwrap());
        assert!(!favorites.is_favorite("d1"));
    }

    #[test]
    fn test_clear_persists_empty_set() {
        let (mut favorites, storage) = store();
        favorites.add(dog("d1")).unwrap();
        favorites.add(dog("d2")).unwrap();

        favorites.clear().unwrap();
        assert!(favorites.is_empty());
        assert_eq!(storage.get(keys::FAVORITES).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_hydrates_from_storage() {
        let storage = MemoryStore::new();
        {
            let mut favorites = FavoritesStore::new(Arc::new(storage.clone()));
            favorites.add(dog("d1")).unwrap();
            favorites.add(dog("d2")).unwrap();
        }

        let favorites = FavoritesStore::new(Arc::new(storage));
        assert_eq!(favorites.dogs(), &[dog("d1"), dog("d2")]);
    }

    #[test]
    fn test_unreadable_storage_starts_empty() {
        let storage = MemoryStore::new();
        storage.set(keys::FAVORITES, "{\"oops\":").unwrap();

        let favorites = FavoritesStore::new(Arc::new(storage));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_persisted_duplicates_collapsed() {
        let storage = MemoryStore::new();
        storage
            .save_json(keys::FAVORITES, &vec![dog("d1"), dog("d1"), dog("d2")])
            .unwrap();

        let favorites = FavoritesStore::new(Arc::new(storage));
        assert_eq!(favorites.ids(), vec!["d1", "d2"]);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .times(1)
            .returning(|_, _| Err(StorageError::Serialization("disk full".to_string())));

        let mut favorites = FavoritesStore::new(Arc::new(storage));
        let result = favorites.add(dog("d1"));

        assert!(result.is_err());
        assert!(favorites.is_empty());
        assert!(!favorites.is_favorite("d1"));
    }
}
