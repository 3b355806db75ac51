// File: ./src/favorites.rs
//! The user's saved recipes.
//!
//! `FavoritesStore` is the single source of truth for "is this recipe saved".
//! It owns the collection, rehydrates it from its storage backend when opened,
//! and writes the whole collection back after every change. Nothing outside
//! the store keeps a mutable copy.
use crate::model::Recipe;
use crate::storage::{FavoritesStorage, FileStorage};

#[derive(Debug)]
pub struct FavoritesStore<S: FavoritesStorage = FileStorage> {
    favorites: Vec<Recipe>,
    storage: S,
    /// Set when rehydration failed. Saving would replace data we could not read.
    load_failed: bool,
}

impl<S: FavoritesStorage> FavoritesStore<S> {
    /// Opens the store and loads the persisted collection.
    ///
    /// A failed load is logged and leaves the store empty with persistence
    /// disabled, so an unreadable file is never overwritten.
    pub fn open(storage: S) -> Self {
        let (favorites, load_failed) = match storage.load() {
            Ok(loaded) => (dedup_by_id(loaded), false),
            Err(e) => {
                log::error!("Failed to load favorites, changes will not be saved: {:#}", e);
                (Vec::new(), true)
            }
        };
        log::debug!("Loaded {} favorite(s)", favorites.len());
        Self {
            favorites,
            storage,
            load_failed,
        }
    }

    /// Adds `recipe` unless an entry with the same id already exists.
    pub fn add_favorite(&mut self, recipe: Recipe) {
        if self.is_favorite(&recipe.id) {
            return;
        }
        log::debug!("Adding favorite {} ({})", recipe.id, recipe.name);
        self.favorites.push(recipe);
        self.persist();
    }

    /// Removes the entry with `id`, if any.
    pub fn remove_favorite(&mut self, id: &str) {
        let before = self.favorites.len();
        self.favorites.retain(|r| r.id != id);
        if self.favorites.len() != before {
            log::debug!("Removed favorite {}", id);
            self.persist();
        }
    }

    /// Removes `id` if saved; otherwise saves `recipe` when one is given.
    /// Without a payload there is nothing to save, so the call does nothing.
    pub fn toggle_favorite(&mut self, id: &str, recipe: Option<Recipe>) {
        if self.is_favorite(id) {
            self.remove_favorite(id);
        } else if let Some(recipe) = recipe {
            self.add_favorite(recipe);
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|r| r.id == id)
    }

    /// Saved recipes in the order they were added.
    pub fn favorites(&self) -> &[Recipe] {
        &self.favorites
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.favorites.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// False after a failed load.
    pub fn can_save(&self) -> bool {
        !self.load_failed
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        if self.load_failed {
            log::warn!("Favorites not saved: the stored collection could not be read");
            return;
        }
        if let Err(e) = self.storage.save(&self.favorites) {
            log::warn!("Failed to save favorites: {:#}", e);
        }
    }
}

fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut out: Vec<Recipe> = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        if !out.iter().any(|r| r.id == recipe.id) {
            out.push(recipe);
        }
    }
    out
}
