// Favorites - a persisted set of repositories keyed by id
use std::collections::HashSet;
use std::rc::Rc;

use ghexplorer_cache::CacheManager;
use tracing::info;

use crate::{models::Repository, Result};

/// Read-only "is this one starred?" capability.
///
/// The presentation layer renders markers through this and never needs to
/// know where the set lives.
pub trait FavoriteLookup {
    fn is_favorite(&self, id: u64) -> bool;
}

impl FavoriteLookup for HashSet<u64> {
    fn is_favorite(&self, id: u64) -> bool {
        self.contains(&id)
    }
}

/// Favorites kept in memory and written through to the cache when one is attached
pub struct Favorites {
    store: Option<Rc<CacheManager>>,
    items: Vec<Repository>,
    ids: HashSet<u64>,
}

impl Favorites {
    /// Nothing persisted; handy for tests and `--no-persist` style runs
    pub fn in_memory() -> Self {
        Self {
            store: None,
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Load previously saved favorites
    pub fn load(store: Rc<CacheManager>) -> Result<Self> {
        let items: Vec<Repository> = store.get_favorites()?;
        let ids = items.iter().map(|repo| repo.id).collect();
        Ok(Self {
            store: Some(store),
            items,
            ids,
        })
    }

    /// Returns false if it was already a favorite
    pub fn add(&mut self, repo: &Repository) -> Result<bool> {
        if self.ids.contains(&repo.id) {
            return Ok(false);
        }
        if let Some(store) = &self.store {
            store.add_favorite(repo.id, repo)?;
        }

        self.ids.insert(repo.id);
        self.items.push(repo.clone());
        info!("added {} to favorites", repo.full_name);
        Ok(true)
    }

    /// Returns false if the id was not a favorite
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        if !self.ids.contains(&id) {
            return Ok(false);
        }
        if let Some(store) = &self.store {
            store.remove_favorite(id)?;
        }

        self.ids.remove(&id);
        self.items.retain(|repo| repo.id != id);
        info!("removed {} from favorites", id);
        Ok(true)
    }

    /// Flip membership; returns whether it is a favorite afterwards
    pub fn toggle(&mut self, repo: &Repository) -> Result<bool> {
        if self.ids.contains(&repo.id) {
            self.remove(repo.id)?;
            Ok(false)
        } else {
            self.add(repo)?;
            Ok(true)
        }
    }

    /// Oldest first
    pub fn list(&self) -> &[Repository] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FavoriteLookup for Favorites {
    fn is_favorite(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }
}
