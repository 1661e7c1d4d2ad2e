//! The favorites store: single owner of the `favorites` slot.
//!
//! Every mutation rewrites the whole list in one `set`. Read and write
//! failures never reach the caller: a slot that can't be read or parsed loads
//! as an empty list, and a failed write is logged while the in-memory list
//! keeps the change.

use crate::slot::SlotStorage;
use crate::types::{normalize_name, FavoriteCity, WeatherSnapshot};

/// Slot key holding the favorites JSON array.
pub const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesStore {
    slots: Box<dyn SlotStorage>,
    favorites: Vec<FavoriteCity>,
}

impl FavoritesStore {
    /// Open the store over `slots` and load the current list.
    pub fn open(slots: Box<dyn SlotStorage>) -> Self {
        let mut store = Self {
            slots,
            favorites: Vec::new(),
        };
        store.favorites = store.load();
        store
    }

    /// Read and parse the persisted list. Returns an empty list if the slot
    /// is absent, unreadable or malformed.
    pub fn load(&self) -> Vec<FavoriteCity> {
        let raw = match self.slots.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites: {}", e);
                return Vec::new();
            }
        };

        let parsed: Vec<FavoriteCity> = match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Ignoring malformed favorites: {}", e);
                return Vec::new();
            }
        };

        // Older writers didn't normalize names; keep the first of any duplicates
        let mut favorites: Vec<FavoriteCity> = Vec::with_capacity(parsed.len());
        for mut city in parsed {
            city.name = normalize_name(&city.name);
            if favorites.iter().any(|c| c.name == city.name) {
                tracing::debug!("Dropping duplicate favorite: {}", city.name);
                continue;
            }
            favorites.push(city);
        }
        favorites
    }

    /// Re-read the slot, discarding the in-memory list.
    pub fn reload(&mut self) {
        self.favorites = self.load();
    }

    pub fn list(&self) -> &[FavoriteCity] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FavoriteCity> {
        self.favorites.iter().find(|c| c.matches(name))
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|c| c.matches(name))
    }

    /// Remove `name` if present, otherwise append it with `snapshot`.
    /// Returns whether the city is a favorite afterwards.
    pub fn toggle(&mut self, name: &str, snapshot: WeatherSnapshot) -> bool {
        let now_favorite = if self.is_favorite(name) {
            self.favorites.retain(|c| !c.matches(name));
            false
        } else {
            self.favorites.push(FavoriteCity::new(name, snapshot));
            true
        };

        tracing::info!(
            "Favorite {} {}",
            normalize_name(name),
            if now_favorite { "added" } else { "removed" }
        );
        self.persist();
        now_favorite
    }

    /// Add `name`, or replace its snapshot in place if already present.
    pub fn upsert(&mut self, name: &str, snapshot: WeatherSnapshot) {
        let city = FavoriteCity::new(name, snapshot);
        match self.favorites.iter_mut().find(|c| c.matches(name)) {
            Some(existing) => *existing = city,
            None => self.favorites.push(city),
        }
        self.persist();
    }

    /// Remove `name`. Writes back even when nothing matched.
    pub fn remove(&mut self, name: &str) {
        self.favorites.retain(|c| !c.matches(name));
        self.persist();
    }

    /// Move the entry at `from` so it ends up at `to`.
    ///
    /// `to` is a position in the list after the entry has been taken out.
    /// Out-of-range indices leave the list untouched and return `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.favorites.len();
        if from >= len || to >= len {
            tracing::debug!("Ignoring reorder {} -> {} on {} favorites", from, to, len);
            return false;
        }

        let city = self.favorites.remove(from);
        self.favorites.insert(to, city);
        self.persist();
        true
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.favorites) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        if let Err(e) = self.slots.set(FAVORITES_KEY, &json) {
            tracing::warn!("Failed to save favorites: {}", e);
        }
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}
