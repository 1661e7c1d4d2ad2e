//! Favorite cities for Skycast
//!
//! Keeps the user's ordered list of favorite cities in a single persisted
//! slot as a JSON array.

pub mod slot;
pub mod store;
pub mod types;

pub use slot::{FileSlots, MemorySlots, SlotError, SlotStorage};
pub use store::{FavoritesStore, FAVORITES_KEY};
pub use types::{normalize_name, FavoriteCity, WeatherSnapshot};
