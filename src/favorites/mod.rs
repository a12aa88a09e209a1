//! Favorites subsystem: a session-scoped cache of one principal's liked
//! recipes, kept in step with the `favorites` table.

pub mod edges;
pub mod store;

pub use edges::{EdgeError, FavoriteEdges, SeaOrmFavoriteEdges};
pub use store::{FavoritesStore, Notice, ToggleOutcome};

/// Recipe identifiers are opaque: static catalogue ids and crazy-recipe
/// uuids share the same column.
pub type RecipeId = String;
