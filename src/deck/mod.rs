//! Deck building: symbol catalogs, themes, and shuffled layouts.
//!
//! ## Flow
//!
//! 1. Look up the theme's `SymbolCatalog` in a `CatalogRegistry`
//! 2. `DeckBuilder::new` checks the catalog covers `grid²/2` pairs
//! 3. `DeckBuilder::build` doubles the first `grid²/2` symbols and
//!    Fisher-Yates shuffles them into a fresh `GameState`
//!
//! Catalog errors surface at step 2, before any game state is touched.

mod builder;
mod catalog;

pub use builder::DeckBuilder;
pub use catalog::{
    CatalogError, CatalogRegistry, SymbolCatalog, ThemeId, ALPHANUMERIC, ANIMALS, LETTERS,
};
