//! Deck builder: catalog + grid size -> shuffled board.

use tracing::debug;

use super::catalog::{CatalogError, SymbolCatalog, ThemeId};
use crate::core::{GameRng, GameState, GridSize, SymbolRef};

/// Builds shuffled, paired card layouts for one catalog and grid size.
///
/// Construction validates the catalog, so a `DeckBuilder` that exists can
/// always build.
///
/// ## Example
///
/// ```
/// use memory_pairs::core::{GameRng, GridSize};
/// use memory_pairs::deck::{DeckBuilder, SymbolCatalog};
///
/// let catalog = SymbolCatalog::letters();
/// let builder = DeckBuilder::new(&catalog, GridSize::Four).unwrap();
///
/// let state = builder.build(&mut GameRng::new(42));
/// assert_eq!(state.cards.len(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    theme: ThemeId,
    grid_size: GridSize,
    pairs: Vec<SymbolRef>,
}

impl DeckBuilder {
    /// Prepare a builder, failing if the catalog is too small.
    pub fn new(catalog: &SymbolCatalog, grid_size: GridSize) -> Result<Self, CatalogError> {
        let required = grid_size.pair_count();
        if catalog.len() < required {
            return Err(CatalogError::InsufficientSymbols {
                theme: catalog.theme().clone(),
                grid_size,
                required,
                available: catalog.len(),
            });
        }

        Ok(Self {
            theme: catalog.theme().clone(),
            grid_size,
            pairs: catalog.symbols()[..required].to_vec(),
        })
    }

    /// Board size this builder produces.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Theme this builder draws from.
    #[must_use]
    pub fn theme(&self) -> &ThemeId {
        &self.theme
    }

    /// The unshuffled layout: the chosen symbols, then the same list again.
    #[must_use]
    pub fn layout(&self) -> Vec<SymbolRef> {
        let mut values = Vec::with_capacity(self.pairs.len() * 2);
        values.extend_from_slice(&self.pairs);
        values.extend_from_slice(&self.pairs);
        values
    }

    /// Shuffle a fresh layout and lay it out as a new game.
    #[must_use]
    pub fn build(&self, rng: &mut GameRng) -> GameState {
        let mut values = self.layout();
        rng.shuffle(&mut values);

        debug!(
            theme = %self.theme,
            grid = %self.grid_size,
            seed = rng.seed(),
            "dealt new deck"
        );

        // Distinct catalog entries doubled: paired by construction.
        GameState::dealt(self.grid_size, self.theme.clone(), values)
    }
}
