//! Symbol catalogs and the theme registry.
//!
//! A `SymbolCatalog` is an ordered list of distinct card faces for one
//! theme. The deck builder always takes entries from the front, so the
//! order of a catalog decides which faces a small board uses.
//!
//! The `CatalogRegistry` stores every catalog a session can switch to. It
//! comes preloaded with the built-in themes and accepts custom ones (for
//! example asset paths).

use derive_more::Display;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{GridSize, SymbolRef};

/// Built-in theme: the letters A-Z. Big enough for 4x4 and 6x6 only.
pub const LETTERS: &str = "letters";

/// Built-in theme: A-Z followed by 0-9. Fits every grid size.
pub const ALPHANUMERIC: &str = "alphanumeric";

/// Built-in theme: animal emoji. Fits every grid size.
pub const ANIMALS: &str = "animals";

const ANIMAL_SYMBOLS: [&str; 36] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮",
    "🐷", "🐸", "🐵", "🦄", "🐝", "🦋", "🐌", "🐞", "🐢", "🐍", "🐙", "🦑",
    "🦐", "🦞", "🦀", "🐡", "🐠", "🐬", "🐳", "🦈", "🐊", "🦓", "🦒", "🦘",
];

/// Theme identifier: the key of a catalog in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemeId(pub String);

impl ThemeId {
    /// Create a new theme ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog problems that prevent building a deck.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CatalogError {
    /// No catalog is registered under this theme.
    #[display("Unknown theme {}", _0)]
    UnknownTheme(ThemeId),

    /// The catalog has fewer distinct symbols than the board has pairs.
    #[display(
        "Theme {} has {} symbols but a {} board needs {}",
        theme,
        available,
        grid_size,
        required
    )]
    InsufficientSymbols {
        /// Catalog theme.
        theme: ThemeId,
        /// Board that was requested.
        grid_size: GridSize,
        /// Pairs on that board.
        required: usize,
        /// Symbols in the catalog.
        available: usize,
    },

    /// A catalog lists the same symbol twice.
    #[display("Theme {} lists symbol {} more than once", theme, symbol)]
    DuplicateSymbol {
        /// Catalog theme.
        theme: ThemeId,
        /// Repeated entry.
        symbol: SymbolRef,
    },
}

impl std::error::Error for CatalogError {}

/// Ordered list of distinct symbols for one theme.
///
/// Deserialization goes through `SymbolCatalog::new`, so a catalog read
/// from data is held to the same distinctness rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct SymbolCatalog {
    theme: ThemeId,
    symbols: Vec<SymbolRef>,
}

/// Unchecked wire form of a `SymbolCatalog`.
#[derive(Deserialize)]
struct RawCatalog {
    theme: ThemeId,
    symbols: Vec<SymbolRef>,
}

impl TryFrom<RawCatalog> for SymbolCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Self::new(raw.theme, raw.symbols)
    }
}

impl SymbolCatalog {
    /// Create a catalog, rejecting repeated symbols.
    pub fn new<I, S>(theme: ThemeId, symbols: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<SymbolRef>,
    {
        let symbols: Vec<SymbolRef> = symbols.into_iter().map(Into::into).collect();

        let mut seen = FxHashSet::default();
        for symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(CatalogError::DuplicateSymbol {
                    theme,
                    symbol: symbol.clone(),
                });
            }
        }

        Ok(Self { theme, symbols })
    }

    /// The letters A-Z.
    #[must_use]
    pub fn letters() -> Self {
        Self {
            theme: ThemeId::new(LETTERS),
            symbols: ('A'..='Z').map(|c| SymbolRef::new(c.to_string())).collect(),
        }
    }

    /// The letters A-Z followed by the digits 0-9.
    #[must_use]
    pub fn alphanumeric() -> Self {
        Self {
            theme: ThemeId::new(ALPHANUMERIC),
            symbols: ('A'..='Z')
                .chain('0'..='9')
                .map(|c| SymbolRef::new(c.to_string()))
                .collect(),
        }
    }

    /// Animal emoji.
    #[must_use]
    pub fn animals() -> Self {
        Self {
            theme: ThemeId::new(ANIMALS),
            symbols: ANIMAL_SYMBOLS.iter().map(|&s| SymbolRef::from(s)).collect(),
        }
    }

    /// Theme of this catalog.
    #[must_use]
    pub fn theme(&self) -> &ThemeId {
        &self.theme
    }

    /// All symbols in catalog order.
    #[must_use]
    pub fn symbols(&self) -> &[SymbolRef] {
        &self.symbols
    }

    /// Number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Check if the catalog can fill a board of this size.
    #[must_use]
    pub fn supports(&self, grid_size: GridSize) -> bool {
        self.len() >= grid_size.pair_count()
    }
}

/// Registry of symbol catalogs by theme.
///
/// ## Example
///
/// ```
/// use memory_pairs::core::GridSize;
/// use memory_pairs::deck::{CatalogRegistry, SymbolCatalog, ThemeId};
///
/// let mut registry = CatalogRegistry::with_builtin();
///
/// let planets = SymbolCatalog::new(
///     ThemeId::new("planets"),
///     ["mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune"],
/// )
/// .unwrap();
/// registry.register(planets);
///
/// let found = registry.get(&ThemeId::new("planets")).unwrap();
/// assert!(found.supports(GridSize::Four));
/// assert!(!found.supports(GridSize::Six));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CatalogRegistry {
    catalogs: FxHashMap<ThemeId, SymbolCatalog>,
}

impl CatalogRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in themes.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(SymbolCatalog::letters());
        registry.register(SymbolCatalog::alphanumeric());
        registry.register(SymbolCatalog::animals());
        registry
    }

    /// Register a catalog, replacing any catalog with the same theme.
    ///
    /// Returns the replaced catalog, if any.
    pub fn register(&mut self, catalog: SymbolCatalog) -> Option<SymbolCatalog> {
        self.catalogs.insert(catalog.theme.clone(), catalog)
    }

    /// Get a catalog by theme.
    #[must_use]
    pub fn get(&self, theme: &ThemeId) -> Option<&SymbolCatalog> {
        self.catalogs.get(theme)
    }

    /// Get a catalog by theme, or `CatalogError::UnknownTheme`.
    pub fn require(&self, theme: &ThemeId) -> Result<&SymbolCatalog, CatalogError> {
        self.get(theme)
            .ok_or_else(|| CatalogError::UnknownTheme(theme.clone()))
    }

    /// Check if a theme is registered.
    #[must_use]
    pub fn contains(&self, theme: &ThemeId) -> bool {
        self.catalogs.contains_key(theme)
    }

    /// Get the number of registered catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Iterate over all catalogs.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolCatalog> {
        self.catalogs.values()
    }

    /// Themes that can fill a board of this size.
    pub fn supporting(&self, grid_size: GridSize) -> impl Iterator<Item = &ThemeId> {
        self.catalogs
            .values()
            .filter(move |c| c.supports(grid_size))
            .map(|c| &c.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sizes() {
        assert_eq!(SymbolCatalog::letters().len(), 26);
        assert_eq!(SymbolCatalog::alphanumeric().len(), 36);
        assert_eq!(SymbolCatalog::animals().len(), 36);
    }

    #[test]
    fn test_builtin_symbols_are_distinct() {
        for catalog in CatalogRegistry::with_builtin().iter() {
            let rebuilt = SymbolCatalog::new(catalog.theme().clone(), catalog.symbols().to_vec());
            assert!(rebuilt.is_ok(), "{} has duplicates", catalog.theme());
        }
    }

    #[test]
    fn test_letters_order() {
        let letters = SymbolCatalog::letters();
        assert_eq!(letters.symbols()[0], SymbolRef::from("A"));
        assert_eq!(letters.symbols()[25], SymbolRef::from("Z"));
    }

    #[test]
    fn test_supports() {
        let letters = SymbolCatalog::letters();
        assert!(letters.supports(GridSize::Four));
        assert!(letters.supports(GridSize::Six));
        assert!(!letters.supports(GridSize::Eight));

        assert!(SymbolCatalog::animals().supports(GridSize::Eight));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let err = SymbolCatalog::new(ThemeId::new("dup"), ["x", "y", "x"]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateSymbol {
                theme: ThemeId::new("dup"),
                symbol: SymbolRef::from("x"),
            }
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"{"theme":"dups","symbols":["x","x","y","y"]}"#;
        let err = serde_json::from_str::<SymbolCatalog>(json).unwrap_err();
        assert!(err.to_string().contains("lists symbol x more than once"));

        let catalog = SymbolCatalog::letters();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(serde_json::from_str::<SymbolCatalog>(&json).unwrap(), catalog);
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = CatalogRegistry::new();
        assert!(registry.is_empty());

        let catalog = SymbolCatalog::new(ThemeId::new("shapes"), ["circle", "square"]).unwrap();
        assert!(registry.register(catalog).is_none());

        assert!(registry.contains(&ThemeId::new("shapes")));
        assert_eq!(registry.get(&ThemeId::new("shapes")).unwrap().len(), 2);
        assert!(registry.get(&ThemeId::new("nope")).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CatalogRegistry::with_builtin();
        let custom = SymbolCatalog::new(ThemeId::new(LETTERS), ["a", "b"]).unwrap();

        let replaced = registry.register(custom).unwrap();
        assert_eq!(replaced.len(), 26);
        assert_eq!(registry.get(&ThemeId::new(LETTERS)).unwrap().len(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_require_unknown() {
        let registry = CatalogRegistry::with_builtin();
        let err = registry.require(&ThemeId::new("missing")).unwrap_err();
        assert_eq!(err, CatalogError::UnknownTheme(ThemeId::new("missing")));
    }

    #[test]
    fn test_supporting() {
        let registry = CatalogRegistry::with_builtin();

        let mut big: Vec<_> = registry
            .supporting(GridSize::Eight)
            .map(|t| t.as_str().to_string())
            .collect();
        big.sort();
        assert_eq!(big, vec![ALPHANUMERIC.to_string(), ANIMALS.to_string()]);
        assert_eq!(registry.supporting(GridSize::Four).count(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::InsufficientSymbols {
            theme: ThemeId::new(LETTERS),
            grid_size: GridSize::Eight,
            required: 32,
            available: 26,
        };
        assert_eq!(
            err.to_string(),
            "Theme letters has 26 symbols but a 8x8 board needs 32"
        );
    }
}
