//! Read-only access to the gift catalog.
//!
//! The [`GiftCatalog`] trait yields every catalog item with its tags already
//! decoded. The ranker scans the whole catalog for each request, so
//! implementations load rows once and hand out borrowed items.

use crate::Gift;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{CatalogError, SqliteGiftCatalog};

/// Read-only catalog of gifts.
///
/// Items are yielded in a stable order; the ranker uses that order to break
/// score ties.
///
/// # Examples
///
/// ```rust
/// use giftwise_core::{Gift, GiftCatalog};
///
/// struct Shelf {
///     gifts: Vec<Gift>,
/// }
///
/// impl GiftCatalog for Shelf {
///     fn gifts(&self) -> Box<dyn Iterator<Item = &Gift> + Send + '_> {
///         Box::new(self.gifts.iter())
///     }
/// }
///
/// let shelf = Shelf { gifts: vec![Gift::new(1, "Scarf")] };
/// assert_eq!(shelf.gifts().count(), 1);
/// ```
pub trait GiftCatalog: Send + Sync {
    /// Iterate over every catalog item in scan order.
    fn gifts(&self) -> Box<dyn Iterator<Item = &Gift> + Send + '_>;
}

/// In-memory catalog holding items in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCatalog {
    gifts: Vec<Gift>,
}

impl MemoryCatalog {
    /// Create a catalog containing a single item.
    #[must_use]
    pub fn with_gift(gift: Gift) -> Self {
        Self::with_gifts(std::iter::once(gift))
    }

    /// Create a catalog from a collection of items.
    pub fn with_gifts<I>(gifts: I) -> Self
    where
        I: IntoIterator<Item = Gift>,
    {
        Self {
            gifts: gifts.into_iter().collect(),
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gifts.len()
    }

    /// Report whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gifts.is_empty()
    }
}

impl FromIterator<Gift> for MemoryCatalog {
    fn from_iter<I: IntoIterator<Item = Gift>>(iter: I) -> Self {
        Self::with_gifts(iter)
    }
}

impl GiftCatalog for MemoryCatalog {
    fn gifts(&self) -> Box<dyn Iterator<Item = &Gift> + Send + '_> {
        Box::new(self.gifts.iter())
    }
}
