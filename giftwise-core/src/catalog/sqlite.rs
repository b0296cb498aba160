//! SQLite-backed gift catalog.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;
use rusqlite::{Connection, OpenFlags, Row, types::ValueRef};
use thiserror::Error;

use crate::{Gift, RawTagColumns};

use super::GiftCatalog;

const SELECT_GIFTS: &str = "SELECT id, name, price, description, budget_tags, gender_tags, \
     age_tags, relationship_tags, occasion_tags, value_tags, interest_tags \
     FROM gifts ORDER BY id";

/// Error raised when loading the catalog database.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Opening the SQLite database failed.
    #[error("failed to open catalog database at {path}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a catalog query failed.
    #[error("failed to {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A gift identifier could not be represented as `u64`.
    #[error("gift id {gift_id} is outside the supported range")]
    GiftIdOutOfRange {
        /// Identifier read from SQLite.
        gift_id: i64,
    },
}

/// Gift catalog loaded from the `gifts` table of a SQLite database.
///
/// Rows are read once at open time, in `id` order, and their tag columns
/// decoded. Text columns are read leniently: `NULL` decodes as empty and
/// numbers or blobs as their text form. A `NULL` price reads as `0.0`.
pub struct SqliteGiftCatalog {
    gifts: Vec<Gift>,
}

impl fmt::Debug for SqliteGiftCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteGiftCatalog")
            .field("gifts", &self.gifts.len())
            .finish_non_exhaustive()
    }
}

impl SqliteGiftCatalog {
    /// Open the catalog database read-only and load every gift.
    ///
    /// # Errors
    /// Returns [`CatalogError`] when the database cannot be opened or read,
    /// or when a row carries a negative identifier.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| CatalogError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        let gifts = load_gifts(&connection)?;
        debug!("loaded {} gifts from {}", gifts.len(), path.display());
        Ok(Self { gifts })
    }

    /// Number of loaded gifts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gifts.len()
    }

    /// Report whether the catalog holds no gifts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gifts.is_empty()
    }
}

impl GiftCatalog for SqliteGiftCatalog {
    fn gifts(&self) -> Box<dyn Iterator<Item = &Gift> + Send + '_> {
        Box::new(self.gifts.iter())
    }
}

fn load_gifts(connection: &Connection) -> Result<Vec<Gift>, CatalogError> {
    let mut statement =
        connection
            .prepare(SELECT_GIFTS)
            .map_err(|source| CatalogError::Query {
                operation: "prepare catalog query",
                source,
            })?;
    let mut rows = statement.query([]).map_err(|source| CatalogError::Query {
        operation: "query catalog rows",
        source,
    })?;

    let mut gifts = Vec::new();
    loop {
        let row = rows.next().map_err(|source| CatalogError::Query {
            operation: "read catalog row",
            source,
        })?;
        let Some(row) = row else {
            break;
        };
        gifts.push(decode_row(row)?);
    }
    Ok(gifts)
}

fn decode_row(row: &Row<'_>) -> Result<Gift, CatalogError> {
    let read = |source| CatalogError::Query {
        operation: "decode catalog row",
        source,
    };
    let raw_id: i64 = row.get(0).map_err(read)?;
    let id = u64::try_from(raw_id).map_err(|_| CatalogError::GiftIdOutOfRange { gift_id: raw_id })?;
    let name = lenient_text(row, 1).map_err(read)?;
    let price: Option<f64> = row.get(2).map_err(read)?;
    let description = lenient_text(row, 3).map_err(read)?;

    let mut columns: [String; 7] = Default::default();
    for (offset, column) in columns.iter_mut().enumerate() {
        *column = lenient_text(row, offset + 4).map_err(read)?;
    }
    let [budget, gender, age, relationship, occasion, values, interests] = &columns;
    let raw = RawTagColumns {
        budget,
        gender,
        age,
        relationship,
        occasion,
        values,
        interests,
    };

    Ok(Gift::new(id, name)
        .with_price(price.unwrap_or(0.0))
        .with_description(description)
        .with_tags(raw))
}

fn lenient_text(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(index)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BudgetTier,
        test_support::{CatalogRow, write_catalog_database},
    };
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_db() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("gifts.db");
        (dir, path)
    }

    #[rstest]
    fn loads_rows_with_decoded_tags(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        let rows = [
            CatalogRow::new(2, "Board game")
                .price(3_500.0)
                .tags(RawTagColumns {
                    budget: "budget_2000, budget_5000",
                    interests: "interest_games:1",
                    ..RawTagColumns::default()
                }),
            CatalogRow::new(1, "Tea set"),
        ];
        write_catalog_database(&path, &rows).expect("write catalog");

        let catalog = SqliteGiftCatalog::open(&path).expect("open catalog");
        let gifts: Vec<_> = catalog.gifts().collect();
        assert_eq!(gifts.len(), 2);
        let game = gifts
            .iter()
            .find(|gift| gift.id == 2)
            .expect("board game row");
        assert_eq!(game.price, 3_500.0);
        assert!(game.tags.budget.contains(&BudgetTier::B5K));
        assert_eq!(game.tags.interests.get("interest_games"), 1.0);
    }

    #[rstest]
    fn null_columns_decode_as_empty(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        write_catalog_database(&path, &[CatalogRow::new(5, "Mystery box").null_tags()])
            .expect("write catalog");

        let catalog = SqliteGiftCatalog::open(&path).expect("open catalog");
        let gift = catalog.gifts().next().expect("one gift");
        assert_eq!(gift.price, 0.0);
        assert!(gift.description.is_empty());
        assert!(gift.tags.budget.is_empty());
        assert!(gift.tags.gender.is_empty());
    }

    #[rstest]
    fn null_name_decodes_as_empty(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        Connection::open(&path)
            .expect("create database")
            .execute_batch(
                "CREATE TABLE gifts (
                    id INTEGER PRIMARY KEY, name TEXT, price REAL, description TEXT,
                    budget_tags TEXT, gender_tags TEXT, age_tags TEXT,
                    relationship_tags TEXT, occasion_tags TEXT, value_tags TEXT,
                    interest_tags TEXT
                ) WITHOUT ROWID;
                INSERT INTO gifts (id, name, gender_tags) VALUES (2, NULL, 'gender_male');
                INSERT INTO gifts (id, name, gender_tags, interest_tags)
                    VALUES (1, 'Puzzle', 'gender_female', 7);",
            )
            .expect("write catalog");

        let catalog = SqliteGiftCatalog::open(&path).expect("open catalog");
        let gifts: Vec<_> = catalog.gifts().collect();
        let ids: Vec<u64> = gifts.iter().map(|gift| gift.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let unnamed = gifts.last().expect("unnamed gift");
        assert!(unnamed.name.is_empty());
        assert!(unnamed.tags.gender.contains("gender_male"));
        let puzzle = gifts.first().expect("puzzle");
        assert_eq!(puzzle.name, "Puzzle");
        assert!(puzzle.tags.interests.is_empty());
    }

    #[rstest]
    fn negative_ids_are_rejected(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        write_catalog_database(&path, &[CatalogRow::new(-3, "Broken")]).expect("write catalog");

        let error = SqliteGiftCatalog::open(&path).expect_err("negative id");
        assert!(matches!(error, CatalogError::GiftIdOutOfRange { gift_id: -3 }));
    }

    #[rstest]
    fn missing_database_fails_to_open(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        let error = SqliteGiftCatalog::open(&path).expect_err("no database file");
        assert!(matches!(error, CatalogError::OpenDatabase { .. }));
    }

    #[rstest]
    fn missing_table_is_a_query_error(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        Connection::open(&path)
            .expect("create database")
            .execute_batch("CREATE TABLE other (id INTEGER PRIMARY KEY)")
            .expect("create unrelated table");

        let error = SqliteGiftCatalog::open(&path).expect_err("no gifts table");
        assert!(matches!(error, CatalogError::Query { .. }));
    }
}
