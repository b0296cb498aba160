//! In-memory fixtures shared by unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{FeedbackError, FeedbackStore, Gift, RatingTally, RawTagColumns, SimilarityKey};

/// Error source used by [`FailingFeedbackStore`].
#[derive(Debug, Clone, Copy, Default, thiserror::Error)]
#[error("feedback backend unavailable")]
pub struct BackendUnavailable;

/// [`FeedbackStore`] whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingFeedbackStore;

impl FeedbackStore for FailingFeedbackStore {
    fn similar_sessions(&self, _key: &SimilarityKey) -> Result<Vec<u64>, FeedbackError> {
        Err(FeedbackError::backend("look up similar sessions", BackendUnavailable))
    }

    fn rating_tally(&self, _sessions: &[u64], _gift_id: u64) -> Result<RatingTally, FeedbackError> {
        Err(FeedbackError::backend("tally ratings", BackendUnavailable))
    }
}

/// [`FeedbackStore`] that counts how often it is queried.
///
/// Every similarity lookup returns the configured sessions and every tally
/// is empty.
#[derive(Debug, Default)]
pub struct CountingFeedbackStore {
    sessions: Vec<u64>,
    session_lookups: AtomicUsize,
    tally_lookups: AtomicUsize,
}

impl CountingFeedbackStore {
    /// Create a store that reports `sessions` as similar to any key.
    #[must_use]
    pub fn with_sessions(sessions: Vec<u64>) -> Self {
        Self {
            sessions,
            ..Self::default()
        }
    }

    /// Number of [`FeedbackStore::similar_sessions`] calls so far.
    #[must_use]
    pub fn session_lookups(&self) -> usize {
        self.session_lookups.load(Ordering::Relaxed)
    }

    /// Number of [`FeedbackStore::rating_tally`] calls so far.
    #[must_use]
    pub fn tally_lookups(&self) -> usize {
        self.tally_lookups.load(Ordering::Relaxed)
    }
}

impl FeedbackStore for CountingFeedbackStore {
    fn similar_sessions(&self, _key: &SimilarityKey) -> Result<Vec<u64>, FeedbackError> {
        self.session_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.sessions.clone())
    }

    fn rating_tally(&self, _sessions: &[u64], _gift_id: u64) -> Result<RatingTally, FeedbackError> {
        self.tally_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(RatingTally::default())
    }
}

/// Build a gift from raw tag columns.
#[must_use]
pub fn tagged_gift(id: u64, name: &str, tags: RawTagColumns<'_>) -> Gift {
    Gift::new(id, name).with_tags(tags)
}

/// A small catalog covering budget, audience and interest variety.
#[must_use]
pub fn sample_gifts() -> Vec<Gift> {
    vec![
        tagged_gift(
            1,
            "Wireless earbuds",
            RawTagColumns {
                budget: "budget_10000, budget_15000",
                gender: "gender_male, gender_female",
                age: "age_18_25, age_26_35",
                relationship: "relationship_friend, relationship_partner",
                occasion: "occasion_birthday, occasion_new_year",
                values: "gift_practical:1, gift_emotional:0.4, gift_experience:0, gift_daily_use:0.9, gift_aesthetic:0.5",
                interests: "interest_tech:1, interest_music:0.8",
            },
        )
        .with_price(12_990.0),
        tagged_gift(
            2,
            "Pottery workshop",
            RawTagColumns {
                budget: "budget_5000, budget_10000",
                gender: "gender_female, gender_male",
                age: "age_26_35, age_36_45",
                relationship: "relationship_friend, relationship_partner",
                occasion: "occasion_birthday",
                values: "gift_practical:0.1, gift_emotional:0.9, gift_experience:1, gift_daily_use:0, gift_aesthetic:0.7",
                interests: "interest_art:1, interest_diy:0.7",
            },
        )
        .with_price(6_500.0),
        tagged_gift(
            3,
            "Leather notebook",
            RawTagColumns {
                budget: "budget_2000, budget_5000",
                gender: "gender_male, gender_female",
                age: "age_18_25, age_26_35, age_36_45",
                relationship: "relationship_colleague, relationship_friend",
                occasion: "occasion_birthday, occasion_new_year",
                values: "gift_practical:0.8, gift_emotional:0.3, gift_experience:0, gift_daily_use:0.7, gift_aesthetic:0.8",
                interests: "interest_books:0.6, interest_travel:0.5",
            },
        )
        .with_price(2_400.0),
        tagged_gift(
            4,
            "Smart watch",
            RawTagColumns {
                budget: "budget_20000, budget_30000",
                gender: "gender_male",
                age: "age_26_35, age_36_45",
                relationship: "relationship_partner",
                occasion: "occasion_birthday",
                values: "gift_practical:1, gift_emotional:0.5, gift_experience:0, gift_daily_use:1, gift_aesthetic:0.6",
                interests: "interest_tech:1, interest_sport:0.9",
            },
        )
        .with_price(27_000.0),
    ]
}

/// Raw catalog row used to seed SQLite fixtures.
#[cfg(feature = "store-sqlite")]
#[derive(Debug, Clone, Default)]
pub struct CatalogRow<'a> {
    id: i64,
    name: &'a str,
    price: Option<f64>,
    description: Option<&'a str>,
    tags: Option<RawTagColumns<'a>>,
}

#[cfg(feature = "store-sqlite")]
impl<'a> CatalogRow<'a> {
    /// Start a row with empty tag columns.
    #[must_use]
    pub fn new(id: i64, name: &'a str) -> Self {
        Self {
            id,
            name,
            price: None,
            description: Some(""),
            tags: Some(RawTagColumns::default()),
        }
    }

    /// Set the price.
    #[must_use]
    pub const fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the description.
    #[must_use]
    pub const fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    /// Set the raw tag columns.
    #[must_use]
    pub const fn tags(mut self, tags: RawTagColumns<'a>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Store `NULL` in the description and every tag column.
    #[must_use]
    pub const fn null_tags(mut self) -> Self {
        self.description = None;
        self.tags = None;
        self
    }
}

/// Persist catalog rows to a fresh SQLite database at `path`.
///
/// # Errors
/// Returns the underlying `rusqlite` error when the database cannot be
/// written.
#[cfg(feature = "store-sqlite")]
pub fn write_catalog_database(
    path: &std::path::Path,
    rows: &[CatalogRow<'_>],
) -> Result<(), rusqlite::Error> {
    let mut connection = rusqlite::Connection::open(path)?;
    connection.execute_batch(
        "CREATE TABLE gifts (
            id INTEGER PRIMARY KEY,
            name TEXT,
            price REAL,
            description TEXT,
            budget_tags TEXT,
            gender_tags TEXT,
            age_tags TEXT,
            relationship_tags TEXT,
            occasion_tags TEXT,
            value_tags TEXT,
            interest_tags TEXT
        )",
    )?;
    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare(
            "INSERT INTO gifts (id, name, price, description, budget_tags, gender_tags, \
             age_tags, relationship_tags, occasion_tags, value_tags, interest_tags) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for row in rows {
            let tags = row.tags;
            statement.execute(rusqlite::params![
                row.id,
                row.name,
                row.price,
                row.description,
                tags.map(|t| t.budget),
                tags.map(|t| t.gender),
                tags.map(|t| t.age),
                tags.map(|t| t.relationship),
                tags.map(|t| t.occasion),
                tags.map(|t| t.values),
                tags.map(|t| t.interests),
            ])?;
        }
    }
    tx.commit()
}
