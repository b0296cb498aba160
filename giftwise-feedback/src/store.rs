//! `SQLite`-backed [`FeedbackStore`] reading the analytics database.

use std::{fmt, sync::Mutex};

use camino::{Utf8Path, Utf8PathBuf};
use giftwise_core::{FeedbackError, FeedbackStore, RatingTally, SimilarityKey};
use rusqlite::{Connection, OpenFlags, params, params_from_iter};

use crate::FeedbackDbError;

/// `SQLite` limits bound parameters per statement to 999 by default. Tally
/// queries bind the gift id alongside the session ids, so each chunk leaves
/// room for it.
const SQLITE_MAX_VARIABLE_NUMBER: usize = 999;
const SESSIONS_PER_CHUNK: usize = SQLITE_MAX_VARIABLE_NUMBER - 1;

/// Open the analytics database without write access.
pub(crate) fn open_read_only(path: &Utf8Path) -> Result<Connection, FeedbackDbError> {
    Connection::open_with_flags(path.as_std_path(), OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
        |source| FeedbackDbError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        },
    )
}

/// Read-only feedback store over the `answers` and `ratings` tables.
///
/// Similar sessions are those whose recorded gender, age band and occasion
/// equal the key. Tallies count `+1` and `-1` ratings; other values are
/// ignored.
///
/// The connection sits behind a mutex so the store can be shared between
/// threads. Queries run one at a time.
pub struct SqliteFeedbackStore {
    path: Utf8PathBuf,
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteFeedbackStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteFeedbackStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteFeedbackStore {
    /// Open the analytics database at `path`.
    ///
    /// # Errors
    /// Returns [`FeedbackDbError::OpenDatabase`] when the file is missing or
    /// is not a `SQLite` database, and [`FeedbackDbError::Query`] when the
    /// `answers` or `ratings` table cannot be read.
    pub fn open(path: &Utf8Path) -> Result<Self, FeedbackDbError> {
        let connection = open_read_only(path)?;
        ensure_tables(&connection)?;
        Ok(Self {
            path: path.to_path_buf(),
            connection: Mutex::new(connection),
        })
    }

    /// Location of the backing database.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn ensure_tables(connection: &Connection) -> Result<(), FeedbackDbError> {
    connection
        .prepare("SELECT session_id, gender, age, occasion FROM answers LIMIT 0")
        .map_err(|source| FeedbackDbError::Query {
            operation: "answers table",
            source,
        })?;
    connection
        .prepare("SELECT session_id, gift_id, rating FROM ratings LIMIT 0")
        .map_err(|source| FeedbackDbError::Query {
            operation: "ratings table",
            source,
        })?;
    Ok(())
}

impl FeedbackStore for SqliteFeedbackStore {
    fn similar_sessions(&self, key: &SimilarityKey) -> Result<Vec<u64>, FeedbackError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| FeedbackError::Poisoned {
                operation: "look up similar sessions",
            })?;
        query_similar_sessions(&connection, key)
            .map_err(|err| FeedbackError::backend("look up similar sessions", err))
    }

    fn rating_tally(&self, sessions: &[u64], gift_id: u64) -> Result<RatingTally, FeedbackError> {
        if sessions.is_empty() {
            return Ok(RatingTally::default());
        }
        let connection = self
            .connection
            .lock()
            .map_err(|_| FeedbackError::Poisoned {
                operation: "tally ratings",
            })?;
        let mut tally = RatingTally::default();
        for chunk in sessions.chunks(SESSIONS_PER_CHUNK) {
            let partial = query_tally_chunk(&connection, chunk, gift_id)
                .map_err(|err| FeedbackError::backend("tally ratings", err))?;
            tally.likes = tally.likes.saturating_add(partial.likes);
            tally.dislikes = tally.dislikes.saturating_add(partial.dislikes);
        }
        Ok(tally)
    }
}

fn query_similar_sessions(
    connection: &Connection,
    key: &SimilarityKey,
) -> Result<Vec<u64>, FeedbackDbError> {
    let mut statement = connection
        .prepare_cached(
            "SELECT session_id FROM answers
             WHERE gender = ?1 AND age = ?2 AND occasion = ?3
             ORDER BY session_id",
        )
        .map_err(|source| FeedbackDbError::Query {
            operation: "prepare similar session lookup",
            source,
        })?;
    let rows = statement
        .query_map(params![key.gender, key.age, key.occasion], |row| {
            row.get::<_, u64>(0)
        })
        .map_err(|source| FeedbackDbError::Query {
            operation: "similar sessions",
            source,
        })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|source| FeedbackDbError::Query {
            operation: "read similar session row",
            source,
        })
}

fn query_tally_chunk(
    connection: &Connection,
    sessions: &[u64],
    gift_id: u64,
) -> Result<RatingTally, FeedbackDbError> {
    let placeholders = vec!["?"; sessions.len()].join(", ");
    let query = format!(
        "SELECT
            COALESCE(SUM(CASE WHEN rating = 1 THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN rating = -1 THEN 1 ELSE 0 END), 0)
         FROM ratings
         WHERE gift_id = ? AND session_id IN ({placeholders})"
    );
    let mut statement =
        connection
            .prepare_cached(&query)
            .map_err(|source| FeedbackDbError::Query {
                operation: "prepare rating tally",
                source,
            })?;
    let parameters = std::iter::once(&gift_id).chain(sessions.iter());
    statement
        .query_row(params_from_iter(parameters), |row| {
            Ok(RatingTally::new(row.get(0)?, row.get(1)?))
        })
        .map_err(|source| FeedbackDbError::Query {
            operation: "rating tally",
            source,
        })
}
