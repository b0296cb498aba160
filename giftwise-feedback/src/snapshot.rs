//! Offline feedback snapshots.
//!
//! A snapshot copies every recorded session profile and valid rating out of
//! the analytics database into a `feedback.bin` artefact. Loading it yields a
//! [`MemoryFeedbackStore`], so collaborative scoring can run without the live
//! database.
//!
//! The file starts with a header holding the `GWFB` magic and a format
//! version, followed by the `bincode` payload.

use std::io::{BufReader, BufWriter, Write};

use bincode::Options;
use camino::Utf8Path;
use giftwise_core::{MemoryFeedbackStore, Rating, RatingRecord, SessionProfile};
use giftwise_fs::{ensure_parent_dir, open_dir_and_file, open_utf8_file};
use log::{debug, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{FeedbackDbError, SnapshotError, bincode_options, store::open_read_only};

/// File identifier for feedback snapshots.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"GWFB";

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SnapshotHeader {
    magic: [u8; 4],
    version: u16,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotPayload {
    sessions: Vec<SessionProfile>,
    ratings: Vec<RatingRecord>,
}

/// Read every session profile and rating from the analytics database.
///
/// Ratings other than `+1` and `-1` never count towards a tally, so they are
/// skipped with a warning.
///
/// # Errors
/// Returns [`FeedbackDbError`] when the database cannot be opened or read.
pub fn export_feedback(db_path: &Utf8Path) -> Result<MemoryFeedbackStore, FeedbackDbError> {
    let connection = open_read_only(db_path)?;
    let sessions = read_sessions(&connection)?;
    let ratings = read_ratings(&connection)?;
    debug!(
        "exported {} session profiles and {} ratings from {db_path}",
        sessions.len(),
        ratings.len()
    );
    Ok(MemoryFeedbackStore::new(sessions, ratings))
}

/// Persist `store` to `output_path`, creating parent directories as needed.
/// Existing files are truncated.
///
/// # Errors
/// Returns [`SnapshotError`] when the file cannot be created or encoded.
pub fn write_snapshot(store: &MemoryFeedbackStore, output_path: &Utf8Path) -> Result<(), SnapshotError> {
    let io_error = |source| SnapshotError::Io {
        path: output_path.to_path_buf(),
        source,
    };
    ensure_parent_dir(output_path).map_err(|source| SnapshotError::CreateParent {
        path: output_path.to_path_buf(),
        source,
    })?;
    let (dir, file_name) = open_dir_and_file(output_path).map_err(io_error)?;
    let file = dir.create(&file_name).map_err(io_error)?;
    let mut writer = BufWriter::new(file);

    let encode_error = |source| SnapshotError::Encode {
        path: output_path.to_path_buf(),
        source,
    };
    let header = SnapshotHeader {
        magic: SNAPSHOT_MAGIC,
        version: SNAPSHOT_VERSION,
    };
    bincode_options()
        .serialize_into(&mut writer, &header)
        .map_err(encode_error)?;
    let payload = SnapshotPayload {
        sessions: store.sessions().to_vec(),
        ratings: store.ratings().to_vec(),
    };
    bincode_options()
        .serialize_into(&mut writer, &payload)
        .map_err(encode_error)?;

    writer.flush().map_err(io_error)?;
    let file = writer
        .into_inner()
        .map_err(|err| io_error(err.into_error()))?;
    file.sync_all().map_err(io_error)
}

/// Export the analytics database and persist the snapshot in one step.
///
/// Returns the exported store as well as writing it to disk.
///
/// # Errors
/// Propagates errors from [`export_feedback`] and [`write_snapshot`].
pub fn write_snapshot_file(
    db_path: &Utf8Path,
    output_path: &Utf8Path,
) -> Result<MemoryFeedbackStore, SnapshotError> {
    let store = export_feedback(db_path)?;
    write_snapshot(&store, output_path)?;
    Ok(store)
}

/// Load a snapshot written by [`write_snapshot`].
///
/// # Errors
/// Returns [`SnapshotError::InvalidMagic`] or
/// [`SnapshotError::UnsupportedVersion`] when the header does not match,
/// [`SnapshotError::Decode`] when the payload is corrupt and
/// [`SnapshotError::Io`] when the file cannot be opened.
pub fn load_snapshot(path: &Utf8Path) -> Result<MemoryFeedbackStore, SnapshotError> {
    let file = open_utf8_file(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let decode_error = |source| SnapshotError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let header: SnapshotHeader = bincode_options()
        .deserialize_from(&mut reader)
        .map_err(decode_error)?;
    if header.magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::InvalidMagic {
            expected: SNAPSHOT_MAGIC,
            found: header.magic,
        });
    }
    if header.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: header.version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let payload: SnapshotPayload = bincode_options()
        .deserialize_from(&mut reader)
        .map_err(decode_error)?;
    Ok(MemoryFeedbackStore::new(payload.sessions, payload.ratings))
}

fn read_sessions(connection: &Connection) -> Result<Vec<SessionProfile>, FeedbackDbError> {
    let mut statement = connection
        .prepare("SELECT session_id, gender, age, occasion FROM answers ORDER BY rowid")
        .map_err(|source| FeedbackDbError::Query {
            operation: "prepare session export",
            source,
        })?;
    let rows = statement
        .query_map([], |row| {
            Ok(SessionProfile {
                session_id: row.get(0)?,
                gender: row.get(1)?,
                age: row.get(2)?,
                occasion: row.get(3)?,
            })
        })
        .map_err(|source| FeedbackDbError::Query {
            operation: "session export",
            source,
        })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|source| FeedbackDbError::Query {
            operation: "read session row",
            source,
        })
}

fn read_ratings(connection: &Connection) -> Result<Vec<RatingRecord>, FeedbackDbError> {
    let mut statement = connection
        .prepare("SELECT session_id, gift_id, rating FROM ratings ORDER BY rowid")
        .map_err(|source| FeedbackDbError::Query {
            operation: "prepare rating export",
            source,
        })?;
    let rows = statement
        .query_map([], |row| {
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })
        .map_err(|source| FeedbackDbError::Query {
            operation: "rating export",
            source,
        })?;

    let mut ratings = Vec::new();
    for row in rows {
        let (session_id, gift_id, raw) = row.map_err(|source| FeedbackDbError::Query {
            operation: "read rating row",
            source,
        })?;
        match Rating::try_from(raw) {
            Ok(rating) => ratings.push(RatingRecord {
                session_id,
                gift_id,
                rating,
            }),
            Err(err) => warn!("skipping rating of gift {gift_id} in session {session_id}: {err}"),
        }
    }
    Ok(ratings)
}
