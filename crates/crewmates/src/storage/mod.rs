//! Storage layer for crewmates.
//!
//! This module defines the [`CrewmateStore`] contract the rest of the crate
//! talks to, and a `SQLite`-backed implementation of it.

pub mod migrations;
pub mod schema;

use std::cell::Cell;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::crewmate::{Crewmate, CrewmateDraft, CrewmateId, CrewmatePatch};
use crate::error::{Error, Result};

use schema::CREWMATE_COLUMNS;

/// The data store contract.
///
/// Any failure surfaces as a generic "failed to ..." error; there is no
/// partial-failure reporting.
pub trait CrewmateStore {
    /// All crewmates, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list(&self) -> Result<Vec<Crewmate>>;

    /// A single crewmate, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, id: &CrewmateId) -> Result<Option<Crewmate>>;

    /// Create a crewmate, assigning its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn create(&self, draft: &CrewmateDraft) -> Result<Crewmate>;

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no crewmate has this id, or an error if
    /// the write fails.
    fn update(&self, id: &CrewmateId, patch: &CrewmatePatch) -> Result<Crewmate>;

    /// Delete one crewmate. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete(&self, id: &CrewmateId) -> Result<bool>;

    /// Delete every crewmate in `ids` atomically. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing is deleted in that case.
    fn delete_many(&self, ids: &[CrewmateId]) -> Result<usize>;

    /// Flip the favorite flag of a crewmate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no crewmate has this id.
    fn toggle_favorite(&self, id: &CrewmateId) -> Result<Crewmate> {
        let current = self.get(id)?.ok_or_else(|| Error::not_found(id.as_str()))?;
        self.update(id, &CrewmatePatch::favorite(!current.is_favorite))
    }
}

/// `SQLite` storage engine for crewmates.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Last creation timestamp handed out by this handle.
    last_created: Cell<Option<DateTime<Utc>>>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn,
            last_created: Cell::new(None),
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            last_created: Cell::new(None),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count stored crewmates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM crewmates", [], |row| row.get(0))
            .map_err(|e| Error::store("count crewmates", e))
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_crewmates = self.count()?;

        let (oldest, newest): (Option<String>, Option<String>) = self
            .conn
            .query_row(
                "SELECT MIN(created_at), MAX(created_at) FROM crewmates",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|e| Error::store("read statistics", e))?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_crewmates,
            oldest_crewmate: oldest.as_deref().and_then(parse_timestamp),
            newest_crewmate: newest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }

    /// Creation timestamps from one handle are strictly increasing, so
    /// creation order and `created_at` order agree.
    fn next_created_at(&self) -> DateTime<Utc> {
        let now = now_micros();
        let ts = match self.last_created.get() {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created.set(Some(ts));
        ts
    }

    fn query_by_id(&self, id: &CrewmateId) -> rusqlite::Result<Option<Crewmate>> {
        self.conn
            .query_row(
                &format!("SELECT {CREWMATE_COLUMNS} FROM crewmates WHERE id = ?1"),
                [id.as_str()],
                row_to_crewmate,
            )
            .optional()
    }

    fn write_all_fields(&self, crewmate: &Crewmate) -> rusqlite::Result<usize> {
        self.conn.execute(
            r"
            UPDATE crewmates
            SET name = ?2, speed = ?3, color = ?4, category = ?5,
                success_metric = ?6, is_favorite = ?7, updated_at = ?8
            WHERE id = ?1
            ",
            params![
                crewmate.id.as_str(),
                crewmate.name,
                crewmate.speed,
                crewmate.color,
                crewmate.category,
                crewmate.success_metric,
                crewmate.is_favorite,
                format_timestamp(crewmate.updated_at),
            ],
        )
    }
}

impl CrewmateStore for Storage {
    fn list(&self) -> Result<Vec<Crewmate>> {
        let op = "fetch crewmates";
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {CREWMATE_COLUMNS} FROM crewmates ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| Error::store(op, e))?;

        let crewmates = stmt
            .query_map([], row_to_crewmate)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::store(op, e))?;

        debug!("Fetched {} crewmates", crewmates.len());
        Ok(crewmates)
    }

    fn get(&self, id: &CrewmateId) -> Result<Option<Crewmate>> {
        self.query_by_id(id)
            .map_err(|e| Error::store("fetch crewmate", e))
    }

    fn create(&self, draft: &CrewmateDraft) -> Result<Crewmate> {
        let now = self.next_created_at();
        let crewmate = Crewmate {
            id: CrewmateId::generate(),
            name: draft.name.clone(),
            speed: draft.speed,
            color: draft.color.clone(),
            category: draft.category.clone(),
            success_metric: draft.success_metric.clone(),
            is_favorite: draft.is_favorite,
            created_at: now,
            updated_at: now,
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO crewmates ({CREWMATE_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                params![
                    crewmate.id.as_str(),
                    crewmate.name,
                    crewmate.speed,
                    crewmate.color,
                    crewmate.category,
                    crewmate.success_metric,
                    crewmate.is_favorite,
                    format_timestamp(crewmate.created_at),
                    format_timestamp(crewmate.updated_at),
                ],
            )
            .map_err(|e| Error::store("create crewmate", e))?;

        debug!("Created crewmate {} ({})", crewmate.id, crewmate.name);
        Ok(crewmate)
    }

    fn update(&self, id: &CrewmateId, patch: &CrewmatePatch) -> Result<Crewmate> {
        let op = "update crewmate";
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::store(op, e))?;

        let mut crewmate = self
            .query_by_id(id)
            .map_err(|e| Error::store(op, e))?
            .ok_or_else(|| Error::not_found(id.as_str()))?;

        patch.apply_to(&mut crewmate);
        crewmate.updated_at = now_micros().max(crewmate.created_at);

        self.write_all_fields(&crewmate)
            .map_err(|e| Error::store(op, e))?;
        tx.commit().map_err(|e| Error::store(op, e))?;

        debug!("Updated crewmate {}", crewmate.id);
        Ok(crewmate)
    }

    fn delete(&self, id: &CrewmateId) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM crewmates WHERE id = ?1", [id.as_str()])
            .map_err(|e| Error::store("delete crewmate", e))?;
        Ok(affected > 0)
    }

    fn delete_many(&self, ids: &[CrewmateId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let op = "delete crewmates";
        let placeholders = vec!["?"; ids.len()].join(", ");
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::store(op, e))?;
        let affected = tx
            .execute(
                &format!("DELETE FROM crewmates WHERE id IN ({placeholders})"),
                params_from_iter(ids.iter().map(CrewmateId::as_str)),
            )
            .map_err(|e| Error::store(op, e))?;
        tx.commit().map_err(|e| Error::store(op, e))?;

        info!("Deleted {} of {} requested crewmates", affected, ids.len());
        Ok(affected)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of crewmates stored.
    pub total_crewmates: i64,
    /// Creation time of the oldest crewmate.
    pub oldest_crewmate: Option<DateTime<Utc>>,
    /// Creation time of the newest crewmate.
    pub newest_crewmate: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// Current time at storage precision.
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamps are stored with fixed precision so text order is time order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Convert a database row to a Crewmate struct.
fn row_to_crewmate(row: &rusqlite::Row) -> rusqlite::Result<Crewmate> {
    let id: String = row.get(0)?;
    Ok(Crewmate {
        id: CrewmateId::from(id),
        name: row.get(1)?,
        speed: row.get(2)?,
        color: row.get(3)?,
        category: row.get(4)?,
        success_metric: row.get(5)?,
        is_favorite: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
        updated_at: timestamp_column(row, 8)?,
    })
}
