//! `SQLite` schema definitions for crewmates.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the crewmates table.
pub const CREATE_CREWMATES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS crewmates (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    speed INTEGER NOT NULL CHECK (speed BETWEEN 0 AND 100),
    color TEXT NOT NULL,
    category TEXT,
    success_metric TEXT,
    is_favorite INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `created_at` for ordered listing.
pub const CREATE_CREATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_crewmates_created_at ON crewmates(created_at DESC)
";

/// SQL statement to create an index on `color` for equality filtering.
pub const CREATE_COLOR_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_crewmates_color ON crewmates(color)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Column list shared by every crewmate query, in row-mapping order.
pub const CREWMATE_COLUMNS: &str =
    "id, name, speed, color, category, success_metric, is_favorite, created_at, updated_at";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CREWMATES_TABLE,
    CREATE_CREATED_AT_INDEX,
    CREATE_COLOR_INDEX,
    CREATE_METADATA_TABLE,
];
