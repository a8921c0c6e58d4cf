//! SQL schema for the fleet SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per named collection. The body is the whole collection as a JSON
-- array and is replaced wholesale on every save.
CREATE TABLE IF NOT EXISTS collections (
    name      TEXT PRIMARY KEY,   -- 'drivers' | 'vehicles' | ... | 'activity_history'
    body      TEXT NOT NULL,
    saved_at  TEXT NOT NULL       -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
