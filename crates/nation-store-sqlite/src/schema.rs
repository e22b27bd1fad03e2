//! SQL schema for the nation SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per nation; rows are upserted, never deleted.
CREATE TABLE IF NOT EXISTS nations (
    name        TEXT PRIMARY KEY,
    record_json TEXT NOT NULL   -- the record's JSON object, field order kept
);

PRAGMA user_version = 1;
";
