//! SQL schema for the Marquee SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- One row per movie document. Comments are embedded, never stored apart
-- from their parent. owner_id is written once, on insert.
CREATE TABLE IF NOT EXISTS movies (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id      TEXT NOT NULL UNIQUE,
    owner_id      TEXT NOT NULL,
    name          TEXT NOT NULL,
    genre         TEXT NOT NULL DEFAULT '',
    is_pg_rated   INTEGER NOT NULL DEFAULT 0,
    comments_json TEXT NOT NULL DEFAULT '[]',
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS movies_owner_idx ON movies(owner_id);

PRAGMA user_version = 1;
";
