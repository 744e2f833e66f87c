//! SQL schema for the Vestor SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS investors (
    investor_id   TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,       -- ISO 8601 UTC; server-assigned
    name          TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    email         TEXT NOT NULL,       -- unique by convention, not constraint
    mobile        INTEGER NOT NULL,
    categories    TEXT NOT NULL DEFAULT '[]',  -- JSON array of tags
    photo_url     TEXT,
    password_hash TEXT NOT NULL,
    is_approved   INTEGER NOT NULL DEFAULT 0,
    is_active     INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS investors_email_idx ON investors(email);

PRAGMA user_version = 1;
";
