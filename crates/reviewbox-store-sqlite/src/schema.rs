//! SQL schema for the reviewbox SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Reviews are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS reviews (
    review_id   TEXT PRIMARY KEY,     -- internal; never returned by list
    name        TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 100),
    rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    review      TEXT NOT NULL CHECK (length(review) BETWEEN 1 AND 1000),
    date        TEXT NOT NULL,        -- fixed-width RFC 3339 UTC; server-assigned
    approved    INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS reviews_date_idx ON reviews(date);

PRAGMA user_version = 1;
";
