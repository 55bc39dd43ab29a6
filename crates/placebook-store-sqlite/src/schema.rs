//! SQL schema for the Placebook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Provisioned by the auth service; read here only to resolve usernames.
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

-- created_by is a plain reference: a place may outlive its user row, in
-- which case the username resolves to NULL.
CREATE TABLE IF NOT EXISTS places (
    place_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL CHECK (length(name) > 0),
    description TEXT,
    location    TEXT NOT NULL CHECK (length(location) > 0),
    image       TEXT NOT NULL CHECK (length(image) > 0),
    category    TEXT NOT NULL CHECK (length(category) > 0),
    created_by  TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_at  TEXT NOT NULL    -- RFC 3339 UTC; refreshed on every write
);

CREATE INDEX IF NOT EXISTS places_category_idx ON places(category);
CREATE INDEX IF NOT EXISTS places_creator_idx  ON places(created_by);

PRAGMA user_version = 1;
";
