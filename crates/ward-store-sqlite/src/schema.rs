//! SQL schema for the Ward SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT guarantees an account_id is never handed out twice, even
-- after the row holding it is deleted.
CREATE TABLE IF NOT EXISTS accounts (
    account_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    email        TEXT UNIQUE,           -- NULLs never collide
    reg_no       TEXT NOT NULL UNIQUE,  -- login identifier
    phone        TEXT NOT NULL UNIQUE,
    gender       TEXT CHECK (gender IN ('Male', 'Female')),
    active       INTEGER NOT NULL DEFAULT 1,
    staff        INTEGER NOT NULL DEFAULT 0,
    admin        INTEGER NOT NULL DEFAULT 0,
    credential   TEXT NOT NULL,         -- PHC string
    date_joined  TEXT NOT NULL,         -- ISO 8601 UTC; store-assigned
    last_login   TEXT
);

CREATE TABLE IF NOT EXISTS profiles (
    account_id   INTEGER PRIMARY KEY
                 REFERENCES accounts(account_id) ON DELETE CASCADE,
    image_path   TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    media_type   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

PRAGMA user_version = 1;
";
