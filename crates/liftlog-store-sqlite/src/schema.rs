//! SQL schema for the Liftlog SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- One profile per user; role changes are policy-checked by the store.
CREATE TABLE IF NOT EXISTS profiles (
    user_id       TEXT PRIMARY KEY REFERENCES users(user_id),
    email         TEXT NOT NULL,
    region        TEXT NOT NULL,
    team          TEXT NOT NULL,
    name          TEXT NOT NULL DEFAULT '',
    role          TEXT NOT NULL DEFAULT 'player',
    pending_admin INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS weights (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(user_id),
    date    TEXT NOT NULL,   -- YYYY-MM-DD
    weight  REAL NOT NULL CHECK (weight > 0)
);

-- Exactly one row per user; writes are whole-row upserts.
CREATE TABLE IF NOT EXISTS lifts (
    user_id     TEXT PRIMARY KEY REFERENCES users(user_id),
    snatch      REAL NOT NULL DEFAULT 0,
    clean_jerk  REAL NOT NULL DEFAULT 0,
    back_squat  REAL NOT NULL DEFAULT 0,
    front_squat REAL NOT NULL DEFAULT 0,
    deadlift    REAL NOT NULL DEFAULT 0,
    bench_press REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS blobs (
    bucket       TEXT NOT NULL,
    key          TEXT NOT NULL,
    content      BLOB NOT NULL,
    content_hash TEXT NOT NULL,   -- SHA-256 hex
    updated_at   TEXT NOT NULL,
    PRIMARY KEY (bucket, key)
);

CREATE INDEX IF NOT EXISTS weights_user_date_idx ON weights(user_id, date);
CREATE INDEX IF NOT EXISTS profiles_pending_idx  ON profiles(pending_admin);

PRAGMA user_version = 1;
";
