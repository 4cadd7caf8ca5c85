//! SQL schema for the Kindred SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id        TEXT PRIMARY KEY,
    given_name       TEXT NOT NULL,
    family_name      TEXT NOT NULL,
    middle_name      TEXT,
    gender           TEXT NOT NULL DEFAULT 'other',  -- 'male' | 'female' | 'other'
    birth_date       TEXT,                           -- YYYY-MM-DD
    death_date       TEXT,
    is_alive         INTEGER NOT NULL DEFAULT 1,
    birth_place      TEXT,
    current_location TEXT,
    occupation       TEXT,
    bio              TEXT,
    tags             TEXT NOT NULL DEFAULT '[]',
    created_at       TEXT NOT NULL,                  -- RFC 3339 UTC
    updated_at       TEXT NOT NULL
);

-- Rows are never deleted when a relationship ends; is_active is cleared.
CREATE TABLE IF NOT EXISTS relationships (
    relationship_id TEXT PRIMARY KEY,
    person_a        TEXT NOT NULL REFERENCES persons(person_id),
    person_b        TEXT NOT NULL REFERENCES persons(person_id),
    kind            TEXT NOT NULL,  -- 'parent_child' | 'spouse' | 'sibling' | 'partner'
    is_active       INTEGER NOT NULL DEFAULT 1,
    started_on      TEXT,
    ended_on        TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    CHECK (person_a != person_b)
);

CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    title           TEXT NOT NULL,
    message         TEXT NOT NULL,
    kind            TEXT NOT NULL,  -- discriminant of NotificationPayload
    data_json       TEXT NOT NULL,  -- payload fields only
    is_read         INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS relationships_a_idx     ON relationships(person_a);
CREATE INDEX IF NOT EXISTS relationships_b_idx     ON relationships(person_b);
CREATE INDEX IF NOT EXISTS notifications_user_idx  ON notifications(user_id, is_read);

PRAGMA user_version = 1;
";
