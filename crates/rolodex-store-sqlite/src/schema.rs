//! SQL schema for the Rolodex SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Skills are created on first reference and never updated or deleted.
CREATE TABLE IF NOT EXISTS skills (
    skill_id  TEXT PRIMARY KEY,
    name      TEXT NOT NULL UNIQUE   -- exact, case-sensitive
);

CREATE TABLE IF NOT EXISTS contacts (
    contact_id      TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    telegram        TEXT,
    twitter         TEXT,
    discord         TEXT,
    github          TEXT,
    linkedin        TEXT,
    email           TEXT,
    company         TEXT,
    role            TEXT,
    current_project TEXT,
    how_we_met      TEXT,
    notes           TEXT,
    date_met        TEXT NOT NULL,   -- YYYY-MM-DD
    last_contacted  TEXT,            -- YYYY-MM-DD or NULL
    follow_up_date  TEXT,            -- YYYY-MM-DD or NULL
    created_at      TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at      TEXT NOT NULL    -- RFC 3339 UTC, fixed width
);

-- Owned by the contact; removed with it. Skill rows are never cascaded.
CREATE TABLE IF NOT EXISTS contact_skills (
    contact_id TEXT NOT NULL REFERENCES contacts(contact_id) ON DELETE CASCADE,
    skill_id   TEXT NOT NULL REFERENCES skills(skill_id),
    PRIMARY KEY (contact_id, skill_id)
);

CREATE INDEX IF NOT EXISTS contacts_updated_idx      ON contacts(updated_at);
CREATE INDEX IF NOT EXISTS contact_skills_skill_idx  ON contact_skills(skill_id);

PRAGMA user_version = 1;
";
