//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,     -- argon2 PHC string
    role          TEXT NOT NULL,     -- 'student' | 'admin'
    created_at    TEXT NOT NULL
);

-- Bearer sessions. Only the SHA-256 of the token is stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id    INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

-- Campuses, departments, courses, and majors share one table.
CREATE TABLE IF NOT EXISTS reference_items (
    item_id     TEXT PRIMARY KEY,
    kind        TEXT NOT NULL,       -- 'campus' | 'department' | 'course' | 'major'
    name        TEXT NOT NULL,
    description TEXT,
    parent_id   TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS staff (
    staff_id      TEXT PRIMARY KEY,
    user_id       INTEGER REFERENCES users(user_id) ON DELETE SET NULL,
    full_name     TEXT NOT NULL,
    department_id TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    campus_id     TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    designation   TEXT,
    mobile        TEXT,
    email         TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    student_id         TEXT PRIMARY KEY,
    user_id            INTEGER NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    name               TEXT NOT NULL,
    registered_number  TEXT,
    year_of_admission  INTEGER,
    campus_id          TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    course_id          TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    major_id           TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    department_id      TEXT REFERENCES reference_items(item_id) ON DELETE SET NULL,
    mobile             TEXT,
    personal_email     TEXT,
    emergency_contact  TEXT,
    present_address    TEXT,
    permanent_address  TEXT,
    photo_url          TEXT,
    is_alumnus         INTEGER NOT NULL DEFAULT 0,
    created_at         TEXT NOT NULL,
    -- Nested collections, JSON arrays.
    co_curricular      TEXT NOT NULL DEFAULT '[]',
    extra_curricular   TEXT NOT NULL DEFAULT '[]',
    hobbies            TEXT NOT NULL DEFAULT '[]',
    internships        TEXT NOT NULL DEFAULT '[]',
    job_offers         TEXT NOT NULL DEFAULT '[]'
);

-- One row per (user, field). Field names are not constrained here so that
-- rows written by newer deployments survive; readers skip unknown names.
CREATE TABLE IF NOT EXISTS privacy_settings (
    setting_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    field_name TEXT NOT NULL,
    is_private INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, field_name)
);

CREATE INDEX IF NOT EXISTS reference_kind_idx   ON reference_items(kind);
CREATE INDEX IF NOT EXISTS students_name_idx    ON students(name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS sessions_user_idx    ON sessions(user_id);

PRAGMA user_version = 1;
";
