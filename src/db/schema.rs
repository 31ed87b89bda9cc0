//! Database schema and migrations for Corkboard.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. Never edit a migration that has shipped; append a new one.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE COLLATE NOCASE,
    email       TEXT NOT NULL DEFAULT '',
    password    TEXT NOT NULL,           -- Argon2id PHC string
    is_active   INTEGER NOT NULL DEFAULT 1,
    date_joined TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT
);
"#,
    // v2: login sessions
    r#"
CREATE TABLE sessions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    token_hash  TEXT NOT NULL UNIQUE,    -- SHA-256 hex of the cookie token
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    expires_at  TEXT NOT NULL
);

CREATE INDEX idx_sessions_user_id ON sessions(user_id);
CREATE INDEX idx_sessions_expires_at ON sessions(expires_at);
"#,
    // v3: boards
    r#"
CREATE TABLE boards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE CHECK (length(name) <= 25),
    description TEXT NOT NULL DEFAULT '' CHECK (length(description) <= 100)
);
"#,
    // v4: topics
    r#"
CREATE TABLE topics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject     TEXT NOT NULL CHECK (length(subject) <= 255),
    board_id    INTEGER NOT NULL REFERENCES boards(id),
    starter_id  INTEGER NOT NULL REFERENCES users(id),
    views       INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_topics_board_created ON topics(board_id, created_at);
"#,
    // v5: posts
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    message     TEXT NOT NULL CHECK (length(message) <= 4000),
    topic_id    INTEGER NOT NULL REFERENCES topics(id),
    created_by  INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_by  INTEGER REFERENCES users(id),
    updated_at  TEXT
);

CREATE INDEX idx_posts_topic_created ON posts(topic_id, created_at);
CREATE INDEX idx_posts_created_by ON posts(created_by);
"#,
];
