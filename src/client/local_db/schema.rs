//! Database Schema Definitions
//!
//! Each migration is a list of statements applied in one transaction and
//! recorded in `schema_migrations`.

/// Current database schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Schema migrations, in version order
pub const MIGRATIONS: &[(i32, &[&str])] = &[
    (
        1,
        &[
            "CREATE TABLE IF NOT EXISTS actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL,
                action_type TEXT NOT NULL,
                url TEXT,
                created_at TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_actions_created_at ON actions (created_at, id)",
            "CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY,
                user_id INTEGER,
                url TEXT NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                excerpt TEXT,
                google_drive_file_id TEXT,
                featured_image TEXT,
                author TEXT,
                site_name TEXT,
                status TEXT NOT NULL DEFAULT 'inbox',
                starred INTEGER NOT NULL DEFAULT 0,
                read_at TEXT,
                archived_at TEXT,
                summarized_at TEXT,
                summary TEXT,
                created_at TEXT,
                updated_at TEXT
            )",
            "CREATE INDEX IF NOT EXISTS idx_articles_status ON articles (status)",
        ],
    ),
    (
        2,
        &[
            "CREATE TABLE IF NOT EXISTS sync_metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        ],
    ),
];

/// Migrations newer than `current_version`
pub fn get_pending_migrations(current_version: i32) -> Vec<(i32, &'static [&'static str])> {
    MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > current_version)
        .copied()
        .collect()
}
