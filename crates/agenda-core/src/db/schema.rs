//! SQLite schema definition.

/// Complete database schema for the agenda store.
///
/// Each entity collection is one JSON array stored under its own key, and
/// every mutation rewrites that key's value in full.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Collections
-- ============================================================================

CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- JSON array of records
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Seed both collections so first reads always find a row
INSERT OR IGNORE INTO collections (key, value) VALUES ('patients', '[]');
INSERT OR IGNORE INTO collections (key, value) VALUES ('appointments', '[]');
"#;
