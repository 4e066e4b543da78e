//! Schema migrations, run at open inside one transaction.

use rusqlite::Connection;

use jyotish_core::errors::StoreError;

const MIGRATIONS: &[&str] = &[
    // v1: rules, symbolic keys, embeddings.
    "CREATE TABLE IF NOT EXISTS rules (
        id            TEXT PRIMARY KEY,
        domain        TEXT NOT NULL,
        chart_context TEXT NOT NULL,
        scope         TEXT NOT NULL,
        condition     TEXT NOT NULL,
        effect        TEXT NOT NULL,
        modifiers     TEXT NOT NULL DEFAULT '[]',
        weight        REAL NOT NULL CHECK (weight >= 0.0 AND weight <= 1.0),
        source        TEXT NOT NULL,
        original_text TEXT,
        translation   TEXT,
        commentary    TEXT,
        variants      TEXT NOT NULL DEFAULT '[]',
        prerequisite  TEXT,
        cancels       TEXT NOT NULL DEFAULT '[]',
        version       INTEGER NOT NULL DEFAULT 1,
        status        TEXT NOT NULL DEFAULT 'active',
        updated_at    TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_rules_domain ON rules (domain, weight DESC, id ASC);

    CREATE TABLE IF NOT EXISTS symbolic_keys (
        key_type  TEXT NOT NULL,
        key_value TEXT NOT NULL,
        rule_id   TEXT NOT NULL REFERENCES rules (id),
        PRIMARY KEY (key_type, key_value, rule_id)
    );
    CREATE INDEX IF NOT EXISTS idx_keys_lookup ON symbolic_keys (key_type, key_value);

    CREATE TABLE IF NOT EXISTS rule_embeddings (
        rule_id    TEXT PRIMARY KEY REFERENCES rules (id),
        vector     BLOB NOT NULL,
        dimensions INTEGER NOT NULL,
        model      TEXT NOT NULL
    );",
];

/// Run all pending migrations. Tracks the applied version in
/// `user_version` so re-opening an existing store is a no-op.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::Migration {
            reason: e.to_string(),
        })?;

    for (i, sql) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i64;
        if version <= current {
            continue;
        }
        conn.execute_batch(sql).map_err(|e| StoreError::Migration {
            reason: format!("migration {version}: {e}"),
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| StoreError::Migration {
                reason: e.to_string(),
            })?;
    }

    Ok(())
}
