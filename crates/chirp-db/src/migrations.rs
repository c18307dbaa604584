use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

const SCHEMA_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (accounts and messages)");
        conn.execute_batch(
            "
            CREATE TABLE account (
                account_id  INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL
            );

            CREATE TABLE message (
                message_id          INTEGER PRIMARY KEY AUTOINCREMENT,
                posted_by           INTEGER NOT NULL REFERENCES account(account_id),
                message_text        TEXT NOT NULL,
                time_posted_epoch   INTEGER NOT NULL
            );

            CREATE INDEX idx_message_posted_by ON message(posted_by);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database schema at version {}", SCHEMA_VERSION);
    Ok(())
}
