use anyhow::Result;
use rusqlite::{Connection, Row, ffi, params};
use tracing::debug;

use crate::Database;
use crate::models::{AccountRow, MessageRow};
use crate::store::{AccountStore, DuplicateKey, MessageStore, MissingReference};

const MESSAGE_COLUMNS: &str = "message_id, posted_by, message_text, time_posted_epoch";

impl AccountStore for Database {
    fn insert_account(&self, username: &str, password: &str) -> Result<AccountRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO account (username, password) VALUES (?1, ?2)",
                params![username, password],
            )
            .map_err(|e| constraint_error(e, "username"))?;

            let account_id = conn.last_insert_rowid();
            debug!("Inserted account {}", account_id);

            Ok(AccountRow {
                account_id,
                username: username.to_string(),
                password: password.to_string(),
            })
        })
    }

    fn find_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT account_id, username, password FROM account WHERE username = ?1",
                [username],
                account_from_row,
            )
            .optional()
        })
    }

    fn find_account_by_id(&self, account_id: i64) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT account_id, username, password FROM account WHERE account_id = ?1",
                [account_id],
                account_from_row,
            )
            .optional()
        })
    }
}

impl MessageStore for Database {
    fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<MessageRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO message (posted_by, message_text, time_posted_epoch)
                 VALUES (?1, ?2, ?3)",
                params![posted_by, message_text, time_posted_epoch],
            )
            .map_err(|e| constraint_error(e, "posted_by"))?;

            let message_id = conn.last_insert_rowid();
            debug!("Inserted message {} by account {}", message_id, posted_by);

            Ok(MessageRow {
                message_id,
                posted_by,
                message_text: message_text.to_string(),
                time_posted_epoch,
            })
        })
    }

    fn find_message_by_id(&self, message_id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM message WHERE message_id = ?1"),
                [message_id],
                message_from_row,
            )
            .optional()
        })
    }

    fn find_all_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                &format!("SELECT {MESSAGE_COLUMNS} FROM message ORDER BY message_id"),
                params![],
            )
        })
    }

    fn find_messages_by_posted_by(&self, posted_by: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM message WHERE posted_by = ?1 ORDER BY message_id"
                ),
                params![posted_by],
            )
        })
    }

    fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE message SET message_text = ?1 WHERE message_id = ?2",
                params![message_text, message_id],
            )?;
            Ok(changed)
        })
    }

    fn delete_message(&self, message_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM message WHERE message_id = ?1", [message_id])?;
            Ok(removed)
        })
    }
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        account_id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        message_id: row.get(0)?,
        posted_by: row.get(1)?,
        message_text: row.get(2)?,
        time_posted_epoch: row.get(3)?,
    })
}

fn query_messages(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, message_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Translate SQLite constraint failures into the typed store errors.
fn constraint_error(err: rusqlite::Error, column: &'static str) -> anyhow::Error {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => return DuplicateKey { column }.into(),
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return MissingReference { column }.into(),
            _ => {}
        }
    }
    err.into()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
