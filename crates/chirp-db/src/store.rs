//! Storage traits the account and message logic is written against.
//!
//! Both tables are keyed by store-assigned integer ids. Implementations report
//! constraint violations as [`DuplicateKey`] or [`MissingReference`] inside the
//! returned `anyhow::Error`, so callers can tell them apart with
//! `downcast_ref` and map them onto their own error kinds.

use anyhow::Result;
use thiserror::Error;

use crate::models::{AccountRow, MessageRow};

/// A unique column already holds the value being inserted.
#[derive(Debug, Error)]
#[error("duplicate value for unique column `{column}`")]
pub struct DuplicateKey {
    pub column: &'static str,
}

/// A foreign key column names a row that does not exist.
#[derive(Debug, Error)]
#[error("`{column}` references a missing row")]
pub struct MissingReference {
    pub column: &'static str,
}

pub trait AccountStore: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    /// Fails with [`DuplicateKey`] if the username is taken.
    fn insert_account(&self, username: &str, password: &str) -> Result<AccountRow>;

    fn find_account_by_username(&self, username: &str) -> Result<Option<AccountRow>>;

    fn find_account_by_id(&self, account_id: i64) -> Result<Option<AccountRow>>;
}

pub trait MessageStore: Send + Sync {
    /// Insert a new message and return it with its assigned id.
    /// Fails with [`MissingReference`] if `posted_by` names no account.
    fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<MessageRow>;

    fn find_message_by_id(&self, message_id: i64) -> Result<Option<MessageRow>>;

    /// All messages in ascending id order.
    fn find_all_messages(&self) -> Result<Vec<MessageRow>>;

    /// All messages with the given `posted_by`, in ascending id order.
    fn find_messages_by_posted_by(&self, posted_by: i64) -> Result<Vec<MessageRow>>;

    /// Returns the number of rows changed (0 or 1).
    fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize>;

    /// Returns the number of rows removed (0 or 1).
    fn delete_message(&self, message_id: i64) -> Result<usize>;
}
