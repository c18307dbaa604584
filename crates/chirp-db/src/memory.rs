use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;

use crate::models::{AccountRow, MessageRow};
use crate::store::{AccountStore, DuplicateKey, MessageStore, MissingReference};

/// In-process store with the same constraints as the SQLite schema: unique
/// usernames, and messages may only reference existing accounts.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, AccountRow>,
    messages: BTreeMap<i64, MessageRow>,
    last_account_id: i64,
    last_message_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Memory store lock poisoned: {}", e))
    }
}

impl AccountStore for MemoryStore {
    fn insert_account(&self, username: &str, password: &str) -> Result<AccountRow> {
        let mut tables = self.tables()?;
        if tables.accounts.values().any(|a| a.username == username) {
            return Err(DuplicateKey { column: "username" }.into());
        }

        tables.last_account_id += 1;
        let row = AccountRow {
            account_id: tables.last_account_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        tables.accounts.insert(row.account_id, row.clone());
        Ok(row)
    }

    fn find_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        let tables = self.tables()?;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    fn find_account_by_id(&self, account_id: i64) -> Result<Option<AccountRow>> {
        Ok(self.tables()?.accounts.get(&account_id).cloned())
    }
}

impl MessageStore for MemoryStore {
    fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<MessageRow> {
        let mut tables = self.tables()?;
        if !tables.accounts.contains_key(&posted_by) {
            return Err(MissingReference { column: "posted_by" }.into());
        }

        tables.last_message_id += 1;
        let row = MessageRow {
            message_id: tables.last_message_id,
            posted_by,
            message_text: message_text.to_string(),
            time_posted_epoch,
        };
        tables.messages.insert(row.message_id, row.clone());
        Ok(row)
    }

    fn find_message_by_id(&self, message_id: i64) -> Result<Option<MessageRow>> {
        Ok(self.tables()?.messages.get(&message_id).cloned())
    }

    fn find_all_messages(&self) -> Result<Vec<MessageRow>> {
        Ok(self.tables()?.messages.values().cloned().collect())
    }

    fn find_messages_by_posted_by(&self, posted_by: i64) -> Result<Vec<MessageRow>> {
        Ok(self
            .tables()?
            .messages
            .values()
            .filter(|m| m.posted_by == posted_by)
            .cloned()
            .collect())
    }

    fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize> {
        let mut tables = self.tables()?;
        match tables.messages.get_mut(&message_id) {
            Some(row) => {
                row.message_text = message_text.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_message(&self, message_id: i64) -> Result<usize> {
        let removed = self.tables()?.messages.remove(&message_id);
        Ok(usize::from(removed.is_some()))
    }
}
