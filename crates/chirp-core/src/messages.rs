use std::sync::Arc;

use tracing::{debug, info};

use chirp_db::{AccountStore, MessageStore, MissingReference};
use chirp_types::models::Message;

use crate::error::{ServiceError, ServiceResult};
use crate::utf16_len;

pub const TEXT_LENGTH: &str = "message text must be between 1 and 255 characters";
pub const POSTED_BY_NOT_FOUND: &str = "posted-by account not found";
pub const MESSAGE_NOT_FOUND: &str = "message not found";

pub const MAX_MESSAGE_LEN: usize = 255;

/// Message rules. Account existence is read straight from the store; this
/// type never goes through `AccountLogic`.
pub struct MessageLogic<S> {
    store: Arc<S>,
}

impl<S: AccountStore + MessageStore> MessageLogic<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Store a new message. The text is checked first, then `posted_by` must
    /// name an existing account.
    pub fn create(&self, candidate: Message) -> ServiceResult<Message> {
        check_text(&candidate.message_text)?;

        if self.store.find_account_by_id(candidate.posted_by)?.is_none() {
            debug!("Rejected message: account {} not found", candidate.posted_by);
            return Err(ServiceError::invalid_field(POSTED_BY_NOT_FOUND));
        }

        let row = self
            .store
            .insert_message(
                candidate.posted_by,
                &candidate.message_text,
                candidate.time_posted_epoch,
            )
            .map_err(|e| {
                if e.is::<MissingReference>() {
                    ServiceError::invalid_field(POSTED_BY_NOT_FOUND)
                } else {
                    ServiceError::Store(e)
                }
            })?;

        info!("Created message {} by account {}", row.message_id, row.posted_by);
        Ok(row.into())
    }

    pub fn get_all(&self) -> ServiceResult<Vec<Message>> {
        let rows = self.store.find_all_messages()?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    /// Absence is a normal result here, not an error.
    pub fn get_by_id(&self, message_id: i64) -> ServiceResult<Option<Message>> {
        Ok(self.store.find_message_by_id(message_id)?.map(Message::from))
    }

    /// Returns how many messages were removed. Deleting an id that does not
    /// exist is not an error and returns 0.
    pub fn delete_by_id(&self, message_id: i64) -> ServiceResult<usize> {
        let removed = self.store.delete_message(message_id)?;
        if removed > 0 {
            info!("Deleted message {}", message_id);
        }
        Ok(removed)
    }

    /// Replace the text of an existing message and return 1.
    ///
    /// Unlike [`delete_by_id`](Self::delete_by_id), a missing message is a
    /// validation failure rather than a count of zero.
    pub fn update_text(&self, message_id: i64, message_text: &str) -> ServiceResult<usize> {
        check_text(message_text)?;

        if self.store.find_message_by_id(message_id)?.is_none() {
            debug!("Rejected update: message {} not found", message_id);
            return Err(ServiceError::invalid_field(MESSAGE_NOT_FOUND));
        }

        // Deleted between the lookup and the write.
        if self.store.update_message_text(message_id, message_text)? == 0 {
            return Err(ServiceError::invalid_field(MESSAGE_NOT_FOUND));
        }

        info!("Updated text of message {}", message_id);
        Ok(1)
    }

    /// Messages posted by `account_id`. The account itself is not checked, so
    /// an unknown id simply yields an empty list.
    pub fn get_all_by_posted_by(&self, account_id: i64) -> ServiceResult<Vec<Message>> {
        let rows = self.store.find_messages_by_posted_by(account_id)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }
}

fn check_text(text: &str) -> ServiceResult<()> {
    let len = utf16_len(text);
    if len == 0 || len > MAX_MESSAGE_LEN {
        debug!("Rejected message text of length {}", len);
        return Err(ServiceError::invalid_field(TEXT_LENGTH));
    }
    Ok(())
}
