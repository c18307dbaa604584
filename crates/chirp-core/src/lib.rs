//! Validation and consistency rules for accounts and messages.
//!
//! The logic types are stateless apart from a shared handle to the store and
//! can be called concurrently. Each operation is a single check-then-act step
//! with no isolation between the check and the write; the store's own
//! constraints catch the races and are reported with the same error kinds.

pub mod accounts;
pub mod error;
pub mod messages;

pub use accounts::AccountLogic;
pub use error::{ServiceError, ServiceResult};
pub use messages::MessageLogic;

/// Text length in UTF-16 code units. Characters outside the Basic
/// Multilingual Plane count as two.
pub(crate) fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
