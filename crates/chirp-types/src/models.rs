use serde::{Deserialize, Serialize};

/// A registered user. `account_id` is assigned by the store and is zero on
/// registration input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account_id: 0,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A text post attributed to an account through `posted_by`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

impl Message {
    pub fn new(posted_by: i64, message_text: impl Into<String>, time_posted_epoch: i64) -> Self {
        Self {
            message_id: 0,
            posted_by,
            message_text: message_text.into(),
            time_posted_epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_uses_camel_case_fields() {
        let account = Account {
            account_id: 7,
            username: "ann".into(),
            password: "secret1".into(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "accountId": 7, "username": "ann", "password": "secret1" })
        );
    }

    #[test]
    fn missing_fields_default_to_zero_values() {
        let message: Message = serde_json::from_str(r#"{"postedBy": 3}"#).unwrap();
        assert_eq!(message.message_id, 0);
        assert_eq!(message.posted_by, 3);
        assert!(message.message_text.is_empty());
        assert_eq!(message.time_posted_epoch, 0);
    }

    #[test]
    fn registration_body_ignores_unknown_fields() {
        let account: Account =
            serde_json::from_str(r#"{"username": "ann", "password": "secret1", "extra": true}"#)
                .unwrap();
        assert_eq!(account, Account::new("ann", "secret1"));
    }
}
