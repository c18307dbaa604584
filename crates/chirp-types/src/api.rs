use serde::Deserialize;

// -- Messages --

/// Body of `PATCH /messages/{id}`. Only `messageText` is read; any other
/// message fields a client sends along are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMessageRequest {
    pub message_text: String,
}

