use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use chirp_types::api::UpdateMessageRequest;
use chirp_types::models::Message;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    Json(candidate): Json<Message>,
) -> Result<Json<Message>, ApiError> {
    let message = blocking(move || state.messages.create(candidate)).await?;
    Ok(Json(message))
}

/// GET /messages
pub async fn get_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = blocking(move || state.messages.get_all()).await?;
    Ok(Json(messages))
}

/// GET /messages/{message_id}. A missing message is a 200 with an empty body.
pub async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let message = blocking(move || state.messages.get_by_id(message_id)).await?;
    Ok(match message {
        Some(message) => Json(message).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

/// DELETE /messages/{message_id}. Answers with the removed count, or an
/// empty 200 when there was nothing to remove.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let removed = blocking(move || state.messages.delete_by_id(message_id)).await?;
    Ok(if removed > 0 {
        Json(removed).into_response()
    } else {
        StatusCode::OK.into_response()
    })
}

/// PATCH /messages/{message_id}
pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<Json<usize>, ApiError> {
    let updated =
        blocking(move || state.messages.update_text(message_id, &req.message_text)).await?;
    Ok(Json(updated))
}

/// GET /accounts/{account_id}/messages
pub async fn get_account_messages(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = blocking(move || state.messages.get_all_by_posted_by(account_id)).await?;
    Ok(Json(messages))
}
