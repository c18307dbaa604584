pub mod auth;
pub mod error;
pub mod messages;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route(
            "/messages/{message_id}",
            get(messages::get_message)
                .delete(messages::delete_message)
                .patch(messages::update_message),
        )
        .route(
            "/accounts/{account_id}/messages",
            get(messages::get_account_messages),
        )
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
