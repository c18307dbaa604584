use std::sync::Arc;

use axum::{Json, extract::State};

use chirp_core::{AccountLogic, MessageLogic};
use chirp_db::Database;
use chirp_types::models::Account;

use crate::error::{ApiError, blocking};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountLogic<Database>,
    pub messages: MessageLogic<Database>,
}

impl AppStateInner {
    /// Build both logic services over one shared store.
    pub fn new(db: Database) -> AppState {
        let store = Arc::new(db);
        Arc::new(Self {
            accounts: AccountLogic::new(store.clone()),
            messages: MessageLogic::new(store),
        })
    }
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(candidate): Json<Account>,
) -> Result<Json<Account>, ApiError> {
    let account = blocking(move || state.accounts.register(candidate)).await?;
    Ok(Json(account))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Account>,
) -> Result<Json<Account>, ApiError> {
    let account = blocking(move || state.accounts.login(&credentials)).await?;
    Ok(Json(account))
}
