//! # Login / Logout
//!
//! The operator login is checked against the in-memory credential table.
//! A failed login is not an HTTP error: the login page comes back with an
//! error notice and the session is unchanged.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tower_sessions::Session as CookieSession;
use tracing::{info, warn};

use vitrine_core::{Notice, PageView};

use crate::error::ApiResult;
use crate::handlers::respond;
use crate::state::{load_session, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    cookie: CookieSession,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<PageView>> {
    let Json(request) = payload?;
    let mut session = load_session(&cookie, state.policy).await?;

    let notice = match session.login(&state.credentials, &request.username, &request.password) {
        Ok(()) => {
            info!(username = %request.username, "Operator logged in");
            None
        }
        Err(e) => {
            warn!(username = %request.username, "Login rejected");
            Some(Notice::error(e.to_string()))
        }
    };

    respond(&state, &cookie, &session, notice).await
}

/// `POST /logout`
pub async fn logout(
    State(state): State<AppState>,
    cookie: CookieSession,
) -> ApiResult<Json<PageView>> {
    let mut session = load_session(&cookie, state.policy).await?;

    if let Some(username) = session.username() {
        info!(username = %username, "Operator logged out");
    }
    session.logout();

    respond(&state, &cookie, &session, None).await
}
