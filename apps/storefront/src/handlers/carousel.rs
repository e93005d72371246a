//! # Carousel
//!
//! Moves the spotlight over the current listing. The index wraps modulo the
//! number of products, so it stays valid when products are added or removed
//! between two clicks.

use axum::extract::State;
use axum::Json;
use tower_sessions::Session as CookieSession;
use tracing::debug;

use vitrine_core::PageView;

use crate::error::ApiResult;
use crate::handlers::respond_with;
use crate::state::{load_session, AppState};

/// `POST /carousel/next`
pub async fn next(
    State(state): State<AppState>,
    cookie: CookieSession,
) -> ApiResult<Json<PageView>> {
    let mut session = load_session(&cookie, state.policy).await?;
    let products = state.db.products().list().await?;

    session.carousel_next(products.len())?;
    debug!(index = session.carousel_index(), "Carousel advanced");

    respond_with(&cookie, &session, &products, None).await
}

/// `POST /carousel/prev`
pub async fn prev(
    State(state): State<AppState>,
    cookie: CookieSession,
) -> ApiResult<Json<PageView>> {
    let mut session = load_session(&cookie, state.policy).await?;
    let products = state.db.products().list().await?;

    session.carousel_prev(products.len())?;
    debug!(index = session.carousel_index(), "Carousel moved back");

    respond_with(&cookie, &session, &products, None).await
}
