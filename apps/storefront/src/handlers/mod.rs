//! # Handlers
//!
//! One handler per UI event. Every handler follows the same cycle:
//!
//! ```text
//! load session ──► apply event ──► call gateways ──► save session ──► render
//! ```
//!
//! and answers with the rendered [`PageView`] as JSON, so the client always
//! redraws from the server's view of the session.
//!
//! - [`auth`] - login / logout
//! - [`products`] - create, update, delete, buy
//! - [`carousel`] - spotlight navigation
//! - [`checkout`] - back, finalize
//! - [`health`] - liveness and database status

pub mod auth;
pub mod carousel;
pub mod checkout;
pub mod health;
pub mod products;

use axum::extract::State;
use axum::Json;
use tower_sessions::Session as CookieSession;

use vitrine_core::{render, Notice, Page, PageView, Product, Session};

use crate::error::ApiResult;
use crate::state::{load_session, save_session, AppState};

/// `GET /` - renders the current page.
pub async fn current_page(
    State(state): State<AppState>,
    cookie: CookieSession,
) -> ApiResult<Json<PageView>> {
    let session = load_session(&cookie, state.policy).await?;
    respond(&state, &cookie, &session, None).await
}

/// Stores the session and renders it, listing products when the page
/// needs them.
pub(crate) async fn respond(
    state: &AppState,
    cookie: &CookieSession,
    session: &Session,
    notice: Option<Notice>,
) -> ApiResult<Json<PageView>> {
    let products = if session.page() == Page::Products {
        state.db.products().list().await?
    } else {
        Vec::new()
    };
    respond_with(cookie, session, &products, notice).await
}

/// Like [`respond`] with a product list the handler already fetched.
pub(crate) async fn respond_with(
    cookie: &CookieSession,
    session: &Session,
    products: &[Product],
    notice: Option<Notice>,
) -> ApiResult<Json<PageView>> {
    save_session(cookie, session).await?;
    Ok(Json(render(session, products, notice)))
}
