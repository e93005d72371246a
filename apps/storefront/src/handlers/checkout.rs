//! # Checkout
//!
//! Finalizing only shows an acknowledgment: nothing is charged, recorded or
//! taken out of stock, and the session stays on the checkout page.

use axum::extract::State;
use axum::Json;
use tower_sessions::Session as CookieSession;
use tracing::info;

use vitrine_core::{Notice, PageView};

use crate::error::ApiResult;
use crate::handlers::respond;
use crate::state::{load_session, AppState};

/// `POST /checkout/back`
pub async fn back(
    State(state): State<AppState>,
    cookie: CookieSession,
) -> ApiResult<Json<PageView>> {
    let mut session = load_session(&cookie, state.policy).await?;
    session.back()?;

    respond(&state, &cookie, &session, None).await
}

/// `POST /checkout/finalize`
pub async fn finalize(
    State(state): State<AppState>,
    cookie: CookieSession,
) -> ApiResult<Json<PageView>> {
    let session = load_session(&cookie, state.policy).await?;
    let acknowledgment = session.finalize()?;

    info!(product_id = acknowledgment.product_id, "Purchase acknowledged");

    respond(&state, &cookie, &session, Some(Notice::success(acknowledgment.message))).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::handlers::test_support::TestApp;

    async fn at_checkout() -> (TestApp, i64) {
        let mut app = TestApp::new().await;
        app.login().await;
        let created = app.create("Mug", "10.00").await;
        let id = created.body["products"][0]["product"]["id"].as_i64().unwrap();
        app.post(&format!("/products/{id}/buy")).await;
        (app, id)
    }

    #[tokio::test]
    async fn test_back_returns_to_unchanged_listing() {
        let (mut app, id) = at_checkout().await;

        let response = app.post("/checkout/back").await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["page"], "products");
        let products = response.body["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["product"]["id"], id);
        assert_eq!(products[0]["product"]["name"], "Mug");
    }

    #[tokio::test]
    async fn test_finalize_acknowledges_without_side_effects() {
        let (mut app, id) = at_checkout().await;

        let response = app.post("/checkout/finalize").await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["page"], "checkout");
        assert_eq!(response.body["notice"]["level"], "success");
        assert_eq!(response.body["product"]["id"], id);
        assert_eq!(app.db.products().count().await.unwrap(), 1);

        // Finalizing twice is fine
        let again = app.post("/checkout/finalize").await;
        assert_eq!(again.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_checkout_keeps_copy_after_product_changes() {
        let (mut app, id) = at_checkout().await;
        app.db.products().delete(id).await.unwrap();

        let response = app.get("/").await;

        assert_eq!(response.body["page"], "checkout");
        assert_eq!(response.body["product"]["name"], "Mug");
    }

    #[tokio::test]
    async fn test_checkout_actions_need_checkout_page() {
        let mut app = TestApp::new().await;
        app.login().await;

        assert_eq!(app.post("/checkout/back").await.status, StatusCode::CONFLICT);
        assert_eq!(app.post("/checkout/finalize").await.status, StatusCode::CONFLICT);
    }
}
