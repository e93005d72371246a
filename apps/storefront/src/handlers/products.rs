//! # Product Handlers
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /products (multipart: name, description, price, image)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session.require_authenticated() ──── no ──► 403 NOT_AUTHENTICATED      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_product(form) ───────── bad ─► warning notice, no insert  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upload_image ──► public URL                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products().create(...) ──► success notice, products page re-rendered   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Update follows the same path with an optional image; a missing image
//! keeps the stored URL.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use tower_sessions::Session as CookieSession;
use tracing::{debug, info};

use vitrine_blob::upload_image;
use vitrine_core::validation::{validate_new_product, validate_product_update};
use vitrine_core::{CoreError, ImageUpload, Notice, PageView, ProductForm, ProductId};

use crate::error::{ApiError, ApiResult};
use crate::handlers::respond;
use crate::state::{load_session, AppState};

/// `POST /products`
pub async fn create_product(
    State(state): State<AppState>,
    cookie: CookieSession,
    multipart: Multipart,
) -> ApiResult<Json<PageView>> {
    let session = load_session(&cookie, state.policy).await?;
    session.require_authenticated()?;

    let form = read_product_form(multipart).await?;

    let notice = match validate_new_product(form) {
        Err(e) => {
            debug!(error = %e, "Create form rejected");
            Notice::warning(e.to_string())
        }
        Ok(draft) => {
            let image_url = upload_image(state.blobs.as_ref(), Some(&draft.image))
                .await?
                .ok_or_else(|| ApiError::internal("Image upload returned no URL"))?;

            let id = state
                .db
                .products()
                .create(&draft.into_new_product(image_url))
                .await?;

            info!(id, "Product created");
            Notice::success("Product created successfully!")
        }
    };

    respond(&state, &cookie, &session, Some(notice)).await
}

/// `POST /products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    cookie: CookieSession,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> ApiResult<Json<PageView>> {
    let session = load_session(&cookie, state.policy).await?;
    session.require_authenticated()?;

    let form = read_product_form(multipart).await?;

    let notice = match validate_product_update(id, form) {
        Err(e) => {
            debug!(id, error = %e, "Update form rejected");
            Notice::warning(e.to_string())
        }
        Ok(edit) => {
            let image_url = upload_image(state.blobs.as_ref(), edit.image.as_ref()).await?;
            let changes = edit.into_changes(image_url);

            if state.db.products().update(&changes).await? {
                info!(id, new_image = changes.image_url.is_some(), "Product updated");
                Notice::success("Product updated!")
            } else {
                info!(id, "Update of missing product ignored");
                Notice::info(format!("Product {id} no longer exists."))
            }
        }
    };

    respond(&state, &cookie, &session, Some(notice)).await
}

/// `POST /products/{id}/delete`
pub async fn delete_product(
    State(state): State<AppState>,
    cookie: CookieSession,
    Path(id): Path<ProductId>,
) -> ApiResult<Json<PageView>> {
    let session = load_session(&cookie, state.policy).await?;
    session.require_authenticated()?;

    let notice = if state.db.products().delete(id).await? {
        info!(id, "Product deleted");
        Notice::success("Product deleted.")
    } else {
        info!(id, "Delete of missing product ignored");
        Notice::info(format!("Product {id} was already removed."))
    };

    respond(&state, &cookie, &session, Some(notice)).await
}

/// `POST /products/{id}/buy`
///
/// Open to every visitor on the products page.
pub async fn buy_product(
    State(state): State<AppState>,
    cookie: CookieSession,
    Path(id): Path<ProductId>,
) -> ApiResult<Json<PageView>> {
    let mut session = load_session(&cookie, state.policy).await?;

    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?;

    session.select_for_checkout(product)?;
    debug!(id, "Product selected for checkout");

    respond(&state, &cookie, &session, None).await
}

/// Decodes a product form. Unknown fields are ignored; an image part with
/// neither a file name nor content counts as "no image".
async fn read_product_form(mut multipart: Multipart) -> ApiResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "name" => form.name = field.text().await?,
            "description" => form.description = field.text().await?,
            "price" => form.price = field.text().await?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                if !file_name.is_empty() || !bytes.is_empty() {
                    form.image = Some(ImageUpload::new(file_name, content_type, bytes.to_vec()));
                }
            }
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::handlers::test_support::{MultipartForm, TestApp};

    fn listed(body: &Value) -> Vec<Value> {
        body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["product"].clone())
            .collect()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let mut app = TestApp::new().await;
        app.login().await;

        let response = app.create("Mug", "25.50").await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["notice"]["level"], "success");

        let products = listed(&response.body);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], "Mug");
        assert_eq!(products[0]["description"], "Mug description");
        assert_eq!(products[0]["price_cents"], 2550);
        assert_eq!(products[0]["price_display"], "R$ 25.50");

        let url = products[0]["image_url"].as_str().unwrap();
        assert!(url.starts_with("memory://imagens/") && url.ends_with(".png"));
        assert_eq!(app.blobs.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_create_inserts_nothing() {
        let mut app = TestApp::new().await;
        app.login().await;

        let empty_name = MultipartForm::new()
            .text("name", "  ")
            .text("description", "d")
            .text("price", "10")
            .file("image", "a.png", "image/png", b"x");
        let zero_price = MultipartForm::new()
            .text("name", "Mug")
            .text("description", "d")
            .text("price", "0")
            .file("image", "a.png", "image/png", b"x");
        let no_image = MultipartForm::new()
            .text("name", "Mug")
            .text("description", "d")
            .text("price", "10");
        let bad_extension = MultipartForm::new()
            .text("name", "Mug")
            .text("description", "d")
            .text("price", "10")
            .file("image", "a.gif", "image/gif", b"x");

        for form in [empty_name, zero_price, no_image, bad_extension] {
            let response = app.post_form("/products", &form).await;
            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.body["notice"]["level"], "warning");
            assert!(listed(&response.body).is_empty());
        }

        assert_eq!(app.db.products().count().await.unwrap(), 0);
        assert!(app.blobs.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let mut app = TestApp::with_upload_limit(1024).await;
        app.login().await;

        let form = MultipartForm::new()
            .text("name", "Poster")
            .text("description", "Large print")
            .text("price", "9.90")
            .file("image", "poster.png", "image/png", &[0u8; 4096]);
        let response = app.post_form("/products", &form).await;

        assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.db.products().count().await.unwrap(), 0);
        assert!(app.blobs.is_empty().await);

        // The same form fits under the default limit
        let mut roomy = TestApp::new().await;
        roomy.login().await;
        assert_eq!(roomy.post_form("/products", &form).await.status, StatusCode::OK);
        assert_eq!(roomy.db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_url() {
        let mut app = TestApp::new().await;
        app.login().await;
        let created = app.create("Mug", "10.00").await;
        let original = listed(&created.body)[0].clone();
        let id = original["id"].as_i64().unwrap();

        let form = MultipartForm::new()
            .text("name", "Big Mug")
            .text("description", "Larger")
            .text("price", "12,00");
        let response = app.post_form(&format!("/products/{id}"), &form).await;

        assert_eq!(response.body["notice"]["level"], "success");
        let updated = listed(&response.body)[0].clone();
        assert_eq!(updated["name"], "Big Mug");
        assert_eq!(updated["description"], "Larger");
        assert_eq!(updated["price_cents"], 1200);
        assert_eq!(updated["image_url"], original["image_url"]);
    }

    #[tokio::test]
    async fn test_update_with_image_replaces_url() {
        let mut app = TestApp::new().await;
        app.login().await;
        let created = app.create("Mug", "10.00").await;
        let original = listed(&created.body)[0].clone();
        let id = original["id"].as_i64().unwrap();

        let form = MultipartForm::new()
            .text("name", "Mug")
            .text("description", "Mug description")
            .text("price", "10.00")
            .file("image", "new.JPG", "image/jpeg", b"jpeg bytes");
        let response = app.post_form(&format!("/products/{id}"), &form).await;

        let updated = listed(&response.body)[0].clone();
        assert_ne!(updated["image_url"], original["image_url"]);
        assert!(updated["image_url"].as_str().unwrap().ends_with(".jpg"));
        assert_eq!(app.blobs.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_noop() {
        let mut app = TestApp::new().await;
        app.login().await;

        let form = MultipartForm::new()
            .text("name", "Ghost")
            .text("description", "Nothing")
            .text("price", "1.00");
        let response = app.post_form("/products/77", &form).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["notice"]["level"], "info");
        assert_eq!(app.db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let mut app = TestApp::new().await;
        app.login().await;
        app.create("Keep", "1.00").await;
        let created = app.create("Gone", "2.00").await;
        let gone = listed(&created.body)[1]["id"].as_i64().unwrap();

        let response = app.post(&format!("/products/{gone}/delete")).await;

        assert_eq!(response.body["notice"]["level"], "success");
        let names: Vec<Value> = listed(&response.body)
            .into_iter()
            .map(|p| p["name"].clone())
            .collect();
        assert_eq!(names, vec![Value::from("Keep")]);

        let again = app.post(&format!("/products/{gone}/delete")).await;
        assert_eq!(again.status, StatusCode::OK);
        assert_eq!(again.body["notice"]["level"], "info");
    }

    #[tokio::test]
    async fn test_mutations_require_login() {
        let mut operator = TestApp::new().await;
        operator.login().await;
        let created = operator.create("Mug", "10.00").await;
        let id = listed(&created.body)[0]["id"].as_i64().unwrap();

        let mut visitor = operator.new_browser();
        let form = MultipartForm::new()
            .text("name", "Hacked")
            .text("description", "x")
            .text("price", "1");

        assert_eq!(visitor.create("Other", "1").await.status, StatusCode::FORBIDDEN);
        assert_eq!(
            visitor.post_form(&format!("/products/{id}"), &form).await.status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            visitor.post(&format!("/products/{id}/delete")).await.status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(operator.db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_buy_opens_checkout_with_that_product() {
        let mut app = TestApp::new().await;
        app.login().await;
        app.create("Mug", "10.00").await;
        let created = app.create("Cap", "79.90").await;
        let cap = listed(&created.body)[1].clone();
        let id = cap["id"].as_i64().unwrap();

        let response = app.post(&format!("/products/{id}/buy")).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["page"], "checkout");
        let shown = &response.body["product"];
        assert_eq!(shown["name"], cap["name"]);
        assert_eq!(shown["description"], cap["description"]);
        assert_eq!(shown["price_display"], "R$ 79.90");
        assert_eq!(shown["image_url"], cap["image_url"]);
    }

    #[tokio::test]
    async fn test_buy_missing_product_is_not_found() {
        let mut app = TestApp::new().await;
        app.login().await;

        let response = app.post("/products/404/buy").await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["code"], "NOT_FOUND");
        assert_eq!(app.get("/").await.body["page"], "products");
    }

    #[tokio::test]
    async fn test_buy_from_login_page_is_rejected() {
        let mut app = TestApp::new().await;
        app.login().await;
        let created = app.create("Mug", "10.00").await;
        let id = listed(&created.body)[0]["id"].as_i64().unwrap();

        let mut visitor = app.new_browser();
        let response = visitor.post(&format!("/products/{id}/buy")).await;

        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.body["code"], "INVALID_TRANSITION");
    }
}
