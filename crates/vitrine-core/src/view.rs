//! # Page Views
//!
//! Pure projection of a [`Session`] plus the current product list into what
//! the UI client draws. Rendering never mutates anything; handlers render
//! after every interaction.
//!
//! ## Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Products page                    authenticated   not authenticated     │
//! │  ─────────────                    ─────────────   ─────────────────     │
//! │  listing + carousel                     ✓                 ✓             │
//! │  "buy" on every card                    ✓                 ✓             │
//! │  create form                            ✓                 ✗             │
//! │  "update" / "delete" on every card      ✓                 ✗             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::session::{LoginPolicy, Page, Session};
use crate::types::Product;

// =============================================================================
// Notices
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A one-shot message shown above the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Notice {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::new(NoticeLevel::Error, message)
    }
}

// =============================================================================
// Views
// =============================================================================

/// A product as drawn on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    /// Price formatted for display, e.g. `R$ 19.90`.
    pub price_display: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        ProductCard {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price_cents: product.price.cents(),
            price_display: product.price.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Actions offered on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Buy,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ProductRow {
    pub product: ProductCard,
    pub actions: Vec<CardAction>,
}

/// The product currently shown by the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Spotlight {
    /// Zero-based position in the listing.
    pub position: usize,
    pub total: usize,
    pub product: ProductCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LoginView {
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ProductsView {
    /// Logged-in operator, if any.
    pub username: Option<String>,
    /// Whether the create form and the update/delete controls are shown.
    pub can_edit: bool,
    /// Whether a logout control is offered.
    pub can_logout: bool,
    pub spotlight: Option<Spotlight>,
    pub products: Vec<ProductRow>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CheckoutView {
    /// `None` only if the session lost its selection.
    pub product: Option<ProductCard>,
    pub notice: Option<Notice>,
}

/// Everything the UI client needs to draw the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Login(LoginView),
    Products(ProductsView),
    Checkout(CheckoutView),
}

impl PageView {
    pub fn page(&self) -> Page {
        match self {
            PageView::Login(_) => Page::Login,
            PageView::Products(_) => Page::Products,
            PageView::Checkout(_) => Page::Checkout,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            PageView::Login(view) => view.notice.as_ref(),
            PageView::Products(view) => view.notice.as_ref(),
            PageView::Checkout(view) => view.notice.as_ref(),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Projects a session and the current listing into a page view.
///
/// `products` is only read on the products page; other pages may pass an
/// empty slice.
pub fn render(session: &Session, products: &[Product], notice: Option<Notice>) -> PageView {
    match session.page() {
        Page::Login => PageView::Login(LoginView { notice }),
        Page::Products => PageView::Products(render_products(session, products, notice)),
        Page::Checkout => {
            let product = session.selected_product().map(ProductCard::from);
            let notice = match (&product, notice) {
                (None, None) => Some(Notice::warning("No product selected.")),
                (_, notice) => notice,
            };
            PageView::Checkout(CheckoutView { product, notice })
        }
    }
}

fn render_products(session: &Session, products: &[Product], notice: Option<Notice>) -> ProductsView {
    let can_edit = session.is_authenticated();

    let actions = if can_edit {
        vec![CardAction::Buy, CardAction::Update, CardAction::Delete]
    } else {
        vec![CardAction::Buy]
    };

    let spotlight = session
        .carousel_position(products.len())
        .and_then(|position| {
            products.get(position).map(|product| Spotlight {
                position,
                total: products.len(),
                product: ProductCard::from(product),
            })
        });

    ProductsView {
        username: session.username().map(str::to_string),
        can_edit,
        can_logout: session.is_authenticated() && session.policy() == LoginPolicy::Required,
        spotlight,
        products: products
            .iter()
            .map(|product| ProductRow {
                product: ProductCard::from(product),
                actions: actions.clone(),
            })
            .collect(),
        notice,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialTable;
    use crate::money::Money;

    fn catalog() -> Vec<Product> {
        (1..=3)
            .map(|id| Product {
                id,
                name: format!("Product {id}"),
                description: format!("Description {id}"),
                price: Money::from_cents(1000 * id),
                image_url: Some(format!("https://img.example/{id}.jpg")),
            })
            .collect()
    }

    fn logged_in() -> Session {
        let mut session = Session::new(LoginPolicy::Required);
        session
            .login(&CredentialTable::default(), "admin", "1234")
            .unwrap();
        session
    }

    #[test]
    fn test_login_page() {
        let session = Session::new(LoginPolicy::Required);
        let view = render(&session, &catalog(), Some(Notice::error("bad")));
        assert_eq!(view.page(), Page::Login);
        assert_eq!(view.notice().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_products_page_authenticated() {
        let view = render(&logged_in(), &catalog(), None);
        let PageView::Products(products) = view else {
            panic!("expected products page");
        };

        assert!(products.can_edit);
        assert!(products.can_logout);
        assert_eq!(products.products.len(), 3);
        assert_eq!(
            products.products[0].actions,
            vec![CardAction::Buy, CardAction::Update, CardAction::Delete]
        );
        assert_eq!(products.products[1].product.price_display, "R$ 20.00");
    }

    #[test]
    fn test_products_page_gates_mutations() {
        // A session can only be on Products unauthenticated after its
        // flag was cleared, e.g. deserialized from an older session.
        let json = serde_json::json!({
            "policy": "required",
            "page": "products",
            "authenticated": false,
            "username": null,
            "selected_product": null,
            "carousel_index": 0
        });
        let session: Session = serde_json::from_value(json).unwrap();

        let PageView::Products(products) = render(&session, &catalog(), None) else {
            panic!("expected products page");
        };
        assert!(!products.can_edit);
        assert!(products
            .products
            .iter()
            .all(|row| row.actions == vec![CardAction::Buy]));
    }

    #[test]
    fn test_spotlight_follows_carousel() {
        let mut session = logged_in();
        session.carousel_next(3).unwrap();

        let PageView::Products(products) = render(&session, &catalog(), None) else {
            panic!("expected products page");
        };
        let spotlight = products.spotlight.unwrap();
        assert_eq!(spotlight.position, 1);
        assert_eq!(spotlight.total, 3);
        assert_eq!(spotlight.product.id, 2);
    }

    #[test]
    fn test_empty_catalog_has_no_spotlight() {
        let PageView::Products(products) = render(&logged_in(), &[], None) else {
            panic!("expected products page");
        };
        assert!(products.spotlight.is_none());
        assert!(products.products.is_empty());
    }

    #[test]
    fn test_checkout_shows_selected_product() {
        let mut session = logged_in();
        let chosen = catalog()[2].clone();
        session.select_for_checkout(chosen.clone()).unwrap();

        let PageView::Checkout(checkout) = render(&session, &[], None) else {
            panic!("expected checkout page");
        };
        let card = checkout.product.unwrap();
        assert_eq!(card.name, chosen.name);
        assert_eq!(card.description, chosen.description);
        assert_eq!(card.price_cents, chosen.price.cents());
        assert_eq!(card.image_url, chosen.image_url);
        assert!(checkout.notice.is_none());
    }

    #[test]
    fn test_view_serializes_with_page_tag() {
        let view = render(&Session::new(LoginPolicy::Required), &[], None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["page"], "login");
    }
}
