//! # Session State Machine
//!
//! Per-user interactive state: the current page, the login flag, the product
//! picked for checkout and the carousel position.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐  login ok   ┌──────────┐   buy(product)   ┌──────────┐    │
//! │   │  Login  │────────────►│ Products │─────────────────►│ Checkout │    │
//! │   │         │◄────────────│          │◄─────────────────│          │    │
//! │   └─┬───────┘   logout    └─┬────────┘       back       └─┬────────┘    │
//! │     │  ▲                    │  ▲                          │  ▲          │
//! │     └──┘ login failed       └──┘ carousel next/prev       └──┘ finalize │
//! │        (error shown)           (index mod N)                (ack only)  │
//! │                                                                         │
//! │  No terminal state. Create/update/delete require authenticated = true.  │
//! │  Checkout is only entered together with a selected product.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is plain data: handlers load it, call one transition, call the
//! gateways and store it back. Nothing here touches I/O.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::credentials::CredentialTable;
use crate::error::{AuthError, CoreError, CoreResult};
use crate::types::Product;

// =============================================================================
// Page
// =============================================================================

/// The page a session is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Login,
    Products,
    Checkout,
}

/// Whether the operator login gates the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoginPolicy {
    /// Sessions start on the login page.
    #[default]
    Required,
    /// Sessions start on the products page with editing enabled.
    Disabled,
}

// =============================================================================
// Session
// =============================================================================

/// Interactive state of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    policy: LoginPolicy,
    page: Page,
    authenticated: bool,
    username: Option<String>,
    /// Copy of the row chosen with "buy", not a live reference.
    selected_product: Option<Product>,
    carousel_index: usize,
}

/// Acknowledgment shown after "finalize purchase". Nothing is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub product_id: i64,
    pub message: String,
}

impl Session {
    /// Creates a session in its initial state for the given policy.
    pub fn new(policy: LoginPolicy) -> Self {
        let (page, authenticated) = match policy {
            LoginPolicy::Required => (Page::Login, false),
            LoginPolicy::Disabled => (Page::Products, true),
        };

        Session {
            policy,
            page,
            authenticated,
            username: None,
            selected_product: None,
            carousel_index: 0,
        }
    }

    pub fn policy(&self) -> LoginPolicy {
        self.policy
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    /// Raw carousel counter. Use [`Session::carousel_position`] to index a list.
    pub fn carousel_index(&self) -> usize {
        self.carousel_index
    }

    // -------------------------------------------------------------------------
    // Login / Logout
    // -------------------------------------------------------------------------

    /// Login → Products on valid credentials.
    ///
    /// On failure the session is left exactly as it was.
    pub fn login(
        &mut self,
        credentials: &CredentialTable,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        credentials.verify(username, password)?;

        self.authenticated = true;
        self.username = Some(username.to_string());
        if self.page == Page::Login {
            self.page = Page::Products;
        }
        Ok(())
    }

    /// Back to the login page. A no-op when the login is disabled.
    pub fn logout(&mut self) {
        if self.policy == LoginPolicy::Disabled {
            return;
        }
        *self = Session::new(self.policy);
    }

    /// Gate for create/update/delete.
    pub fn require_authenticated(&self) -> CoreResult<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Products → Checkout, keeping a copy of the chosen product.
    pub fn select_for_checkout(&mut self, product: Product) -> CoreResult<()> {
        self.expect_page(Page::Products, "buy a product")?;

        self.selected_product = Some(product);
        self.page = Page::Checkout;
        Ok(())
    }

    /// Checkout → Products.
    pub fn back(&mut self) -> CoreResult<()> {
        self.expect_page(Page::Checkout, "go back to the product list")?;

        self.selected_product = None;
        self.page = Page::Products;
        Ok(())
    }

    /// Checkout → Checkout with an acknowledgment. No state or data changes.
    pub fn finalize(&self) -> CoreResult<Acknowledgment> {
        self.expect_page(Page::Checkout, "finalize a purchase")?;

        let product = self
            .selected_product
            .as_ref()
            .ok_or(CoreError::NoProductSelected)?;

        Ok(Acknowledgment {
            product_id: product.id,
            message: "Purchase completed successfully! Thank you for shopping with us."
                .to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Carousel
    // -------------------------------------------------------------------------

    /// Advances the carousel over a list of `len` products.
    pub fn carousel_next(&mut self, len: usize) -> CoreResult<()> {
        self.expect_page(Page::Products, "move the carousel")?;

        self.carousel_index = match len {
            0 => 0,
            n => (self.carousel_index % n + 1) % n,
        };
        Ok(())
    }

    /// Moves the carousel back over a list of `len` products.
    pub fn carousel_prev(&mut self, len: usize) -> CoreResult<()> {
        self.expect_page(Page::Products, "move the carousel")?;

        self.carousel_index = match len {
            0 => 0,
            n => (self.carousel_index % n + n - 1) % n,
        };
        Ok(())
    }

    /// Position of the spotlighted product in a list of `len`, if any.
    pub fn carousel_position(&self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            n => Some(self.carousel_index % n),
        }
    }

    fn expect_page(&self, expected: Page, action: &'static str) -> CoreResult<()> {
        if self.page == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                page: self.page,
                action,
            })
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(LoginPolicy::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
