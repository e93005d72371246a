//! # vitrine-core: Pure Business Logic for Vitrine
//!
//! This crate holds every rule of the catalog that does not touch the outside
//! world: money, product forms, the operator credential check, the per-user
//! session state machine and the page projections rendered from it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrine Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI client (browser)                          │   │
//! │  │        Login page ──► Products page ──► Checkout page           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON page views)                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  apps/storefront handlers                       │   │
//! │  │    login, create_product, buy_product, finalize, etc.          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vitrine-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │   view    │  │   │
//! │  │   │  Product  │  │   Money   │  │  Session  │  │ PageView  │  │   │
//! │  │   │   Forms   │  │  R$ 9.99  │  │   Page    │  │  Notice   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       vitrine-db (Produtos table) / vitrine-blob (images)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and the create/update form types
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Product form validation
//! - [`credentials`] - Operator credential table
//! - [`session`] - Per-user session state machine
//! - [`view`] - Pure page projections of a session
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrine_core::credentials::CredentialTable;
//! use vitrine_core::session::{LoginPolicy, Page, Session};
//!
//! let credentials = CredentialTable::default();
//! let mut session = Session::new(LoginPolicy::Required);
//! assert_eq!(session.page(), Page::Login);
//!
//! session.login(&credentials, "admin", "1234").unwrap();
//! assert_eq!(session.page(), Page::Products);
//! assert!(session.is_authenticated());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credentials;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use credentials::CredentialTable;
pub use error::{AuthError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Acknowledgment, LoginPolicy, Page, Session};
pub use types::*;
pub use view::{render, Notice, NoticeLevel, PageView};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbol shown in front of every price.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Image file extensions accepted by the product forms.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a product description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
