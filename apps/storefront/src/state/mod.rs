//! # State Module
//!
//! Application-wide state shared by every handler, and the per-browser
//! session kept in the session store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppState (built once at startup, cloned into each request)             │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────────────────────┐     │
//! │  │  Database    │ │  BlobStore   │ │  CredentialTable, policy,    │     │
//! │  │  (pool)      │ │  Arc<dyn>    │ │  upload limit (read-only)    │     │
//! │  └──────────────┘ └──────────────┘ └──────────────────────────────┘     │
//! │                                                                         │
//! │  Session (one per browser cookie, tower-sessions MemoryStore)           │
//! │  ┌──────────────────────────────────────────────────────────────┐      │
//! │  │  page, authenticated, selected_product, carousel_index       │      │
//! │  └──────────────────────────────────────────────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • Database: internal connection pool                                   │
//! │  • BlobStore: Send + Sync gateway                                       │
//! │  • Session: loaded, changed and stored within one request               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod session;

pub use app::AppState;
pub use session::{load_session, save_session, SESSION_COOKIE_NAME, SESSION_KEY};
