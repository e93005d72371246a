//! Per-browser session storage.
//!
//! The whole [`Session`] is stored as one JSON value under [`SESSION_KEY`].
//! A browser without a stored session starts from `Session::new(policy)`.

use tower_sessions::Session as CookieSession;
use tracing::debug;

use vitrine_core::{LoginPolicy, Session};

use crate::error::ApiResult;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "vitrine_session";

/// Key of the stored session value.
pub const SESSION_KEY: &str = "vitrine.session";

/// Loads the browser's session, or a fresh one.
pub async fn load_session(cookie: &CookieSession, policy: LoginPolicy) -> ApiResult<Session> {
    match cookie.get::<Session>(SESSION_KEY).await? {
        Some(session) => Ok(session),
        None => {
            debug!(?policy, "Starting new session");
            Ok(Session::new(policy))
        }
    }
}

/// Stores the browser's session.
pub async fn save_session(cookie: &CookieSession, session: &Session) -> ApiResult<()> {
    cookie.insert(SESSION_KEY, session).await?;
    Ok(())
}
