//! Shared application state.

use std::sync::Arc;

use vitrine_blob::BlobStore;
use vitrine_core::{CredentialTable, LoginPolicy};
use vitrine_db::Database;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

/// Gateways and settings injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub blobs: Arc<dyn BlobStore>,
    pub credentials: Arc<CredentialTable>,
    pub policy: LoginPolicy,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, blobs: Arc<dyn BlobStore>) -> Self {
        AppState {
            db,
            blobs,
            credentials: Arc::new(CredentialTable::default()),
            policy: LoginPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_credentials(mut self, credentials: CredentialTable) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }

    pub fn with_policy(mut self, policy: LoginPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_upload_bytes(mut self, max: usize) -> Self {
        self.max_upload_bytes = max;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("blob_container", &self.blobs.container())
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
