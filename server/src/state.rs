//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the optional cloud-storage client, and the
//! settings the export and auth routes need at request time.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::dropbox::{CloudStorage, StorageError};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Cloud storage client. `None` if Dropbox is not configured.
    pub storage: Option<Arc<dyn CloudStorage>>,
    /// Scratch directory for EPUB generation.
    pub export_dir: PathBuf,
    /// Whether auth cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, storage: Option<Arc<dyn CloudStorage>>, export_dir: PathBuf, cookie_secure: bool) -> Self {
        Self { pool, storage, export_dir, cookie_secure }
    }

    /// The configured storage client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`] when Dropbox is disabled.
    pub fn storage(&self) -> Result<&dyn CloudStorage, StorageError> {
        self.storage.as_deref().ok_or(StorageError::NotConfigured)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_has_no_storage() {
        let state = test_helpers::test_app_state();
        assert!(matches!(state.storage(), Err(StorageError::NotConfigured)));
        assert!(!state.cookie_secure);
    }

    #[tokio::test]
    async fn mock_storage_round_trips_uploads() {
        let mock = test_helpers::MockStorage::default();
        mock.upload("/Clustica/a.txt", b"hi".to_vec()).await.unwrap();
        let raw = mock
            .download("/clustica/A.TXT", crate::services::dropbox::DownloadMode::Text)
            .await
            .unwrap();
        assert_eq!(raw.content.as_deref(), Some("hi"));
    }
}
