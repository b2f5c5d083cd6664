//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::auth::AuthService;
use crate::services::customers::CustomerService;
use crate::services::email::{NotificationGateway, SmtpNotificationGateway};
use crate::services::storage::FileStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration. The
/// process owns one pool; each request borrows it for its lifetime.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    gateway: SmtpNotificationGateway,
    files: FileStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(
        config: AdminConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let gateway = SmtpNotificationGateway::new(&config.email)?;
        let files = FileStore::new(config.upload_dir.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gateway,
                files,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the notification gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn NotificationGateway {
        &self.inner.gateway
    }

    /// Get a reference to the staged-file store.
    #[must_use]
    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }

    /// Build a customer service borrowing this state.
    #[must_use]
    pub fn customer_service(&self) -> CustomerService<'_> {
        CustomerService::new(
            self.pool(),
            self.gateway(),
            self.files(),
            &self.inner.config.email,
        )
    }

    /// Build an auth service borrowing this state.
    #[must_use]
    pub fn auth_service(&self) -> AuthService<'_> {
        AuthService::new(self.pool())
    }
}
