//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys are derived once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{JwtService, PasswordService};
use crate::config::AppConfig;
use crate::repositories::{PgUserStore, UserStore};
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Credential store
    pub store: Arc<dyn UserStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Password hasher with the configured work factor
    pub passwords: PasswordService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails if the configured bcrypt cost or token lifetime is out of range.
    pub fn new(store: Arc<dyn UserStore>, config: AppConfig) -> Result<Self> {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.expiry_secs)?;
        let passwords = PasswordService::new(config.password.bcrypt_cost)?;

        Ok(Self {
            store,
            config: Arc::new(config),
            jwt,
            passwords,
        })
    }

    /// Create state backed by PostgreSQL
    pub fn with_postgres(pool: PgPool, config: AppConfig) -> Result<Self> {
        Self::new(Arc::new(PgUserStore::new(pool)), config)
    }

    /// Get a reference to the credential store
    #[inline]
    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get a reference to the password hasher
    #[inline]
    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }
}

/// State over the given store with a fast bcrypt cost, for unit tests
#[cfg(test)]
pub(crate) fn test_state(store: Arc<dyn UserStore>) -> AppState {
    let mut config = AppConfig::default();
    config.password.bcrypt_cost = 4;
    config.cookie.secure = false;
    AppState::new(store, config).unwrap()
}
