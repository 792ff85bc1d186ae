//! Authentication service
//!
//! Orchestrates the credential store, password hasher and token
//! service for registration and login.
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on blocking thread pool
//! - JWT service is passed by reference (pre-computed keys)

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRecord};
use crate::state::AppState;
use authgate_shared::errors::AuthError;
use authgate_shared::types::UserResponse;
use authgate_shared::validation::{LoginInput, RegisterInput};
use tracing::{debug, info};

/// Result of a successful register or login
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserResponse,
    /// Freshly issued token for the session cookie
    pub token: String,
}

/// Authentication operations
pub struct AuthService;

impl AuthService {
    /// Register a new user and issue their first token
    ///
    /// The email pre-check gives the common case a clear answer; the
    /// store's uniqueness constraint settles concurrent registrations.
    pub async fn register(state: &AppState, input: RegisterInput) -> Result<AuthSession, ApiError> {
        if state.store().find_by_email(&input.email).await?.is_some() {
            debug!("registration rejected: email already registered");
            return Err(AuthError::AlreadyExists.into());
        }

        if !PasswordService::accepts(&input.password) {
            return Err(ApiError::Validation(
                "Password must be at most 72 bytes".to_string(),
            ));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = state.passwords().hash_async(input.password).await?;

        let user = state
            .store()
            .insert(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Self::open_session(state, user)
    }

    /// Check credentials and issue a token
    ///
    /// Unknown email and wrong password produce the same error after the
    /// same amount of bcrypt work.
    pub async fn login(state: &AppState, input: LoginInput) -> Result<AuthSession, ApiError> {
        let user = match state.store().find_by_email(&input.email).await? {
            Some(user) => user,
            None => {
                let dummy = state.passwords().dummy_hash().to_string();
                PasswordService::verify_async(input.password, dummy).await?;
                debug!("login rejected: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        // Verify password on blocking thread pool (CPU-intensive)
        let valid =
            PasswordService::verify_async(input.password, user.password_hash.clone()).await?;
        if !valid {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "user logged in");
        Self::open_session(state, user)
    }

    fn open_session(state: &AppState, user: UserRecord) -> Result<AuthSession, ApiError> {
        let token = state.jwt().issue(user.id)?;

        Ok(AuthSession {
            user: UserResponse {
                id: user.id,
                name: user.name,
                email: user.email,
            },
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryUserStore, UserStore};
    use crate::state::test_state;
    use fake::faker::internet::en::{Password, SafeEmail};
    use fake::faker::name::en::Name;
    use fake::Fake;
    use std::sync::Arc;

    fn register_input(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_returns_same_id() {
        let state = test_state(Arc::new(InMemoryUserStore::new()));

        for i in 0..5 {
            let name: String = Name().fake();
            let email = format!("{}.{}", i, SafeEmail().fake::<String>());
            let password: String = Password(8..20).fake();

            let registered = AuthService::register(&state, register_input(&name, &email, &password))
                .await
                .unwrap();
            let logged_in = AuthService::login(&state, login_input(&email, &password))
                .await
                .unwrap();

            assert_eq!(registered.user.id, logged_in.user.id);
            assert_eq!(logged_in.user.name, name);
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let store = Arc::new(InMemoryUserStore::new());
        let state = test_state(store.clone());

        AuthService::register(&state, register_input("Ann", "ann@x.com", "pw123"))
            .await
            .unwrap();

        let stored = store.find_by_email("ann@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw123");
        assert!(stored.password_hash.starts_with("$2b$04$"));
    }

    #[tokio::test]
    async fn test_issued_token_names_the_user() {
        let state = test_state(Arc::new(InMemoryUserStore::new()));

        let session = AuthService::register(&state, register_input("Ann", "ann@x.com", "pw123"))
            .await
            .unwrap();

        let claims = state.jwt().verify(&session.token).unwrap();
        assert_eq!(claims.user_id, session.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_regardless_of_password() {
        let state = test_state(Arc::new(InMemoryUserStore::new()));
        AuthService::register(&state, register_input("Ann", "ann@x.com", "pw123"))
            .await
            .unwrap();

        for password in ["pw123", "different", "pw1234"] {
            let err = AuthService::register(&state, register_input("Ann 2", "ann@x.com", password))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Conflict(_)));
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let state = test_state(Arc::new(InMemoryUserStore::new()));
        AuthService::register(&state, register_input("Ann", "ann@x.com", "pw123"))
            .await
            .unwrap();

        let wrong_password = AuthService::login(&state, login_input("ann@x.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = AuthService::login(&state, login_input("bob@x.com", "pw123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_rejected_even_with_dummy_password() {
        let state = test_state(Arc::new(InMemoryUserStore::new()));

        let err = AuthService::login(&state, login_input("ghost@x.com", "authgate-unknown-account"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_bcrypt_verify() {
        let mut config = crate::config::AppConfig::default();
        config.password.bcrypt_cost = 8;
        let state = AppState::new(Arc::new(InMemoryUserStore::new()), config).unwrap();

        // Lower bound: the cost-8 verify the dummy hash forces
        let baseline = std::time::Instant::now();
        PasswordService::verify("pw123", state.passwords().dummy_hash()).unwrap();
        let one_verify = baseline.elapsed();

        let started = std::time::Instant::now();
        let err = AuthService::login(&state, login_input("ghost@x.com", "pw123"))
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, ApiError::InvalidCredentials));
        assert!(
            elapsed * 2 >= one_verify,
            "unknown-email login took {:?}, one verify takes {:?}",
            elapsed,
            one_verify
        );
    }

    #[tokio::test]
    async fn test_overlong_password_is_validation_error() {
        let state = test_state(Arc::new(InMemoryUserStore::new()));
        let err = AuthService::register(&state, register_input("Ann", "ann@x.com", &"p".repeat(73)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }
}
