//! Password hashing using bcrypt
//!
//! Hashes are self-describing modular-crypt strings (`$2b$<cost>$...`)
//! carrying the algorithm, the work factor and a fresh random salt.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. Async callers use the `*_async`
//! variants, which run on the blocking thread pool.

use anyhow::{bail, Result};
use std::sync::Arc;

/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;
/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashed at startup for logins naming an unknown email
const DUMMY_PASSWORD: &str = "authgate-unknown-account";

/// Password hashing service
#[derive(Debug, Clone)]
pub struct PasswordService {
    cost: u32,
    /// Hash at the configured cost, verified against when no account
    /// matches so both login failures take the same time
    dummy_hash: Arc<str>,
}

impl PasswordService {
    /// Create a hasher with the given bcrypt work factor
    ///
    /// Runs one hash at that cost to prepare the dummy hash.
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            bail!("bcrypt cost must be between {} and {}, got {}", MIN_COST, MAX_COST, cost);
        }
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)
            .map_err(|e| anyhow::anyhow!("Failed to prepare dummy hash: {}", e))?;

        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash matching no account, for equalizing login timing
    #[inline]
    pub fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }

    /// Configured work factor
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Whether a password fits in the portion of input bcrypt reads
    #[inline]
    pub fn accepts(password: &str) -> bool {
        password.len() <= MAX_PASSWORD_BYTES
    }

    /// Hash a password (blocking operation)
    ///
    /// Passwords longer than 72 bytes are refused instead of being
    /// silently truncated.
    pub fn hash(&self, password: &str) -> Result<String> {
        if !Self::accepts(password) {
            bail!("password exceeds {} bytes", MAX_PASSWORD_BYTES);
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// The digest comparison is constant-time. A malformed stored hash
    /// is an error, not a mismatch.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if !Self::accepts(password) {
            return Ok(false);
        }
        bcrypt::verify(password, hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast() -> PasswordService {
        PasswordService::new(MIN_COST).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = fast().hash(password).unwrap();

        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = fast().hash(password).unwrap();
        let hash2 = fast().hash(password).unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_hash_encodes_cost() {
        let hash = PasswordService::new(5).unwrap().hash("pw123").unwrap();
        assert!(hash.starts_with("$2b$05$"), "unexpected hash prefix: {}", hash);
    }

    #[test]
    fn test_dummy_hash_uses_configured_cost() {
        let service = PasswordService::new(5).unwrap();

        assert!(service.dummy_hash().starts_with("$2b$05$"));
        assert!(!PasswordService::verify("pw123", service.dummy_hash()).unwrap());
    }

    #[test]
    fn test_cost_out_of_range_rejected() {
        assert!(PasswordService::new(3).is_err());
        assert!(PasswordService::new(32).is_err());
        assert_eq!(PasswordService::new(10).unwrap().cost(), 10);
    }

    #[test]
    fn test_overlong_password_refused() {
        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(fast().hash(&long).is_err());

        let hash = fast().hash(&"x".repeat(MAX_PASSWORD_BYTES)).unwrap();
        assert!(!PasswordService::verify(&long, &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(PasswordService::verify("pw123", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = fast().hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password.clone(), hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Property: a hash verifies its own password and no other
        #[test]
        fn prop_verify_matches_only_its_password(
            password in "[ -~]{1,40}",
            other in "[ -~]{1,40}",
        ) {
            let hash = fast().hash(&password).unwrap();
            prop_assert!(PasswordService::verify(&password, &hash).unwrap());
            if other != password {
                prop_assert!(!PasswordService::verify(&other, &hash).unwrap());
            }
        }
    }
}
