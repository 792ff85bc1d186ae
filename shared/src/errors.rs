//! Error types for Authgate

use thiserror::Error;

/// Client-facing authentication failures.
///
/// Messages are deliberately generic: none of them reveal whether an
/// account exists or which check of the session gate failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please provide all required fields")]
    MissingFields,

    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authorized")]
    NotAuthorized,
}

impl AuthError {
    /// Stable machine-readable code used in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingFields => "VALIDATION_ERROR",
            AuthError::AlreadyExists => "ALREADY_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::NotAuthorized => "UNAUTHORIZED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_one_message() {
        // Unknown email and wrong password both surface as this variant
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            AuthError::MissingFields.code(),
            AuthError::AlreadyExists.code(),
            AuthError::InvalidCredentials.code(),
            AuthError::NotAuthorized.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
