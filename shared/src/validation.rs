//! Input validation functions
//!
//! Authentication only requires fields to be present; format and
//! strength rules are out of scope.

use crate::errors::AuthError;
use crate::types::{LoginRequest, RegisterRequest};

/// Registration input with every field present
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login input with every field present
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Require a field to be present and non-empty
pub fn require_field(value: Option<String>) -> Result<String, AuthError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::MissingFields),
    }
}

impl TryFrom<RegisterRequest> for RegisterInput {
    type Error = AuthError;

    fn try_from(req: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_field(req.name)?,
            email: require_field(req.email)?,
            password: require_field(req.password)?,
        })
    }
}

impl TryFrom<LoginRequest> for LoginInput {
    type Error = AuthError;

    fn try_from(req: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: require_field(req.email)?,
            password: require_field(req.password)?,
        })
    }
}
