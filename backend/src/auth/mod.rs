//! Authentication module
//!
//! Cookie-carried JWT sessions with bcrypt password hashing.

pub mod cookie;
mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenClaims, TokenError};
pub use middleware::{authenticate, session_gate, CurrentUser};
pub use password::PasswordService;
