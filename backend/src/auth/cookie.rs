//! Auth cookie construction
//!
//! Issuance and clearing share the same attributes so the browser
//! treats the clearing cookie as a replacement for the issued one.

use crate::config::CookieConfig;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie carrying a freshly issued token
pub fn session_cookie(config: &CookieConfig, token: String, max_age_secs: i64) -> Cookie<'static> {
    build(config, token, Duration::seconds(max_age_secs))
}

/// Empty cookie with zero lifetime, instructing the client to drop it
pub fn cleared_cookie(config: &CookieConfig) -> Cookie<'static> {
    build(config, String::new(), Duration::ZERO)
}

fn build(config: &CookieConfig, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((config.name.clone(), value))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}
