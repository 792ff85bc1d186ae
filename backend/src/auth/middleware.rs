//! Session gate
//!
//! Axum middleware that authenticates a request from its auth cookie
//! before it reaches protected handlers. Each request either leaves the
//! gate with a `CurrentUser` in its extensions or is answered with 401.
//! The client never learns which check failed; the reason is logged.

use crate::error::ApiError;
use crate::state::AppState;
use authgate_shared::types::UserResponse;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Identity attached to a request that passed the session gate
///
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Resolve the request's identity from its cookie
///
/// Store failures are internal errors; every other failure is 401.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let jar = CookieJar::from_headers(headers);
    let cookie_name = &state.config().cookie.name;

    let token = match jar.get(cookie_name).map(|c| c.value()) {
        Some(token) if !token.is_empty() => token,
        _ => {
            debug!("session rejected: no token");
            return Err(ApiError::Unauthorized);
        }
    };

    let claims = state.jwt().verify(token).map_err(|e| {
        debug!(error = %e, "session rejected: invalid or expired token");
        ApiError::Unauthorized
    })?;

    let user = state
        .store()
        .find_by_id(claims.user_id)
        .await?
        .ok_or_else(|| {
            debug!(user_id = %claims.user_id, "session rejected: user not found");
            ApiError::Unauthorized
        })?;

    Ok(CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}

/// Middleware applied with `from_fn_with_state` to protected routes
pub async fn session_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let user = authenticate(&state, &parts.headers).await?;
    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Read the identity the session gate attached
///
/// Rejects with 401 on routes the gate does not cover.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
