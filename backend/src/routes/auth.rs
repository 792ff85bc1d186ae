//! Authentication routes
//!
//! Provides endpoints for registration, login, the current user and
//! logout. Tokens travel only in the HTTP-only auth cookie.

use crate::auth::{cookie, session_gate, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;
use authgate_shared::errors::AuthError;
use authgate_shared::types::{LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use authgate_shared::validation::{LoginInput, RegisterInput};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

/// Create auth routes
///
/// `/me` sits behind the session gate; the others are public.
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, session_gate));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
}

/// An absent or unparseable body counts as missing fields; a body over
/// the size limit is reported as such
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        debug!(error = %rejection, "rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::from(AuthError::MissingFields)
        }
    })
}

/// Register a new user
///
/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<UserResponse>)> {
    let input = RegisterInput::try_from(body(payload)?)?;
    let session = AuthService::register(&state, input).await?;

    let jar = jar.add(cookie::session_cookie(
        &state.config().cookie,
        session.token,
        state.jwt().expiry_secs(),
    ));
    Ok((StatusCode::CREATED, jar, Json(session.user)))
}

/// Login with email and password
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<UserResponse>)> {
    let input = LoginInput::try_from(body(payload)?)?;
    let session = AuthService::login(&state, input).await?;

    let jar = jar.add(cookie::session_cookie(
        &state.config().cookie,
        session.token,
        state.jwt().expiry_secs(),
    ));
    Ok((jar, Json(session.user)))
}

/// Current user
///
/// GET /auth/me
async fn me(user: CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Clear the auth cookie
///
/// POST /auth/logout
///
/// Tokens are stateless, so a copy of the old cookie value stays valid
/// until it expires.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(cookie::cleared_cookie(&state.config().cookie));
    (jar, Json(MessageResponse::new("Logged out successfully")))
}
