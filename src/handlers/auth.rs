use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use subtle::ConstantTimeEq;

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::middleware::session_cookie;
use crate::state::AppState;

const LOGIN_FAILED: &str = "Invalid username or password";

/// POST /api/auth - exchange the admin credentials for the session cookie
///
/// Body: `{ "username": "...", "password": "..." }`. A missing field, a wrong field, or
/// unconfigured admin credentials all produce the same 401 without a cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let security = &state.config.security;

    let credentials = body.ok().map(|Json(v)| v).unwrap_or(Value::Null);
    let username = credentials.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = credentials.get("password").and_then(Value::as_str).unwrap_or_default();

    if !credentials_match(security, username, password) {
        tracing::warn!("Rejected admin login attempt");
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    }

    tracing::info!("Admin session issued");
    Ok((jar.add(session_cookie(security)), Json(json!({ "success": true }))))
}

/// Byte-for-byte comparison of both halves, without short-circuiting between them.
pub fn credentials_match(security: &SecurityConfig, username: &str, password: &str) -> bool {
    if !security.has_admin_credentials() {
        return false;
    }
    let user_ok = username.as_bytes().ct_eq(security.admin_username.as_bytes());
    let pass_ok = password.as_bytes().ct_eq(security.admin_password.as_bytes());
    (user_ok & pass_ok).into()
}
