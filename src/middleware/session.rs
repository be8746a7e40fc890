use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::config::{SecurityConfig, MAX_SESSION_AGE_HOURS};
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_VALUE: &str = "true";

/// The login endpoint; never gated.
pub const AUTH_PATH: &str = "/api/auth";

const GATED_PREFIXES: &[&str] = &["/post", "/project", "/member", "/api"];

/// Whether `path` must carry the session cookie.
pub fn is_gated(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    if path.trim_end_matches('/') == AUTH_PATH {
        return false;
    }
    GATED_PREFIXES.iter().any(|prefix| under(path, prefix))
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('/'))
}

pub fn has_session(jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .map_or(false, |cookie| cookie.value() == SESSION_VALUE)
}

/// `admin_session=true; HttpOnly; Path=/; Max-Age=<hours * 3600>`
pub fn session_cookie(security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, SESSION_VALUE))
        .path("/")
        .http_only(true)
        .secure(security.secure_cookie)
        .max_age(time::Duration::hours(
            security.session_max_age_hours.clamp(1, MAX_SESSION_AGE_HOURS),
        ))
        .build()
}

/// Admits gated requests only when the session cookie is present.
///
/// Cookieless requests are redirected to the login page. With `strict_api_gate`,
/// `/api/*` requests get a 401 instead.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !is_gated(path) || has_session(&jar) {
        return next.run(request).await;
    }

    let security = &state.config.security;
    if security.strict_api_gate && under(path, "/api") {
        tracing::debug!("Rejecting unauthenticated API request to {}", path);
        return ApiError::unauthorized("Authentication required").into_response();
    }

    tracing::debug!("Redirecting unauthenticated request for {} to {}", path, security.login_path);
    Redirect::to(&security.login_path).into_response()
}
