use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::database::models::{Member, Post, Project};
use crate::handlers::{auth, method_not_allowed, resource, service};
use crate::middleware::session_gate;
use crate::state::AppState;

/// Full router: service endpoints, login, and the three content resources behind the session gate.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .route("/api/auth", post(auth::login).fallback(method_not_allowed))
        .merge(resource::routes::<Post>())
        .merge(resource::routes::<Project>())
        .merge(resource::routes::<Member>())
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
