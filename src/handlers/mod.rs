// handlers/mod.rs - HTTP endpoints
//
// auth      POST /api/auth (exempt from the session gate)
// resource  generic content CRUD, mounted once per entity
// service   GET / and GET /health

pub mod auth;
pub mod resource;
pub mod service;

use crate::error::ApiError;

/// Fallback for any method a route does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
