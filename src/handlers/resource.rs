// handlers/resource.rs - Generic content endpoints
//
// One set of create/read/update/delete handlers, instantiated per entity type:
//   POST   /api/{entity}/create       → 201 {message, id}
//   GET    /api/{entity}/get?id=N     → 200 record | 404
//   GET    /api/{entity}/get-all      → 200 [record, ...]
//   PUT    /api/{entity}/edit         → 200 {message} | 404
//   DELETE /api/{entity}/delete?id=N  → 200 {message} | 404
//
// Any other method on these paths is a 405. Validation always runs before the store is touched.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::database::models::{Entity, EntitySchema};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, MessageBody};
use crate::state::AppState;

use super::method_not_allowed;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// The five routes for entity `E`.
pub fn routes<E: Entity>() -> Router<AppState> {
    let name = E::SCHEMA.name;
    Router::new()
        .route(
            &format!("/api/{}/create", name),
            post(create::<E>).fallback(method_not_allowed),
        )
        .route(
            &format!("/api/{}/get", name),
            get(get_one::<E>).fallback(method_not_allowed),
        )
        .route(
            &format!("/api/{}/get-all", name),
            get(get_all::<E>).fallback(method_not_allowed),
        )
        .route(
            &format!("/api/{}/edit", name),
            put(update::<E>).fallback(method_not_allowed),
        )
        .route(
            &format!("/api/{}/delete", name),
            delete(remove::<E>).fallback(method_not_allowed),
        )
}

/// POST /api/{entity}/create
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<MessageBody> {
    let schema = E::SCHEMA;
    let params = schema.create_params(&json_object(body)?)?;

    let id = state
        .repository::<E>()
        .insert(params)
        .await
        .map_err(|e| ApiError::from_database(e, format!("Error creating {}", schema.name)))?;

    info!("Created {} {}", schema.name, id);
    Ok(ApiResponse::created(MessageBody::with_id(
        format!("{} created successfully", schema.label),
        id,
    )))
}

/// GET /api/{entity}/get?id=N
pub async fn get_one<E: Entity>(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<E> {
    let schema = E::SCHEMA;
    let id = query_id(schema, query)?;

    let record = state
        .repository::<E>()
        .select_one(id)
        .await
        .map_err(|e| ApiError::from_database(e, format!("Error fetching {}", schema.name)))?;

    match record {
        Some(record) => Ok(ApiResponse::success(record)),
        None => {
            debug!("{} {} not found", schema.name, id);
            Err(not_found(schema))
        }
    }
}

/// GET /api/{entity}/get-all
///
/// An empty table is an empty array, not a 404.
pub async fn get_all<E: Entity>(State(state): State<AppState>) -> ApiResult<Vec<E>> {
    let records = state
        .repository::<E>()
        .select_all()
        .await
        .map_err(|e| ApiError::from_database(e, "Internal server error"))?;

    Ok(ApiResponse::success(records))
}

/// PUT /api/{entity}/edit
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<MessageBody> {
    let schema = E::SCHEMA;
    let (id, params) = schema.update_params(&json_object(body)?)?;

    let affected = state
        .repository::<E>()
        .update(id, params)
        .await
        .map_err(|e| ApiError::from_database(e, format!("Error updating {}", schema.name)))?;

    if affected == 0 {
        debug!("{} {} not found for update", schema.name, id);
        return Err(not_found(schema));
    }

    info!("Updated {} {}", schema.name, id);
    Ok(ApiResponse::success(MessageBody::new(format!(
        "{} updated successfully",
        schema.label
    ))))
}

/// DELETE /api/{entity}/delete?id=N
pub async fn remove<E: Entity>(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<MessageBody> {
    let schema = E::SCHEMA;
    let id = query_id(schema, query)?;

    let affected = state
        .repository::<E>()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_database(e, format!("Error deleting {}", schema.name)))?;

    if affected == 0 {
        debug!("{} {} not found for delete", schema.name, id);
        return Err(not_found(schema));
    }

    info!("Deleted {} {}", schema.name, id);
    Ok(ApiResponse::success(MessageBody::new(format!(
        "{} deleted successfully",
        schema.label
    ))))
}

fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(_) => Err(ApiError::bad_request("Invalid JSON body")),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection);
            Err(ApiError::bad_request("Invalid JSON body"))
        }
    }
}

fn query_id(schema: &EntitySchema, query: Result<Query<IdQuery>, QueryRejection>) -> Result<i32, ApiError> {
    let raw = query
        .ok()
        .and_then(|Query(q)| q.id)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing {} ID", schema.name)))?;

    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} ID", schema.name)))
}

fn not_found(schema: &EntitySchema) -> ApiError {
    ApiError::not_found(format!("{} not found", schema.label))
}
