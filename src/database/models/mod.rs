pub mod member;
pub mod post;
pub mod project;
pub mod schema;

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;

pub use member::Member;
pub use post::Post;
pub use project::Project;
pub use schema::{Column, ColumnKind, EntitySchema, FieldError, OnCreate, OnUpdate, SortDirection};

/// A content record type backed by one table.
pub trait Entity: Serialize + for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static {
    const SCHEMA: &'static EntitySchema;
}
