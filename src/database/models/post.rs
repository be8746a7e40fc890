use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::schema::{Column, ColumnKind, EntitySchema, OnCreate, OnUpdate, SortDirection};
use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub link: String,
}

const COLUMNS: &[Column] = &[
    Column::new("title", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
    Column::new("content", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
    Column::new("date", ColumnKind::Timestamp, OnCreate::StoreNow, OnUpdate::Required),
    Column::new("link", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
];

pub const POST_SCHEMA: EntitySchema = EntitySchema {
    name: "post",
    label: "Post",
    table: "posts",
    columns: COLUMNS,
    // Newest first
    order_by: &[("date", SortDirection::Desc), ("id", SortDirection::Desc)],
};

impl Entity for Post {
    const SCHEMA: &'static EntitySchema = &POST_SCHEMA;
}
