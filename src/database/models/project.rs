use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::schema::{Column, ColumnKind, EntitySchema, OnCreate, OnUpdate, SortDirection};
use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub content: String,
    /// Free-text category tag.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

const COLUMNS: &[Column] = &[
    Column::new("title", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
    Column::new("content", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
    Column::new("type", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
];

pub const PROJECT_SCHEMA: EntitySchema = EntitySchema {
    name: "project",
    label: "Project",
    table: "projects",
    columns: COLUMNS,
    order_by: &[("id", SortDirection::Asc)],
};

impl Entity for Project {
    const SCHEMA: &'static EntitySchema = &PROJECT_SCHEMA;
}
