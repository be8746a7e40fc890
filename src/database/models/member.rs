use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::schema::{Column, ColumnKind, EntitySchema, OnCreate, OnUpdate, SortDirection};
use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub is_council: bool,
    pub link: Option<String>,
}

// `link` is optional on both create and update; an empty string clears it.
const COLUMNS: &[Column] = &[
    Column::new("name", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
    Column::new("status", ColumnKind::Text, OnCreate::Required, OnUpdate::Required),
    Column::new("is_council", ColumnKind::Bit, OnCreate::Required, OnUpdate::Required),
    Column::new("link", ColumnKind::Text, OnCreate::Optional, OnUpdate::Optional),
];

pub const MEMBER_SCHEMA: EntitySchema = EntitySchema {
    name: "member",
    label: "Member",
    table: "members",
    columns: COLUMNS,
    order_by: &[("name", SortDirection::Asc), ("id", SortDirection::Asc)],
};

impl Entity for Member {
    const SCHEMA: &'static EntitySchema = &MEMBER_SCHEMA;
}
