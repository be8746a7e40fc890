//! Table bootstrap for a fresh database (`cms-api init-schema`).

use tracing::info;

use crate::database::adapter::DataAccessAdapter;
use crate::database::error::DatabaseError;
use crate::database::models::{ColumnKind, Entity, EntitySchema, Member, OnCreate, Post, Project};
use crate::database::repository::qualified_table;
use crate::database::statement::{quote_identifier, Statement};

/// `CREATE TABLE IF NOT EXISTS` for one entity.
pub fn create_table_sql(schema: &EntitySchema, db_schema: Option<&str>) -> String {
    let mut columns = vec!["\"id\" SERIAL PRIMARY KEY".to_string()];
    for column in schema.columns {
        let sql_type = match column.kind {
            ColumnKind::Text => "TEXT",
            ColumnKind::Bit => "BOOLEAN",
            ColumnKind::Timestamp => "TIMESTAMPTZ",
        };
        let mut definition = format!("{} {}", quote_identifier(column.name), sql_type);
        if !column.nullable() {
            definition.push_str(" NOT NULL");
        }
        if column.on_create == OnCreate::StoreNow {
            definition.push_str(" DEFAULT NOW()");
        }
        columns.push(definition);
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_table(schema, db_schema),
        columns.join(", ")
    )
}

/// Create the schema namespace (if configured) and all content tables.
pub async fn ensure_schema(adapter: &DataAccessAdapter, db_schema: Option<&str>) -> Result<(), DatabaseError> {
    if let Some(ns) = db_schema {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_identifier(ns));
        adapter.execute(Statement::new(sql)).await?;
    }

    for schema in [Post::SCHEMA, Project::SCHEMA, Member::SCHEMA] {
        adapter
            .execute(Statement::new(create_table_sql(schema, db_schema)))
            .await?;
        info!("Ensured table {}", qualified_table(schema, db_schema));
    }
    Ok(())
}
