use std::marker::PhantomData;

use crate::database::adapter::DataAccessAdapter;
use crate::database::error::DatabaseError;
use crate::database::models::{Entity, EntitySchema, OnCreate};
use crate::database::statement::{quote_identifier, Param, Statement};

/// Create/read/update/delete for one entity type, one adapter call per operation.
pub struct Repository<E> {
    adapter: DataAccessAdapter,
    table: String,
    _phantom: PhantomData<E>,
}

impl<E: Entity> Repository<E> {
    pub fn new(adapter: DataAccessAdapter, db_schema: Option<&str>) -> Self {
        Self {
            adapter,
            table: qualified_table(E::SCHEMA, db_schema),
            _phantom: PhantomData,
        }
    }

    pub async fn insert(&self, params: Vec<(&'static str, Param)>) -> Result<i32, DatabaseError> {
        self.adapter.fetch_scalar_id(insert_statement(E::SCHEMA, &self.table, params)).await
    }

    pub async fn select_one(&self, id: i32) -> Result<Option<E>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE \"id\" = @id",
            select_list(E::SCHEMA),
            self.table
        );
        self.adapter
            .fetch_optional(Statement::new(sql).bind("id", Param::Int(id)))
            .await
    }

    pub async fn select_all(&self) -> Result<Vec<E>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            select_list(E::SCHEMA),
            self.table,
            order_list(E::SCHEMA)
        );
        self.adapter.fetch_all(Statement::new(sql)).await
    }

    /// Affected-row count; zero means no row had this id.
    pub async fn update(&self, id: i32, params: Vec<(&'static str, Param)>) -> Result<u64, DatabaseError> {
        self.adapter.execute(update_statement(&self.table, id, params)).await
    }

    /// Affected-row count; zero means no row had this id.
    pub async fn delete(&self, id: i32) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE \"id\" = @id", self.table);
        self.adapter
            .execute(Statement::new(sql).bind("id", Param::Int(id)))
            .await
    }
}

pub(crate) fn qualified_table(schema: &EntitySchema, db_schema: Option<&str>) -> String {
    match db_schema {
        Some(ns) => format!("{}.{}", quote_identifier(ns), quote_identifier(schema.table)),
        None => quote_identifier(schema.table),
    }
}

fn select_list(schema: &EntitySchema) -> String {
    std::iter::once("id")
        .chain(schema.columns.iter().map(|c| c.name))
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ")
}

fn order_list(schema: &EntitySchema) -> String {
    schema
        .order_by
        .iter()
        .map(|(column, direction)| format!("{} {}", quote_identifier(column), direction.as_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_statement(schema: &EntitySchema, table: &str, params: Vec<(&'static str, Param)>) -> Statement {
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for column in schema.columns {
        if column.on_create == OnCreate::StoreNow {
            columns.push(quote_identifier(column.name));
            values.push("NOW()".to_string());
        } else if params.iter().any(|(name, _)| *name == column.name) {
            columns.push(quote_identifier(column.name));
            values.push(format!("@{}", column.name));
        }
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
        table,
        columns.join(", "),
        values.join(", ")
    );
    params
        .into_iter()
        .fold(Statement::new(sql), |stmt, (name, value)| stmt.bind(name, value))
}

fn update_statement(table: &str, id: i32, params: Vec<(&'static str, Param)>) -> Statement {
    let assignments = params
        .iter()
        .map(|(name, _)| format!("{} = @{}", quote_identifier(name), name))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE \"id\" = @id", table, assignments);
    params
        .into_iter()
        .fold(Statement::new(sql).bind("id", Param::Int(id)), |stmt, (name, value)| {
            stmt.bind(name, value)
        })
}
