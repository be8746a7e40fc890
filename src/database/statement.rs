use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatementError {
    #[error("Unbound parameter: @{0}")]
    UnboundParameter(String),

    #[error("Empty parameter name at offset {0}")]
    EmptyParameterName(usize),
}

/// Typed bind value. The variant picks the SQL type the store sees.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    OptText(Option<String>),
    Int(i32),
    Bit(bool),
    Timestamp(DateTime<Utc>),
}

/// SQL template with `@name` placeholders plus its bindings.
#[derive(Debug, Clone)]
pub struct Statement {
    template: String,
    bindings: Vec<(String, Param)>,
}

/// Positional form of a [`Statement`], ready for sqlx.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Statement {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, name: impl Into<String>, value: Param) -> Self {
        let name = name.into();
        if let Some(slot) = self.bindings.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.bindings.push((name, value));
        }
        self
    }

    /// Rewrite `@name` into `$n` in order of first appearance.
    ///
    /// Repeated names share one position. `@` inside single-quoted literals is left alone.
    pub fn compile(&self) -> Result<CompiledStatement, StatementError> {
        let mut sql = String::with_capacity(self.template.len());
        let mut order: Vec<&str> = Vec::new();
        let mut params = Vec::new();
        let mut in_literal = false;

        let bytes = self.template.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i] as char;
            if c == '\'' {
                in_literal = !in_literal;
                sql.push(c);
                i += 1;
                continue;
            }
            if c != '@' || in_literal {
                // Copy the full UTF-8 sequence starting here
                let ch = self.template[i..].chars().next().unwrap_or(c);
                sql.push(ch);
                i += ch.len_utf8();
                continue;
            }

            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            if end == start {
                return Err(StatementError::EmptyParameterName(i));
            }

            let name = &self.template[start..end];
            let position = match order.iter().position(|n| *n == name) {
                Some(p) => p + 1,
                None => {
                    let value = self
                        .bindings
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| v.clone())
                        .ok_or_else(|| StatementError::UnboundParameter(name.to_string()))?;
                    order.push(name);
                    params.push(value);
                    order.len()
                }
            };

            sql.push('$');
            sql.push_str(&position.to_string());
            i = end;
        }

        Ok(CompiledStatement { sql, params })
    }
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    p: &Param,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match p {
        Param::Text(s) => q.bind(s.clone()),
        Param::OptText(s) => q.bind(s.clone()),
        Param::Int(i) => q.bind(*i),
        Param::Bit(b) => q.bind(*b),
        Param::Timestamp(t) => q.bind(*t),
    }
}

pub(crate) fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    p: &Param,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        Param::Text(s) => q.bind(s.clone()),
        Param::OptText(s) => q.bind(s.clone()),
        Param::Int(i) => q.bind(*i),
        Param::Bit(b) => q.bind(*b),
        Param::Timestamp(t) => q.bind(*t),
    }
}

pub(crate) fn bind_param_query_scalar<'q, O>(
    q: sqlx::query::QueryScalar<'q, Postgres, O, PgArguments>,
    p: &Param,
) -> sqlx::query::QueryScalar<'q, Postgres, O, PgArguments> {
    match p {
        Param::Text(s) => q.bind(s.clone()),
        Param::OptText(s) => q.bind(s.clone()),
        Param::Int(i) => q.bind(*i),
        Param::Bit(b) => q.bind(*b),
        Param::Timestamp(t) => q.bind(*t),
    }
}

/// Double-quote an identifier for interpolation into SQL text.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
