use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::statement::Param;

/// Storage type of a content column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Bit,
    Timestamp,
}

/// How a column is supplied on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCreate {
    Required,
    Optional,
    /// Filled by the store with `NOW()`; any client value is ignored.
    StoreNow,
}

/// How a column is supplied on a full-field update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnUpdate {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub on_create: OnCreate,
    pub on_update: OnUpdate,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind, on_create: OnCreate, on_update: OnUpdate) -> Self {
        Self { name, kind, on_create, on_update }
    }

    /// Whether the column may hold NULL in the store.
    pub fn nullable(&self) -> bool {
        self.on_create == OnCreate::Optional || self.on_update == OnUpdate::Optional
    }
}

/// Static description of one content entity: its table, fields and listing order.
///
/// The identifier column `id` is implicit and never listed in `columns`.
#[derive(Debug)]
pub struct EntitySchema {
    /// Route segment, e.g. `post` in `/api/post/create`.
    pub name: &'static str,
    /// Capitalized name used in response messages.
    pub label: &'static str,
    pub table: &'static str,
    pub columns: &'static [Column],
    pub order_by: &'static [(&'static str, SortDirection)],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Missing required fields: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid value for field '{0}'")]
    Invalid(String),
}

impl EntitySchema {
    /// Bindings for an insert. Every create-required field must be present before any is converted.
    pub fn create_params(&self, body: &Map<String, Value>) -> Result<Vec<(&'static str, Param)>, FieldError> {
        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.on_create == OnCreate::Required && is_missing(c.kind, body.get(c.name)))
            .map(|c| c.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FieldError::Missing(missing));
        }

        self.columns
            .iter()
            .filter(|c| c.on_create != OnCreate::StoreNow)
            .map(|c| Ok((c.name, to_param(c, body.get(c.name))?)))
            .collect()
    }

    /// Identifier plus bindings for a full-field update.
    pub fn update_params(&self, body: &Map<String, Value>) -> Result<(i32, Vec<(&'static str, Param)>), FieldError> {
        let mut missing = Vec::new();
        if id_is_missing(body.get("id")) {
            missing.push("id".to_string());
        }
        missing.extend(
            self.columns
                .iter()
                .filter(|c| c.on_update == OnUpdate::Required && is_missing(c.kind, body.get(c.name)))
                .map(|c| c.name.to_string()),
        );
        if !missing.is_empty() {
            return Err(FieldError::Missing(missing));
        }

        let id = body
            .get("id")
            .and_then(parse_id)
            .ok_or_else(|| FieldError::Invalid("id".to_string()))?;

        let params = self
            .columns
            .iter()
            .map(|c| Ok((c.name, to_param(c, body.get(c.name))?)))
            .collect::<Result<Vec<_>, FieldError>>()?;

        Ok((id, params))
    }
}

fn is_missing(kind: ColumnKind, value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) if kind != ColumnKind::Bit => s.is_empty(),
        _ => false,
    }
}

fn id_is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Number(n)) => n.as_i64() == Some(0),
        _ => false,
    }
}

/// Accepts a JSON integer or a decimal string that fits in `i32`.
pub fn parse_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn to_param(column: &Column, value: Option<&Value>) -> Result<Param, FieldError> {
    let invalid = || FieldError::Invalid(column.name.to_string());

    match column.kind {
        ColumnKind::Text => match value {
            Some(Value::String(s)) if column.nullable() && s.is_empty() => Ok(Param::OptText(None)),
            Some(Value::String(s)) if column.nullable() => Ok(Param::OptText(Some(s.clone()))),
            Some(Value::String(s)) => Ok(Param::Text(s.clone())),
            None | Some(Value::Null) if column.nullable() => Ok(Param::OptText(None)),
            _ => Err(invalid()),
        },
        ColumnKind::Bit => match value {
            Some(Value::Bool(b)) => Ok(Param::Bit(*b)),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => Ok(Param::Bit(false)),
                Some(1) => Ok(Param::Bit(true)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        },
        ColumnKind::Timestamp => match value {
            Some(Value::String(s)) => parse_timestamp(s).map(Param::Timestamp).ok_or_else(invalid),
            _ => Err(invalid()),
        },
    }
}

/// RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC), or a bare date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
