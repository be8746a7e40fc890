use std::time::{Duration, Instant};

use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::database::error::DatabaseError;
use crate::database::statement::{
    bind_param_query, bind_param_query_as, bind_param_query_scalar, CompiledStatement, Statement,
};

/// Runs exactly one statement per call on a freshly opened connection.
///
/// Nothing is pooled or kept between calls; each method connects, executes, and closes
/// the connection before returning, whether the statement succeeded or not.
#[derive(Clone)]
pub struct DataAccessAdapter {
    options: PgConnectOptions,
    connect_timeout: Duration,
    log_queries: bool,
    slow_query_threshold: Duration,
}

impl DataAccessAdapter {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
            connect_timeout: config.connect_timeout(),
            log_queries: config.enable_query_logging,
            slow_query_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        }
    }

    /// Zero rows is `Ok(None)`, never an error.
    pub async fn fetch_optional<T>(&self, statement: Statement) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let compiled = statement.compile()?;
        let mut conn = self.connect().await?;
        let started = Instant::now();

        let mut q = sqlx::query_as::<_, T>(&compiled.sql);
        for p in compiled.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let result = q.fetch_optional(&mut conn).await;

        self.finish(conn, &compiled, started).await;
        Ok(result?)
    }

    /// Rows come back in arrival order.
    pub async fn fetch_all<T>(&self, statement: Statement) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let compiled = statement.compile()?;
        let mut conn = self.connect().await?;
        let started = Instant::now();

        let mut q = sqlx::query_as::<_, T>(&compiled.sql);
        for p in compiled.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let result = q.fetch_all(&mut conn).await;

        self.finish(conn, &compiled, started).await;
        Ok(result?)
    }

    /// For `INSERT ... RETURNING id`. A statement that yields no row is a query error.
    pub async fn fetch_scalar_id(&self, statement: Statement) -> Result<i32, DatabaseError> {
        let compiled = statement.compile()?;
        let mut conn = self.connect().await?;
        let started = Instant::now();

        let mut q = sqlx::query_scalar::<_, i32>(&compiled.sql);
        for p in compiled.params.iter() {
            q = bind_param_query_scalar(q, p);
        }
        let result = q.fetch_optional(&mut conn).await;

        self.finish(conn, &compiled, started).await;
        result?.ok_or_else(|| DatabaseError::QueryError("statement returned no identifier".to_string()))
    }

    /// Returns the affected-row count; zero is how callers detect a missing row.
    pub async fn execute(&self, statement: Statement) -> Result<u64, DatabaseError> {
        let compiled = statement.compile()?;
        let mut conn = self.connect().await?;
        let started = Instant::now();

        let mut q = sqlx::query(&compiled.sql);
        for p in compiled.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q.execute(&mut conn).await;

        self.finish(conn, &compiled, started).await;
        Ok(result?.rows_affected())
    }

    /// Connect, `SELECT 1`, close.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        self.execute(Statement::new("SELECT 1")).await.map(|_| ())
    }

    async fn connect(&self) -> Result<PgConnection, DatabaseError> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(DatabaseError::Connect(e.to_string())),
            Err(_) => Err(DatabaseError::Connect(format!(
                "timed out after {}s",
                self.connect_timeout.as_secs()
            ))),
        }
    }

    async fn finish(&self, conn: PgConnection, compiled: &CompiledStatement, started: Instant) {
        let elapsed = started.elapsed();
        if self.log_queries {
            debug!(sql = %compiled.sql, params = compiled.params.len(), ?elapsed, "statement executed");
        }
        if elapsed >= self.slow_query_threshold {
            warn!(sql = %compiled.sql, ?elapsed, "slow statement");
        }
        if let Err(e) = conn.close().await {
            debug!("Error closing database connection: {}", e);
        }
    }
}
