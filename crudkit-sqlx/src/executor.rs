use crudkit::error::DataError;
use crudkit::executor::{ExecResult, Executor};
use crudkit::row::{Row, Value};

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};

use crate::error::SqlxErrorExt;

/// An [`Executor`] implementation over an `sqlx::SqlitePool`.
///
/// Purely mechanical: binds the supplied parameters, runs the statement, and
/// materializes results as [`Row`]s. Owns no SQL-construction or
/// whitelisting logic.
#[derive(Clone)]
pub struct SqlxExecutor {
    pool: SqlitePool,
}

impl SqlxExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn query<'q>(sql: &'q str, params: &'q [Value]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<String>),
                Value::Integer(i) => query.bind(*i),
                Value::Real(r) => query.bind(*r),
                Value::Text(s) => query.bind(s.as_str()),
            };
        }
        query
    }
}

impl Executor for SqlxExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult, DataError> {
        tracing::debug!(sql, "executing statement");
        let result = Self::query(sql, params)
            .execute(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DataError> {
        tracing::debug!(sql, "fetching rows");
        let rows = Self::query(sql, params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        rows.iter().map(decode_row).collect()
    }

    async fn fetch_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, DataError> {
        tracing::debug!(sql, "fetching row");
        let row = Self::query(sql, params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn fetch_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<Value>, DataError> {
        tracing::debug!(sql, "fetching scalar");
        let row = Self::query(sql, params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        match row {
            Some(row) if !row.columns().is_empty() => Ok(Some(decode_value(&row, 0)?)),
            _ => Ok(None),
        }
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row, DataError> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), decode_value(row, index)?);
    }
    Ok(out)
}

/// Decode one cell by its runtime storage class. SQLite types values, not
/// columns, so the branch has to look at the value itself.
fn decode_value(row: &SqliteRow, index: usize) -> Result<Value, DataError> {
    let raw = row.try_get_raw(index).map_err(|e| e.into_data_error())?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_string();

    let value = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => Value::Integer(
            row.try_get::<i64, _>(index)
                .map_err(|e| e.into_data_error())?,
        ),
        "REAL" => Value::Real(
            row.try_get::<f64, _>(index)
                .map_err(|e| e.into_data_error())?,
        ),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(index).map_err(|e| e.into_data_error())?;
            Value::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::Text(
            row.try_get::<String, _>(index)
                .map_err(|e| e.into_data_error())?,
        ),
    };
    Ok(value)
}
