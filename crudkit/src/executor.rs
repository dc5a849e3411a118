use crate::error::DataError;
use crate::row::{Row, Value};
use std::future::Future;

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// The identifier assigned to the most recent insert on the connection.
    pub last_insert_id: i64,
}

/// Mechanical execution of parameterized SQL, decoupled from SQL
/// construction.
///
/// Backend crates (e.g. `crudkit-sqlx`) implement this over a concrete
/// driver. Uses RPITIT (return-position `impl Trait` in traits) — no
/// `async-trait` needed.
///
/// A zero-row result is never an error: `fetch_all` returns an empty vec,
/// `fetch_one` and `fetch_scalar` return `None`. `fetch_scalar` returning
/// `Some(Value::Integer(0))` is distinct from `None`.
pub trait Executor: Send + Sync {
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<ExecResult, DataError>> + Send;

    fn fetch_all(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send;

    fn fetch_one(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<Row>, DataError>> + Send;

    fn fetch_scalar(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<Value>, DataError>> + Send;
}
