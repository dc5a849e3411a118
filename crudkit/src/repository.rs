use std::collections::HashMap;
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::DataError;
use crate::executor::Executor;
use crate::page::{Page, Pageable};
use crate::row::{Row, Value};
use crate::sort::SortKey;
use crate::sql;

/// A generic CRUD repository for one entity type.
///
/// Builds SQL from the entity's declared table name and column list and
/// delegates execution to an [`Executor`]. Every column name that ends up in
/// SQL text — projection columns, sort columns, data keys — is drawn from the
/// entity's declared columns; anything else a caller supplies is silently
/// dropped. Values, including the identifier, are always bound as
/// parameters.
///
/// # Example
///
/// ```ignore
/// let repo = CrudRepository::<Contact, _>::new(SqlxExecutor::new(pool));
/// let id = repo.create(&data).await?;
/// let row = repo.get_by_id(id, None).await?;
/// ```
pub struct CrudRepository<E, X> {
    executor: X,
    _marker: PhantomData<E>,
}

impl<E, X> CrudRepository<E, X> {
    pub fn new(executor: X) -> Self {
        Self {
            executor,
            _marker: PhantomData,
        }
    }

    /// Get the underlying executor reference.
    pub fn executor(&self) -> &X {
        &self.executor
    }
}

impl<E, X: Clone> Clone for CrudRepository<E, X> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity, X: Executor> CrudRepository<E, X> {
    /// The number of rows in the entity's table.
    pub async fn count(&self) -> Result<u64, DataError> {
        let sql = sql::count(E::table_name());
        let value = self.executor.fetch_scalar(&sql, &[]).await?;
        Ok(value.and_then(|v| v.as_integer()).unwrap_or(0) as u64)
    }

    /// Fetch a single row by identifier, or `None` when no row matches.
    ///
    /// `columns` limits the projection; unrecognized names are dropped and
    /// `id` is always included.
    pub async fn get_by_id(
        &self,
        id: i64,
        columns: Option<&[&str]>,
    ) -> Result<Option<Row>, DataError> {
        let projection = Self::projection(columns);
        let sql = sql::select_by_id(E::table_name(), &projection);
        self.executor.fetch_one(&sql, &[Value::Integer(id)]).await
    }

    /// Fetch rows with optional projection, sort, and pagination.
    ///
    /// `sort` entries are `"column[:direction]"` specs; entries naming an
    /// unrecognized column are dropped, and directions other than `desc`
    /// normalize to ascending. Supplying `offset` without `count`, or `count`
    /// without `sort`, is an [`DataError::InvalidArgument`]: a pagination
    /// window over an undefined order would not be reproducible.
    pub async fn get(
        &self,
        columns: Option<&[&str]>,
        sort: Option<&[&str]>,
        count: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>, DataError> {
        if count.is_none() && offset.is_some() {
            return Err(DataError::invalid_argument(
                "count must be provided when offset is given",
            ));
        }
        if sort.is_none() && count.is_some() {
            return Err(DataError::invalid_argument(
                "sort must be provided when count is given",
            ));
        }

        let projection = Self::projection(columns);
        let keys: Vec<SortKey> = sort
            .unwrap_or_default()
            .iter()
            .map(|spec| SortKey::parse(spec))
            .filter(|key| Self::is_known_column(&key.column))
            .collect();

        let sql = sql::select(E::table_name(), &projection, &keys, count, offset);
        self.executor.fetch_all(&sql, &[]).await
    }

    /// Create a new row and return the database-assigned identifier.
    ///
    /// `data` is filtered to the declared columns; unknown keys (including
    /// `id`) are dropped. Every declared column must be present — creation of
    /// a partial row is a caller error.
    pub async fn create(&self, data: &HashMap<String, Value>) -> Result<i64, DataError> {
        let (columns, params) = Self::filter_data(data);
        if columns.len() != E::columns().len() {
            let missing: Vec<&str> = E::columns()
                .iter()
                .copied()
                .filter(|column| !data.contains_key(*column))
                .collect();
            return Err(DataError::invalid_argument(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let sql = sql::insert(E::table_name(), &columns);
        let result = self.executor.execute(&sql, &params).await?;
        Ok(result.last_insert_id)
    }

    /// Update a row by identifier.
    ///
    /// `data` is filtered like in [`create`](Self::create), but partial data
    /// is accepted; only the columns present are assigned. An update in which
    /// no declared column survives filtering is a caller error — there is
    /// nothing to set. Updating a nonexistent identifier succeeds and
    /// affects zero rows.
    pub async fn update(&self, id: i64, data: &HashMap<String, Value>) -> Result<(), DataError> {
        let (columns, mut params) = Self::filter_data(data);
        if columns.is_empty() {
            return Err(DataError::invalid_argument(
                "no recognized columns to update",
            ));
        }

        let sql = sql::update(E::table_name(), &columns);
        params.push(Value::Integer(id));
        self.executor.execute(&sql, &params).await?;
        Ok(())
    }

    /// Delete a row by identifier. Deleting a nonexistent identifier
    /// succeeds and affects zero rows.
    pub async fn delete(&self, id: i64) -> Result<(), DataError> {
        let sql = sql::delete(E::table_name());
        self.executor.execute(&sql, &[Value::Integer(id)]).await?;
        Ok(())
    }

    /// Fetch one page of rows plus pagination metadata.
    ///
    /// Composes [`count`](Self::count) and [`get`](Self::get); the pageable's
    /// sort spec is subject to the same rules as `get`, so a pageable without
    /// a sort is an [`DataError::InvalidArgument`].
    pub async fn get_page(&self, pageable: &Pageable) -> Result<Page<Row>, DataError> {
        let total = self.count().await?;
        let sort_specs: Option<Vec<&str>> = pageable
            .sort
            .as_deref()
            .map(|specs| specs.split(',').map(str::trim).collect());
        let rows = self
            .get(
                None,
                sort_specs.as_deref(),
                Some(pageable.size),
                Some(pageable.offset()),
            )
            .await?;
        Ok(Page::new(rows, pageable, total))
    }

    fn is_known_column(column: &str) -> bool {
        column == "id" || E::columns().iter().any(|c| *c == column)
    }

    /// The column list for a read, in the order it appears in the statement.
    ///
    /// Requested columns are filtered against the declared list in request
    /// order (duplicates collapsed); an empty or absent request means the
    /// full declared list. `id` is always appended.
    fn projection(requested: Option<&[&str]>) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = match requested {
            Some(requested) if !requested.is_empty() => {
                let mut columns = Vec::with_capacity(requested.len());
                for name in requested {
                    if let Some(column) = E::columns().iter().copied().find(|c| c == name) {
                        if !columns.contains(&column) {
                            columns.push(column);
                        }
                    }
                }
                columns
            }
            _ => E::columns().to_vec(),
        };
        columns.push("id");
        columns
    }

    /// Restrict `data` to the declared columns, in declared order, so that
    /// generated statements are deterministic. Unknown keys and `id` never
    /// make it through.
    fn filter_data(data: &HashMap<String, Value>) -> (Vec<&'static str>, Vec<Value>) {
        let mut columns = Vec::with_capacity(E::columns().len());
        let mut params = Vec::with_capacity(E::columns().len());
        for &column in E::columns() {
            if let Some(value) = data.get(column) {
                columns.push(column);
                params.push(value.clone());
            }
        }
        (columns, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecResult;
    use std::sync::Mutex;

    struct Contact;

    impl Entity for Contact {
        fn table_name() -> &'static str {
            "contact"
        }

        fn columns() -> &'static [&'static str] {
            &["name", "email", "age"]
        }
    }

    /// Records every statement instead of touching a database.
    #[derive(Default)]
    struct RecordingExecutor {
        statements: Mutex<Vec<(String, Vec<Value>)>>,
    }

    impl RecordingExecutor {
        fn record(&self, sql: &str, params: &[Value]) {
            self.statements
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
        }

        fn last(&self) -> (String, Vec<Value>) {
            self.statements.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Executor for RecordingExecutor {
        async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult, DataError> {
            self.record(sql, params);
            Ok(ExecResult {
                rows_affected: 1,
                last_insert_id: 7,
            })
        }

        async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DataError> {
            self.record(sql, params);
            Ok(Vec::new())
        }

        async fn fetch_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, DataError> {
            self.record(sql, params);
            Ok(None)
        }

        async fn fetch_scalar(
            &self,
            sql: &str,
            params: &[Value],
        ) -> Result<Option<Value>, DataError> {
            self.record(sql, params);
            Ok(Some(Value::Integer(3)))
        }
    }

    fn repo() -> CrudRepository<Contact, RecordingExecutor> {
        CrudRepository::new(RecordingExecutor::default())
    }

    fn full_data() -> HashMap<String, Value> {
        HashMap::from([
            ("name".to_string(), Value::from("alice")),
            ("email".to_string(), Value::from("alice@example.com")),
            ("age".to_string(), Value::Integer(30)),
        ])
    }

    #[tokio::test]
    async fn test_create_whitelists_data() {
        let repo = repo();
        let mut data = full_data();
        data.insert("evil; DROP TABLE x".to_string(), Value::from("boom"));

        let id = repo.create(&data).await.unwrap();
        assert_eq!(id, 7);

        let (sql, params) = repo.executor().last();
        assert_eq!(
            sql,
            "INSERT INTO \"contact\" (\"id\", \"name\", \"email\", \"age\") VALUES (NULL, ?, ?, ?)"
        );
        assert!(!sql.contains("evil"));
        assert_eq!(params.len(), 3);
        assert!(!params.contains(&Value::Text("boom".into())));
    }

    #[tokio::test]
    async fn test_create_strips_id_key() {
        let repo = repo();
        let mut data = full_data();
        data.insert("id".to_string(), Value::Integer(999));

        repo.create(&data).await.unwrap();

        let (sql, params) = repo.executor().last();
        assert_eq!(
            sql,
            "INSERT INTO \"contact\" (\"id\", \"name\", \"email\", \"age\") VALUES (NULL, ?, ?, ?)"
        );
        assert!(!params.contains(&Value::Integer(999)));
    }

    #[tokio::test]
    async fn test_create_requires_all_columns() {
        let repo = repo();
        let mut data = full_data();
        data.remove("age");

        let err = repo.create(&data).await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument(msg) if msg.contains("age")));
        assert!(repo.executor().statements.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_allows_partial_data_and_binds_id_last() {
        let repo = repo();
        let mut data = HashMap::from([("name".to_string(), Value::from("bob"))]);
        data.insert("id".to_string(), Value::Integer(999));

        repo.update(42, &data).await.unwrap();

        let (sql, params) = repo.executor().last();
        assert_eq!(sql, "UPDATE \"contact\" SET \"name\" = ? WHERE \"id\" = ?");
        assert_eq!(
            params,
            vec![Value::Text("bob".into()), Value::Integer(42)]
        );
    }

    #[tokio::test]
    async fn test_update_with_no_recognized_columns_is_an_error() {
        let repo = repo();
        let data = HashMap::from([("bogus".to_string(), Value::from("x"))]);

        let err = repo.update(1, &data).await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_by_id_projection_always_includes_id() {
        let repo = repo();
        repo.get_by_id(5, Some(&["email", "bogus"][..]))
            .await
            .unwrap();

        let (sql, params) = repo.executor().last();
        assert_eq!(
            sql,
            "SELECT \"email\", \"id\" FROM \"contact\" WHERE \"id\" = ?"
        );
        assert_eq!(params, vec![Value::Integer(5)]);
    }

    #[tokio::test]
    async fn test_get_defaults_to_full_projection() {
        let repo = repo();
        repo.get(None, None, None, None).await.unwrap();

        let (sql, _) = repo.executor().last();
        assert_eq!(
            sql,
            "SELECT \"name\", \"email\", \"age\", \"id\" FROM \"contact\""
        );
    }

    #[tokio::test]
    async fn test_get_drops_unknown_sort_columns_and_normalizes_direction() {
        let repo = repo();
        repo.get(None, Some(&["name:desc", "bogus:asc", "id:wat"][..]), None, None)
            .await
            .unwrap();

        let (sql, _) = repo.executor().last();
        assert!(sql.ends_with("ORDER BY \"name\" DESC, \"id\" ASC"));
        assert!(!sql.contains("bogus"));
    }

    #[tokio::test]
    async fn test_get_offset_requires_count() {
        let repo = repo();
        let err = repo.get(None, None, None, Some(5)).await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_count_requires_sort() {
        let repo = repo();
        let err = repo.get(None, None, Some(5), None).await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_with_window() {
        let repo = repo();
        repo.get(None, Some(&["id"][..]), Some(2), Some(1))
            .await
            .unwrap();

        let (sql, _) = repo.executor().last();
        assert!(sql.ends_with("ORDER BY \"id\" ASC LIMIT 2 OFFSET 1"));
    }

    #[tokio::test]
    async fn test_count() {
        let repo = repo();
        let count = repo.count().await.unwrap();
        assert_eq!(count, 3);

        let (sql, params) = repo.executor().last();
        assert_eq!(sql, "SELECT COUNT(\"id\") FROM \"contact\"");
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn test_delete_binds_id() {
        let repo = repo();
        repo.delete(9).await.unwrap();

        let (sql, params) = repo.executor().last();
        assert_eq!(sql, "DELETE FROM \"contact\" WHERE \"id\" = ?");
        assert_eq!(params, vec![Value::Integer(9)]);
    }

    #[tokio::test]
    async fn test_get_page_requires_sort() {
        let repo = repo();
        let err = repo.get_page(&Pageable::default()).await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_page_builds_window_from_pageable() {
        let repo = repo();
        let pageable = Pageable {
            page: 2,
            size: 10,
            sort: Some("name:desc,id".to_string()),
        };
        let page = repo.get_page(&pageable).await.unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.page, 2);

        let (sql, _) = repo.executor().last();
        assert!(sql.ends_with("ORDER BY \"name\" DESC, \"id\" ASC LIMIT 10 OFFSET 20"));
    }
}
