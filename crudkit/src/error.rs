/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// A caller precondition was violated before any SQL was issued.
    InvalidArgument(String),
    /// The database rejected or failed to execute a statement.
    Database(Box<dyn std::error::Error + Send + Sync>),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `crudkit-sqlx`) to wrap driver-specific
    /// errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DataError::InvalidArgument(msg.into())
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
