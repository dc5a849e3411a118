//! # crudkit-sqlx — SQLx backend for the crudkit data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! implementation of crudkit's [`Executor`](crudkit::Executor) trait. It
//! depends on [`crudkit`] for the abstract traits and types, and adds the
//! statement executor and error bridging needed to talk to a real SQLite
//! database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxExecutor`] | `Executor` implementation over an `sqlx::SqlitePool` |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Quick start
//!
//! ```ignore
//! use crudkit::{CrudRepository, Entity};
//! use crudkit_sqlx::SqlxExecutor;
//!
//! let pool = sqlx::SqlitePool::connect("sqlite:app.db").await?;
//! let repo = CrudRepository::<Contact, _>::new(SqlxExecutor::new(pool));
//! let id = repo.create(&data).await?;
//! ```
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead:
//!
//! ```ignore
//! use crudkit_sqlx::SqlxErrorExt;
//!
//! sqlx::query("SELECT 1")
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

pub mod error;
pub mod executor;

pub use error::{SqlxErrorExt, SqlxResult};
pub use executor::SqlxExecutor;

/// Re-exports of the most commonly used types from both `crudkit` and this crate.
pub mod prelude {
    pub use crate::{SqlxErrorExt, SqlxExecutor};
    pub use crudkit::prelude::*;
}
