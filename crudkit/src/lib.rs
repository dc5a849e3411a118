pub mod entity;
pub mod error;
pub mod executor;
pub mod page;
pub mod repository;
pub mod row;
pub mod sort;
pub mod sql;

pub use entity::Entity;
pub use error::DataError;
pub use executor::{ExecResult, Executor};
pub use page::{Page, Pageable};
pub use repository::CrudRepository;
pub use row::{Row, Value};
pub use sort::{Direction, SortKey};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{CrudRepository, DataError, Entity, Executor, Page, Pageable, Row, Value};
}
