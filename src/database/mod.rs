pub mod adapter;
pub mod error;
pub mod models;
pub mod repository;
pub mod schema;
pub mod statement;

pub use adapter::DataAccessAdapter;
pub use error::DatabaseError;
pub use repository::Repository;
pub use statement::{Param, Statement, StatementError};
