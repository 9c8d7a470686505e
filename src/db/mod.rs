pub mod connector;
pub mod repository;

pub use connector::Database;
pub use repository::DbError;
