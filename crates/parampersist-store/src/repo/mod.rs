//! Repository layer for instance and param rows

pub mod models;
pub mod sqlite_repo;

pub use models::{InstanceRow, ParamRow};
pub use sqlite_repo::SqliteRepo;
