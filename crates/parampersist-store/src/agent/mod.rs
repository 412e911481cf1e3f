//! Persistence agent: save, load, update and delete parameterized objects

mod base;
mod sqlite_agent;

pub use base::PersistenceAgent;
pub use sqlite_agent::SqliteAgent;
