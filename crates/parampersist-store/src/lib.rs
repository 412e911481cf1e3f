//! ParamPersist Store - SQLite persistence for parameterized objects
//!
//! Provides:
//! - Connection management with a scoped transaction per operation
//! - Embedded schema migrations with checksums
//! - Instance/Param row repository
//! - The persistence agent (save, load, update, delete)
//! - TOML configuration

pub mod agent;
pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use agent::{PersistenceAgent, SqliteAgent};
pub use config::AgentConfig;
pub use db::Database;
pub use errors::Result;
