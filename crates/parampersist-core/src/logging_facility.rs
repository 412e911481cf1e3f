//! Structured logging facility for ParamPersist
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Boundary logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use parampersist_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! The persistence agent owns lifecycle logging for its four operations.
//! Lower layers (row repository, serializer) only emit `tracing::debug!`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
