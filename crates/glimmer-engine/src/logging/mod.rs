//! Logging setup.
//!
//! The engine itself only uses the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
