//! Logging utilities.
//!
//! The library itself only emits through the `log` facade. Binaries and tests
//! call [`init_logging`] to install the `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
