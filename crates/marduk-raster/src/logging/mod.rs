//! Logging utilities.
//!
//! The painter only talks to the `log` facade; this module wires up the
//! `env_logger` backend for binaries and tests that want output.

mod init;

pub use init::{init_logging, init_test_logging, LoggingConfig};
