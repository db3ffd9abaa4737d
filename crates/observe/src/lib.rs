//! Logging setup shared by the binaries and helpers to initialize it in
//! tests.
pub mod config;
pub mod tracing;

pub use config::Config;
