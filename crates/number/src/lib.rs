//! Parsing and serialization helpers for 256-bit token amounts.

pub mod serialization;

pub use serialization::{HexOrDecimalU256, ParseU256Error, parse_u256};
