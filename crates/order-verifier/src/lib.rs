//! Verifies CoW Protocol orders fetched from the orderbook API: the app data
//! document must hash to the order's app data and the order data must hash to
//! the order's UID.
pub mod arguments;
pub mod dto;
pub mod network;
pub mod orderbook_api;
pub mod run;
pub mod verification;

pub use run::start;
