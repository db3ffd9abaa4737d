//! App data is the 32 bytes of user controlled data that get signed along
//! with an order. Off-chain it is the keccak-256 hash of a JSON document (the
//! "full app data") which doubles as the document's IPFS content identifier.

mod app_data_hash;
mod verification;

pub use {
    app_data_hash::{AppDataHash, cid, create_ipfs_cid, hash_full_app_data},
    verification::{AppDataVerification, Error, verify},
};

/// The minimum valid empty app data JSON string. An all-zero app data hash
/// is treated as referring to this document.
pub const EMPTY: &str = "{}";
