use {
    crate::{AppDataHash, hash_full_app_data},
    serde::Serialize,
};

/// Outcome of checking an order's app data hash against the full app data
/// document the API returned for it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AppDataVerification {
    /// The app data is all zeros, the document is assumed to be
    /// [`crate::EMPTY`]. Nothing was hashed.
    VerifiedEmpty,
    /// keccak-256 of the document equals the app data.
    Verified,
    /// The app data is set but there is no document to check it against.
    MissingPreimage,
    /// keccak-256 of the document differs from the app data.
    Mismatch { computed: AppDataHash },
}

#[derive(Debug, thiserror::Error, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    #[error("order has no app data preimage")]
    MissingPreimage,
    #[error("app data {expected:?} does not match keccak-256 of the document {computed:?}")]
    Mismatch {
        expected: AppDataHash,
        computed: AppDataHash,
    },
}

impl AppDataVerification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::VerifiedEmpty | Self::Verified)
    }

    /// Turns the unsuccessful outcomes into errors. `expected` is the app data
    /// the outcome was computed for.
    pub fn into_result(self, expected: AppDataHash) -> Result<Self, Error> {
        match self {
            Self::VerifiedEmpty | Self::Verified => Ok(self),
            Self::MissingPreimage => Err(Error::MissingPreimage),
            Self::Mismatch { computed } => Err(Error::Mismatch { expected, computed }),
        }
    }
}

/// Checks that `document` is the preimage of `app_data`.
///
/// Only the simple IPFS hashing path is implemented (see
/// [`hash_full_app_data`]): documents large enough to be chunked by IPFS
/// will be reported as [`AppDataVerification::Mismatch`] even if the order
/// is fine.
pub fn verify(app_data: &AppDataHash, document: Option<&str>) -> AppDataVerification {
    if app_data.is_zero() {
        return AppDataVerification::VerifiedEmpty;
    }
    let Some(document) = document else {
        return AppDataVerification::MissingPreimage;
    };
    let computed = AppDataHash(hash_full_app_data(document.as_bytes()));
    if computed == *app_data {
        AppDataVerification::Verified
    } else {
        AppDataVerification::Mismatch { computed }
    }
}
