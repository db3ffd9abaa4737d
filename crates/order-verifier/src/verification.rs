//! Checks a fetched order against the UID it was requested by.

use {
    crate::orderbook_api::OrderSource,
    alloy::primitives::Address,
    app_data::{AppDataHash, AppDataVerification},
    model::{
        DomainSeparator,
        eip712,
        order::{
            MalformedInput,
            OrderData,
            OrderUid,
            UidMismatch,
            UidVerificationError,
            verify_uid,
        },
    },
    serde::Serialize,
    serde_with::SerializeDisplay,
};

/// Everything that can make an order fail verification.
#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq, SerializeDisplay)]
pub enum Failure {
    #[error("failed to fetch order: {0}")]
    Fetch(String),
    #[error("malformed order: {0}")]
    MalformedInput(#[from] MalformedInput),
    #[error("order has no app data preimage")]
    MissingPreimage,
    #[error("app data {expected} does not match keccak-256 of the document {computed}")]
    MetadataMismatch {
        expected: AppDataHash,
        computed: AppDataHash,
    },
    #[error("{mismatch}, differing parts: {}", .mismatch.differing_parts().join(", "))]
    IdentifierMismatch { mismatch: UidMismatch },
    #[error("failed to encode order: {0}")]
    Encoding(#[from] eip712::Error),
}

impl Failure {
    /// A recomputed UID that differs from the requested one means the
    /// verifier and the protocol disagree on how orders are hashed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IdentifierMismatch { .. } | Self::Encoding(_))
    }
}

impl From<app_data::Error> for Failure {
    fn from(err: app_data::Error) -> Self {
        match err {
            app_data::Error::MissingPreimage => Self::MissingPreimage,
            app_data::Error::Mismatch { expected, computed } => {
                Self::MetadataMismatch { expected, computed }
            }
        }
    }
}

impl From<UidVerificationError> for Failure {
    fn from(err: UidVerificationError) -> Self {
        match err {
            UidVerificationError::Encoding(err) => Self::Encoding(err),
            UidVerificationError::Mismatch(mismatch) => Self::IdentifierMismatch { mismatch },
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDataReport {
    pub hash: AppDataHash,
    /// IPFS CID under which the document can be looked up.
    pub cid: String,
    #[serde(flatten)]
    pub verification: AppDataVerification,
}

/// The result of verifying one order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub uid: OrderUid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_data: Option<AppDataReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_uid: Option<OrderUid>,
    pub failures: Vec<Failure>,
}

impl Report {
    fn failed(uid: OrderUid, owner: Option<Address>, failure: Failure) -> Self {
        Self {
            uid,
            owner,
            app_data: None,
            computed_uid: None,
            failures: vec![failure],
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Emits the report as tracing events.
    pub fn log(&self) {
        let uid = self.uid;
        if let Some(report) = &self.app_data {
            match report.verification {
                AppDataVerification::VerifiedEmpty => tracing::info!(
                    %uid,
                    "zero app data, the document is assumed to be {}",
                    app_data::EMPTY
                ),
                AppDataVerification::Verified => tracing::info!(
                    %uid,
                    cid = %report.cid,
                    "app data matches keccak-256 of the document"
                ),
                AppDataVerification::MissingPreimage | AppDataVerification::Mismatch { .. } => {}
            }
        }
        if let Some(computed) = self.computed_uid.filter(|computed| *computed == uid) {
            tracing::info!(%uid, %computed, "recomputed order UID matches");
        }
        for failure in &self.failures {
            if failure.is_fatal() {
                tracing::error!(%uid, %failure, "order verification failed");
            } else {
                tracing::warn!(%uid, %failure, "order verification failed");
            }
        }
    }
}

/// Checks the app data document and recomputes the UID of an order.
///
/// Both checks always run so a report lists every problem of the order.
pub fn check(
    uid: &OrderUid,
    order: &OrderData,
    owner: &Address,
    full_app_data: Option<&str>,
    domain: &DomainSeparator,
) -> Report {
    let mut failures: Vec<Failure> = Vec::new();

    let verification = app_data::verify(&order.app_data, full_app_data);
    if let Err(err) = verification.into_result(order.app_data) {
        failures.push(err.into());
    }

    let computed_uid = match verify_uid(order, owner, domain, uid) {
        Ok(computed) => Some(computed),
        Err(err) => {
            let computed = match &err {
                UidVerificationError::Mismatch(mismatch) => Some(mismatch.computed),
                UidVerificationError::Encoding(_) => None,
            };
            failures.push(err.into());
            computed
        }
    };

    Report {
        uid: *uid,
        owner: Some(*owner),
        app_data: Some(AppDataReport {
            hash: order.app_data,
            cid: app_data::cid(&order.app_data),
            verification,
        }),
        computed_uid,
        failures,
    }
}

/// Fetches the order with the given UID from `source` and verifies it.
///
/// With `resolve_app_data` a document the order response lacks is looked up
/// by its hash.
pub async fn verify(
    source: &dyn OrderSource,
    uid: OrderUid,
    domain: &DomainSeparator,
    resolve_app_data: bool,
) -> Report {
    let order = match source.order(uid).await {
        Ok(order) => order,
        Err(err) => return Report::failed(uid, None, Failure::Fetch(format!("{err:#}"))),
    };
    if order.uid != uid {
        tracing::warn!(%uid, returned = %order.uid, "orderbook returned a different order");
    }

    let data = match OrderData::try_from(&order.data) {
        Ok(data) => data,
        Err(err) => return Report::failed(uid, Some(order.owner), err.into()),
    };

    let mut full_app_data = order.full_app_data;
    if resolve_app_data && full_app_data.is_none() && !data.app_data.is_zero() {
        match source.full_app_data(data.app_data).await {
            Ok(document) => full_app_data = document,
            Err(err) => tracing::warn!(%uid, ?err, "failed to resolve app data"),
        }
    }

    check(&uid, &data, &order.owner, full_app_data.as_deref(), domain)
}

/// Process exit code for a batch of reports: 0 if every order passed.
pub fn exit_code(reports: &[Report]) -> u8 {
    if reports.iter().all(Report::passed) {
        0
    } else {
        1
    }
}
