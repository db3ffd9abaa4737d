//! Contains the order type as it is signed and verified by the settlement
//! contract, together with its unique identifier.

use {
    crate::{
        DomainSeparator,
        eip712::{self, Field, FieldType, TypeSchema, Value},
    },
    alloy::primitives::{Address, B256, U256},
    app_data::AppDataHash,
    number::{HexOrDecimalU256, ParseU256Error, parse_u256},
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    serde_with::{DeserializeFromStr, SerializeDisplay, serde_as},
    std::{
        fmt::{self, Display},
        str::FromStr,
    },
};

/// The EIP-712 type of an order. These are the member names of the type hash
/// in the settlement contract, which differ from the Solidity struct.
///
/// See <https://github.com/cowprotocol/contracts/blob/v1.1.2/src/contracts/libraries/GPv2Order.sol#L26-L48>
pub const ORDER_TYPE: TypeSchema = TypeSchema {
    name: "Order",
    fields: &[
        Field::new("sellToken", FieldType::Address),
        Field::new("buyToken", FieldType::Address),
        Field::new("receiver", FieldType::Address),
        Field::new("sellAmount", FieldType::Uint256),
        Field::new("buyAmount", FieldType::Uint256),
        Field::new("validTo", FieldType::Uint32),
        Field::new("appData", FieldType::Bytes32),
        Field::new("feeAmount", FieldType::Uint256),
        Field::new("kind", FieldType::String),
        Field::new("partiallyFillable", FieldType::Bool),
        Field::new("sellTokenBalance", FieldType::String),
        Field::new("buyTokenBalance", FieldType::String),
    ],
};

/// The complete order data.
///
/// These are the exact fields that get signed and verified by the settlement
/// contract.
#[serde_as]
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub sell_token: Address,
    pub buy_token: Address,
    /// The zero address means the proceeds go to the owner.
    pub receiver: Address,
    #[serde_as(as = "HexOrDecimalU256")]
    pub sell_amount: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub buy_amount: U256,
    pub valid_to: u32,
    pub app_data: AppDataHash,
    #[serde_as(as = "HexOrDecimalU256")]
    pub fee_amount: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    pub sell_token_balance: OrderBalance,
    pub buy_token_balance: OrderBalance,
}

impl OrderData {
    /// The member values in [`ORDER_TYPE`] order.
    pub fn eip712_values(&self) -> [Value<'static>; 12] {
        [
            Value::Address(self.sell_token),
            Value::Address(self.buy_token),
            Value::Address(self.receiver),
            Value::Uint(self.sell_amount),
            Value::Uint(self.buy_amount),
            Value::Uint(U256::from(self.valid_to)),
            Value::Bytes32(self.app_data.0),
            Value::Uint(self.fee_amount),
            Value::String(self.kind.as_str()),
            Value::Bool(self.partially_fillable),
            Value::String(self.sell_token_balance.as_str()),
            Value::String(self.buy_token_balance.as_str()),
        ]
    }

    /// Returns the value of hashStruct() over the order data as defined by
    /// EIP-712, encoded with `schema`.
    pub fn hash_struct_with(&self, schema: &TypeSchema) -> Result<B256, eip712::Error> {
        schema.hash_struct(&self.eip712_values())
    }

    /// Returns the value of hashStruct() over the order data as defined by
    /// EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    pub fn hash_struct(&self) -> Result<B256, eip712::Error> {
        self.hash_struct_with(&ORDER_TYPE)
    }

    /// The EIP-712 digest of the order in `domain`.
    pub fn hash(&self, domain: &DomainSeparator) -> Result<B256, eip712::Error> {
        Ok(eip712::hashed_typed_data(domain, &self.hash_struct()?))
    }

    pub fn uid(&self, domain: &DomainSeparator, owner: &Address) -> Result<OrderUid, eip712::Error> {
        Ok(OrderUid::from_parts(
            self.hash(domain)?,
            *owner,
            self.valid_to,
        ))
    }
}

/// Recomputes the UID of an order and checks it against the UID the order
/// is known by.
pub fn verify_uid(
    order: &OrderData,
    owner: &Address,
    domain: &DomainSeparator,
    expected: &OrderUid,
) -> Result<OrderUid, UidVerificationError> {
    let computed = order.uid(domain, owner)?;
    if computed != *expected {
        return Err(UidMismatch {
            expected: *expected,
            computed,
        }
        .into());
    }
    Ok(computed)
}

#[derive(Debug, thiserror::Error, Clone, Copy, Eq, PartialEq)]
pub enum UidVerificationError {
    #[error("failed to encode order: {0}")]
    Encoding(#[from] eip712::Error),
    #[error(transparent)]
    Mismatch(#[from] UidMismatch),
}

/// A recomputed order UID that differs from the one the order is known by.
#[derive(Debug, thiserror::Error, Clone, Copy, Eq, PartialEq)]
#[error("order UID mismatch: expected {expected}, computed {computed}")]
pub struct UidMismatch {
    pub expected: OrderUid,
    pub computed: OrderUid,
}

impl UidMismatch {
    /// Names of the UID parts that differ.
    pub fn differing_parts(&self) -> Vec<&'static str> {
        let (expected_hash, expected_owner, expected_valid_to) = self.expected.parts();
        let (computed_hash, computed_owner, computed_valid_to) = self.computed.parts();
        let mut parts = Vec::new();
        if expected_hash != computed_hash {
            parts.push("orderDigest");
        }
        if expected_owner != computed_owner {
            parts.push("owner");
        }
        if expected_valid_to != computed_valid_to {
            parts.push("validTo");
        }
        parts
    }
}

// uid as 56 bytes: 32 for orderDigest, 20 for ownerAddress and 4 for validTo
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct OrderUid(pub [u8; 56]);

impl OrderUid {
    /// Create a UID from its parts.
    pub fn from_parts(hash: B256, owner: Address, valid_to: u32) -> Self {
        let mut uid = [0; 56];
        uid[0..32].copy_from_slice(hash.as_slice());
        uid[32..52].copy_from_slice(owner.as_slice());
        uid[52..56].copy_from_slice(&valid_to.to_be_bytes());
        Self(uid)
    }

    /// Splits an order UID into its parts.
    pub fn parts(&self) -> (B256, Address, u32) {
        let mut valid_to = [0u8; 4];
        valid_to.copy_from_slice(&self.0[52..56]);
        (
            B256::from_slice(&self.0[0..32]),
            Address::from_slice(&self.0[32..52]),
            u32::from_be_bytes(valid_to),
        )
    }
}

impl FromStr for OrderUid {
    type Err = const_hex::FromHexError;

    fn from_str(s: &str) -> Result<OrderUid, Self::Err> {
        let mut value = [0u8; 56];
        let s_without_prefix = s.strip_prefix("0x").unwrap_or(s);
        const_hex::decode_to_slice(s_without_prefix, value.as_mut())?;
        Ok(OrderUid(value))
    }
}

impl Display for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", const_hex::encode(self.0))
    }
}

impl fmt::Debug for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Default for OrderUid {
    fn default() -> Self {
        Self([0u8; 56])
    }
}

impl Serialize for OrderUid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> Deserialize<'de> for OrderUid {
    fn deserialize<D>(deserializer: D) -> Result<OrderUid, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor {}
        impl de::Visitor<'_> for Visitor {
            type Value = OrderUid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an uid with orderDigest_owner_validTo")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.strip_prefix("0x").ok_or_else(|| {
                    de::Error::custom(format!(
                        "{s:?} can't be decoded as hex uid because it does not start with '0x'"
                    ))
                })?;
                let mut value = [0u8; 56];
                const_hex::decode_to_slice(s, value.as_mut()).map_err(|err| {
                    de::Error::custom(format!("failed to decode {s:?} as hex uid: {err}"))
                })?;
                Ok(OrderUid(value))
            }
        }

        deserializer.deserialize_str(Visitor {})
    }
}

/// Whether the order sells an exact amount or buys an exact amount.
///
/// The kind is hashed by its label, so [`OrderKind::as_str`] is part of the
/// signed data.
#[derive(
    Eq, PartialEq, Clone, Copy, Debug, Default, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum OrderKind {
    #[default]
    Sell,
    Buy,
}

impl OrderKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Buy => "buy",
        }
    }
}

impl Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKind {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(Self::Sell),
            "buy" => Ok(Self::Buy),
            _ => Err(UnknownLabel(s.to_owned())),
        }
    }
}

/// Where the sell amount is drawn from, or where the buy amount is paid to.
///
/// Like [`OrderKind`] this is hashed by its label.
#[derive(
    Eq, PartialEq, Clone, Copy, Debug, Default, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum OrderBalance {
    /// Direct ERC20 allowances to the Vault relayer contract
    #[default]
    Erc20,
    /// ERC20 allowances to the Vault with GPv2 relayer approval
    External,
    /// Internal balances to the Vault with GPv2 relayer approval
    Internal,
}

impl OrderBalance {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Erc20 => "erc20",
            Self::External => "external",
            Self::Internal => "internal",
        }
    }
}

impl Display for OrderBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBalance {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "erc20" => Ok(Self::Erc20),
            "external" => Ok(Self::External),
            "internal" => Ok(Self::Internal),
            _ => Err(UnknownLabel(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
#[error("unknown label {0:?}")]
pub struct UnknownLabel(pub String);

/// Order data as an external source delivers it, before any validation.
///
/// Field values are kept as loosely typed as the JSON allows so that range
/// and format problems surface as [`MalformedInput`]. `validTo` is signed so
/// that a negative timestamp is rejected here as well. A value that does not
/// even match the JSON type of its field (a string `validTo`, a number above
/// `i64::MAX`, a missing field) fails deserialization of the whole record
/// instead.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderData {
    pub sell_token: String,
    pub buy_token: String,
    #[serde(default)]
    pub receiver: Option<String>,
    pub sell_amount: String,
    pub buy_amount: String,
    pub valid_to: i64,
    pub app_data: String,
    pub fee_amount: String,
    pub kind: String,
    pub partially_fillable: bool,
    pub sell_token_balance: String,
    pub buy_token_balance: String,
}

/// A structurally invalid order field.
#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum MalformedInput {
    #[error("{field}: {value:?} is not a 20 byte address")]
    Address { field: &'static str, value: String },
    #[error("{field}: {source}")]
    Amount {
        field: &'static str,
        #[source]
        source: ParseU256Error,
    },
    #[error("validTo: {0} is not an unsigned 32 bit timestamp")]
    ValidTo(i64),
    #[error("appData: {0:?} is not a 32 byte hex digest")]
    AppData(String),
    #[error("{field}: {source}")]
    Label {
        field: &'static str,
        #[source]
        source: UnknownLabel,
    },
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, MalformedInput> {
    value.parse().map_err(|_| MalformedInput::Address {
        field,
        value: value.to_owned(),
    })
}

fn parse_amount(field: &'static str, value: &str) -> Result<U256, MalformedInput> {
    parse_u256(value).map_err(|source| MalformedInput::Amount { field, source })
}

fn parse_label<T: FromStr<Err = UnknownLabel>>(
    field: &'static str,
    value: &str,
) -> Result<T, MalformedInput> {
    value
        .parse()
        .map_err(|source| MalformedInput::Label { field, source })
}

impl TryFrom<&RawOrderData> for OrderData {
    type Error = MalformedInput;

    fn try_from(raw: &RawOrderData) -> Result<Self, Self::Error> {
        Ok(Self {
            sell_token: parse_address("sellToken", &raw.sell_token)?,
            buy_token: parse_address("buyToken", &raw.buy_token)?,
            receiver: match &raw.receiver {
                Some(receiver) => parse_address("receiver", receiver)?,
                None => Address::ZERO,
            },
            sell_amount: parse_amount("sellAmount", &raw.sell_amount)?,
            buy_amount: parse_amount("buyAmount", &raw.buy_amount)?,
            valid_to: u32::try_from(raw.valid_to)
                .map_err(|_| MalformedInput::ValidTo(raw.valid_to))?,
            app_data: raw
                .app_data
                .parse()
                .map_err(|_| MalformedInput::AppData(raw.app_data.clone()))?,
            fee_amount: parse_amount("feeAmount", &raw.fee_amount)?,
            kind: parse_label("kind", &raw.kind)?,
            partially_fillable: raw.partially_fillable,
            sell_token_balance: parse_label("sellTokenBalance", &raw.sell_token_balance)?,
            buy_token_balance: parse_label("buyTokenBalance", &raw.buy_token_balance)?,
        })
    }
}
