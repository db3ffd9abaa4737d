use {
    alloy::primitives::U256,
    serde::{
        Deserializer,
        Serializer,
        de::{self, Visitor},
    },
    serde_with::{DeserializeAs, SerializeAs},
    std::fmt,
};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParseU256Error {
    #[error("empty string is not a u256")]
    Empty,
    #[error("failed to decode {0:?} as hex u256")]
    Hex(String),
    #[error("failed to decode {0:?} as decimal u256")]
    Decimal(String),
}

/// Parses a [`U256`] from a decimal string or from a `0x` prefixed hex
/// string. Values that do not fit into 256 bits are rejected.
pub fn parse_u256(s: &str) -> Result<U256, ParseU256Error> {
    if s.is_empty() {
        return Err(ParseU256Error::Empty);
    }
    match s.strip_prefix("0x") {
        Some(hex) if !hex.is_empty() => {
            U256::from_str_radix(hex, 16).map_err(|_| ParseU256Error::Hex(s.to_owned()))
        }
        Some(_) => Err(ParseU256Error::Hex(s.to_owned())),
        None => U256::from_str_radix(s, 10).map_err(|_| ParseU256Error::Decimal(s.to_owned())),
    }
}

/// Serialize [`U256`] as a decimal string and deserialize [`U256`] from a
/// decimal or a hex string prefixed with 0x.
pub struct HexOrDecimalU256;

impl<'de> DeserializeAs<'de, U256> for HexOrDecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct U256Visitor;

        impl Visitor<'_> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a u256 encoded either as 0x hex prefixed or decimal encoded string"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_u256(s).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(U256Visitor)
    }
}

impl SerializeAs<U256> for HexOrDecimalU256 {
    fn serialize_as<S: Serializer>(source: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&source.to_string())
    }
}
