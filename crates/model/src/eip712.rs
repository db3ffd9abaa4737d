//! Types and procedures defined by EIP-712.
//!
//! https://eips.ethereum.org/EIPS/eip-712

use {
    crate::DomainSeparator,
    alloy::primitives::{Address, B256, U256, keccak256},
    std::fmt::{self, Display, Formatter},
};

/// The subset of EIP-712 member types used by the protocol's structs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Address,
    Uint256,
    Uint32,
    Bytes32,
    String,
    Bool,
}

impl FieldType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Uint256 => "uint256",
            Self::Uint32 => "uint32",
            Self::Bytes32 => "bytes32",
            Self::String => "string",
            Self::Bool => "bool",
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// A named struct type with its members in declaration order. The order of
/// `fields` is part of the type and fixes the layout of the encoded data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeSchema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// The `EIP712Domain` type with the members used by the settlement contract.
pub const DOMAIN_TYPE: TypeSchema = TypeSchema {
    name: "EIP712Domain",
    fields: &[
        Field::new("name", FieldType::String),
        Field::new("version", FieldType::String),
        Field::new("chainId", FieldType::Uint256),
        Field::new("verifyingContract", FieldType::Address),
    ],
};

/// A value of a struct member, before encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Value<'a> {
    Address(Address),
    Uint(U256),
    Bytes32([u8; 32]),
    String(&'a str),
    Bool(bool),
}

impl Value<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint",
            Self::Bytes32(_) => "bytes32",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    #[error("{type_name} has {expected} members but {actual} values were given")]
    FieldCount {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{type_name}.{field} has type {ty} but was given a {value} value")]
    TypeMismatch {
        type_name: &'static str,
        field: &'static str,
        ty: FieldType,
        value: &'static str,
    },
    #[error("value of {type_name}.{field} does not fit into {ty}")]
    OutOfRange {
        type_name: &'static str,
        field: &'static str,
        ty: FieldType,
    },
}

impl TypeSchema {
    /// `encodeType` as defined by EIP-712, e.g.
    /// `Mail(address from,address to,string contents)`.
    pub fn encode_type(&self) -> String {
        let members = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.ty, field.name))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({members})", self.name)
    }

    pub fn type_hash(&self) -> B256 {
        keccak256(self.encode_type())
    }

    /// `typeHash ‖ encodeData(values)`, the preimage of `hashStruct`.
    ///
    /// Every value is encoded into one 32 byte word according to the type of
    /// the member at the same position.
    pub fn encode_data(&self, values: &[Value<'_>]) -> Result<Vec<u8>, Error> {
        if values.len() != self.fields.len() {
            return Err(Error::FieldCount {
                type_name: self.name,
                expected: self.fields.len(),
                actual: values.len(),
            });
        }

        let mut encoded = Vec::with_capacity(32 * (1 + values.len()));
        encoded.extend_from_slice(self.type_hash().as_slice());
        for (field, value) in self.fields.iter().zip(values) {
            encoded.extend_from_slice(self.encode_value(field, value)?.as_slice());
        }
        Ok(encoded)
    }

    /// `hashStruct` as defined by EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    pub fn hash_struct(&self, values: &[Value<'_>]) -> Result<B256, Error> {
        Ok(keccak256(self.encode_data(values)?))
    }

    fn encode_value(&self, field: &Field, value: &Value<'_>) -> Result<B256, Error> {
        let word = match (field.ty, value) {
            (FieldType::Address, Value::Address(address)) => address.into_word(),
            (FieldType::Uint256, Value::Uint(value)) => B256::from(value.to_be_bytes::<32>()),
            (FieldType::Uint32, Value::Uint(value)) => {
                if *value > U256::from(u32::MAX) {
                    return Err(Error::OutOfRange {
                        type_name: self.name,
                        field: field.name,
                        ty: field.ty,
                    });
                }
                B256::from(value.to_be_bytes::<32>())
            }
            (FieldType::Bytes32, Value::Bytes32(bytes)) => B256::from(*bytes),
            // Dynamic types are encoded as the hash of their contents.
            (FieldType::String, Value::String(s)) => keccak256(s.as_bytes()),
            (FieldType::Bool, Value::Bool(b)) => B256::with_last_byte(u8::from(*b)),
            (ty, value) => {
                return Err(Error::TypeMismatch {
                    type_name: self.name,
                    field: field.name,
                    ty,
                    value: value.kind(),
                });
            }
        };
        Ok(word)
    }
}

/// Combines a domain separator and a struct hash into the digest that gets
/// signed: `keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(message))`.
pub fn hashed_typed_data(domain_separator: &DomainSeparator, struct_hash: &B256) -> B256 {
    let mut message = [0u8; 66];
    message[0..2].copy_from_slice(&[0x19, 0x01]);
    message[2..34].copy_from_slice(&domain_separator.0);
    message[34..66].copy_from_slice(struct_hash.as_slice());
    keccak256(message)
}
