//! Contains the order model of the protocol together with the EIP-712 hashing
//! that derives order UIDs from it.

pub mod eip712;
pub mod order;

use {
    alloy::primitives::{Address, U256, address},
    const_hex::FromHexError,
    std::fmt,
};

/// The settlement contract, deployed at the same address on every supported
/// chain.
pub const SETTLEMENT_CONTRACT: Address = address!("9008D19f58AAbD9eD0D60971565AA8510560ab41");

/// The values bound into an EIP-712 domain separator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DomainDescriptor {
    pub name: &'static str,
    pub version: &'static str,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl DomainDescriptor {
    /// The domain of the settlement contract on the given chain.
    pub const fn cow_protocol(chain_id: u64) -> Self {
        Self {
            name: "Gnosis Protocol",
            version: "v2",
            chain_id,
            verifying_contract: SETTLEMENT_CONTRACT,
        }
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct DomainSeparator(pub [u8; 32]);

impl std::str::FromStr for DomainSeparator {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        const_hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode(self.0))
    }
}

impl DomainSeparator {
    /// Hashes `domain` as an `EIP712Domain` struct.
    pub fn new(domain: &DomainDescriptor) -> Result<Self, eip712::Error> {
        Self::with_schema(&eip712::DOMAIN_TYPE, domain)
    }

    /// Like [`DomainSeparator::new`] but with an explicit domain type.
    pub fn with_schema(
        schema: &eip712::TypeSchema,
        domain: &DomainDescriptor,
    ) -> Result<Self, eip712::Error> {
        let hash = schema.hash_struct(&[
            eip712::Value::String(domain.name),
            eip712::Value::String(domain.version),
            eip712::Value::Uint(U256::from(domain.chain_id)),
            eip712::Value::Address(domain.verifying_contract),
        ])?;
        Ok(Self(hash.0))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, hex_literal::hex, std::str::FromStr};

    #[test]
    fn domain_separator_from_str() {
        assert!(
            DomainSeparator::from_str(
                "9d7e07ef92761aa9453ae5ff25083a2b19764131b15295d3c7e89f1f1b8c67d9"
            )
            .is_ok()
        );
        assert!(DomainSeparator::from_str("0x9d7e").is_err());
    }

    #[test]
    fn domain_separator_mainnet() {
        let domain_separator = DomainSeparator::new(&DomainDescriptor::cow_protocol(1)).unwrap();
        let expected = DomainSeparator(hex!(
            "c078f884a2676e1345748b1feace7b0abee5d00ecadb6e574dcdd109a63e8943"
        ));
        assert_eq!(domain_separator, expected);
    }

    #[test]
    fn domain_separator_goerli() {
        // domain separator is taken from goerli deployment at address
        // 0x9008D19f58AAbD9eD0D60971565AA8510560ab41
        let domain_separator = DomainSeparator::new(&DomainDescriptor::cow_protocol(5)).unwrap();
        let expected = DomainSeparator(hex!(
            "fb378b35457022ecc5709ae5dafad9393c1387ae6d8ce24913a0c969074c07fb"
        ));
        assert_eq!(domain_separator, expected);
    }

    #[test]
    fn domain_separator_binds_every_member() {
        let base = DomainDescriptor::cow_protocol(1);
        let separator = DomainSeparator::new(&base).unwrap();
        for other in [
            DomainDescriptor { name: "Gnosis", ..base },
            DomainDescriptor { version: "v1", ..base },
            DomainDescriptor::cow_protocol(100),
            DomainDescriptor {
                verifying_contract: Address::ZERO,
                ..base
            },
        ] {
            assert_ne!(DomainSeparator::new(&other).unwrap(), separator);
        }
    }

    #[test]
    fn domain_separator_rejects_mismatching_schema() {
        const SCHEMA: eip712::TypeSchema = eip712::TypeSchema {
            name: "EIP712Domain",
            fields: &[
                eip712::Field::new("name", eip712::FieldType::String),
                eip712::Field::new("chainId", eip712::FieldType::Uint256),
            ],
        };
        assert!(DomainSeparator::with_schema(&SCHEMA, &DomainDescriptor::cow_protocol(1)).is_err());
    }

    #[test]
    fn domain_separator_does_not_panic_in_debug() {
        println!("{:?}", DomainSeparator::default());
    }
}
