use {
    alloy::primitives::keccak256,
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{
        borrow::Cow,
        fmt::{self, Debug, Display, Formatter},
        str::FromStr,
    },
};

/// On the contract level orders have 32 bytes of generic data that are freely
/// choosable by the user. On the services level this is a hash of an app data
/// json document, which associates arbitrary information with an order while
/// being signed by the user.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct AppDataHash(pub [u8; 32]);

impl AppDataHash {
    /// The all-zero hash is a sentinel for "no app data".
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Debug for AppDataHash {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", const_hex::encode(self.0))
    }
}

impl Display for AppDataHash {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl FromStr for AppDataHash {
    type Err = const_hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        const_hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for AppDataHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AppDataHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Cow::<str>::deserialize(deserializer)?;
        s.parse().map_err(|err| {
            de::Error::custom(format!(
                "failed to decode {s:?} as hex appdata 32 bytes: {err}"
            ))
        })
    }
}

impl PartialEq<[u8; 32]> for AppDataHash {
    fn eq(&self, other: &[u8; 32]) -> bool {
        self.0 == *other
    }
}

/// Computes the app data hash of a full app data document.
///
/// This is the single block IPFS content hash: keccak-256 over the raw bytes.
/// IPFS splits content above its block size into chunks and hashes a DAG of
/// those chunks instead, so for very large documents this value is NOT the
/// IPFS hash. Such documents are far above what the orderbook accepts and
/// are not supported here.
pub fn hash_full_app_data(document: &[u8]) -> [u8; 32] {
    keccak256(document).0
}

/// Builds the raw CIDv1 bytes pointing at the document with the given app
/// data hash.
pub fn create_ipfs_cid(app_data_hash: &[u8; 32]) -> [u8; 36] {
    let mut cid = [0u8; 4 + 32];
    cid[0] = 1; // cid version
    cid[1] = 0x55; // raw codec
    cid[2] = 0x1b; // keccak-256 multihash
    cid[3] = 32; // hash length
    cid[4..].copy_from_slice(app_data_hash);
    cid
}

/// The base32 encoded IPFS CID of an app data hash, as used by IPFS gateways.
pub fn cid(app_data_hash: &AppDataHash) -> String {
    multibase::encode(
        multibase::Base::Base32Lower,
        create_ipfs_cid(&app_data_hash.0),
    )
}

#[cfg(test)]
mod tests {
    use {super::*, hex_literal::hex, serde_json::json};

    #[test]
    fn works_on_32_byte_string_with_or_without_0x() {
        let with_0x = "0x0ddeb6e4a814908832cc25d11311c514e7efe6af3c9bafeb0d241129cf7f4d83";
        let without_0x = "0ddeb6e4a814908832cc25d11311c514e7efe6af3c9bafeb0d241129cf7f4d83";
        assert!(AppDataHash::from_str(with_0x).is_ok());
        assert_eq!(
            AppDataHash::from_str(with_0x),
            AppDataHash::from_str(without_0x)
        );
    }

    #[test]
    fn invalid_length() {
        assert!(AppDataHash::from_str("0x00").is_err());
        assert!(AppDataHash::deserialize(json!("0x00")).is_err());
        assert!(AppDataHash::deserialize(json!("asdf")).is_err());
    }

    #[test]
    fn serializes_as_prefixed_hex() {
        let hash = AppDataHash([0x42; 32]);
        let value = serde_json::to_value(hash).unwrap();
        assert_eq!(
            value,
            json!("0x4242424242424242424242424242424242424242424242424242424242424242")
        );
        assert_eq!(AppDataHash::deserialize(value).unwrap(), hash);
    }

    #[test]
    fn zero_hash_is_sentinel() {
        assert!(AppDataHash::default().is_zero());
        assert!(!AppDataHash([1; 32]).is_zero());
    }

    #[test]
    fn empty_document_hash() {
        assert_eq!(
            hash_full_app_data(crate::EMPTY.as_bytes()),
            hex!("b48d38f93eaa084033fc5970bf96e559c33c4cdc07d889ab00b4d63f9590739d"),
        );
    }

    // Can be compared with a CID explorer to make sure CIDs encode the right
    // data.
    #[test]
    fn cid_of_empty_document() {
        let hash = AppDataHash(hash_full_app_data(crate::EMPTY.as_bytes()));
        assert_eq!(
            cid(&hash),
            "bafkrwifuru4pspvkbbadh7czoc7znzkzym6ezxah3ce2wafu2y7zledttu"
        );
    }

    #[test]
    fn raw_cid_layout() {
        let raw = create_ipfs_cid(&[0xab; 32]);
        assert_eq!(raw[..4], [0x01, 0x55, 0x1b, 0x20]);
        assert_eq!(raw[4..], [0xab; 32]);
    }
}
