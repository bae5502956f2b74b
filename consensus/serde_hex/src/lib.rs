//! Serde (de)serialization helpers for 0x-prefixed hex strings, used on
//! fixed-length byte containers (`Hash256`, `BlsPubkey`, `BlsSignature`, ...).

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;

pub const PREFIX: &str = "0x";

#[derive(Debug, Clone, PartialEq)]
pub struct HexError(pub String);

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid hex: {}", self.0)
    }
}

/// Encode `bytes` as a `0x`-prefixed lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str(PREFIX);
    s.push_str(&hex::encode(bytes));
    s
}

/// Decode a `0x`-prefixed (or bare) hex string into bytes.
pub fn decode(s: &str) -> Result<Vec<u8>, HexError> {
    let stripped = s.strip_prefix(PREFIX).unwrap_or(s);
    hex::decode(stripped).map_err(|e| HexError(e.to_string()))
}

pub struct HexVisitor;

impl<'de> serde::de::Visitor<'de> for HexVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 0x-prefixed hex string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        decode(value).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// Serialize any `AsRef<[u8]>` as hex. Intended for use with `#[serde(with = "serde_hex")]`.
pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<[u8]>,
{
    serializer.serialize_str(&encode(bytes.as_ref()))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(HexVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let bytes = vec![0u8, 1, 2, 255];
        let s = encode(&bytes);
        assert_eq!(s, "0x000102ff");
        assert_eq!(decode(&s).unwrap(), bytes);
    }

    #[test]
    fn decode_without_prefix() {
        assert_eq!(decode("0102").unwrap(), vec![1, 2]);
    }
}
