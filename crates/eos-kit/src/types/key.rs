//! Cryptographic key and signature types.
//!
//! EOS K1 keys are secp256k1. Public keys appear in two text forms: the
//! legacy `EOS...` form (base58 over the compressed point plus a RIPEMD-160
//! checksum) and the newer `PUB_K1_...` form (same payload, checksum salted
//! with the `"K1"` suffix). Private keys use Bitcoin-style WIF or
//! `PVT_K1_...`; signatures use `SIG_K1_...`.
//!
//! Parsing validates everything up front: base58, length, checksum, and
//! that the key bytes are actually a point on the curve. A key that parses
//! is a key the chain will accept, which is what lets the client reject bad
//! input before spending a network round trip on it.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ParseKeyError;

/// First four bytes of `RIPEMD-160(data || suffix)`.
fn ripemd_checksum(data: &[u8], suffix: &[u8]) -> [u8; 4] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.update(suffix);
    let digest = hasher.finalize();
    [digest[0], digest[1], digest[2], digest[3]]
}

/// First four bytes of `SHA-256(SHA-256(data))` (WIF checksum).
fn sha256d_checksum(data: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(data));
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Decode `base58(payload || checksum4)` and verify the checksum.
fn decode_checked(
    s: &str,
    payload_len: usize,
    checksum: impl Fn(&[u8]) -> [u8; 4],
) -> Result<Vec<u8>, ParseKeyError> {
    let data = bs58::decode(s)
        .into_vec()
        .map_err(|e| ParseKeyError::InvalidBase58(e.to_string()))?;
    if data.len() != payload_len + 4 {
        return Err(ParseKeyError::InvalidLength {
            expected: payload_len + 4,
            actual: data.len(),
        });
    }
    let (payload, tail) = data.split_at(payload_len);
    if checksum(payload) != tail {
        return Err(ParseKeyError::BadChecksum);
    }
    Ok(payload.to_vec())
}

// ============================================================================
// PublicKey
// ============================================================================

/// A secp256k1 (K1) public key in compressed SEC1 form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; 33],
}

impl PublicKey {
    /// Construct from compressed SEC1 bytes, validating the curve point.
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, ParseKeyError> {
        let encoded =
            k256::EncodedPoint::from_bytes(bytes).map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        let point = k256::AffinePoint::from_encoded_point(&encoded);
        if point.is_none().into() {
            return Err(ParseKeyError::InvalidCurvePoint);
        }
        Ok(Self { bytes })
    }

    /// The compressed SEC1 bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.bytes
    }

    /// The `PUB_K1_...` text form.
    pub fn to_k1_string(&self) -> String {
        let checksum = ripemd_checksum(&self.bytes, b"K1");
        let mut data = self.bytes.to_vec();
        data.extend_from_slice(&checksum);
        format!("PUB_K1_{}", bs58::encode(data).into_string())
    }
}

impl FromStr for PublicKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = if let Some(rest) = s.strip_prefix("PUB_K1_") {
            decode_checked(rest, 33, |p| ripemd_checksum(p, b"K1"))?
        } else if let Some(rest) = s.strip_prefix("PUB_") {
            let key_type = rest.split('_').next().unwrap_or(rest);
            return Err(ParseKeyError::UnknownKeyType(key_type.to_string()));
        } else if let Some(rest) = s.strip_prefix("EOS") {
            decode_checked(rest, 33, |p| ripemd_checksum(p, b""))?
        } else {
            return Err(ParseKeyError::InvalidFormat);
        };

        // decode_checked guarantees the length
        let bytes: [u8; 33] = payload
            .try_into()
            .map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Self::from_bytes(bytes)
    }
}

impl TryFrom<&str> for PublicKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for PublicKey {
    /// The legacy `EOS...` form, which every node understands.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checksum = ripemd_checksum(&self.bytes, b"");
        let mut data = self.bytes.to_vec();
        data.extend_from_slice(&checksum);
        write!(f, "EOS{}", bs58::encode(data).into_string())
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// PrivateKey
// ============================================================================

/// A secp256k1 (K1) private key.
#[derive(Clone)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Construct from raw scalar bytes, validating the scalar.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, ParseKeyError> {
        k256::ecdsa::SigningKey::from_bytes(&bytes.into())
            .map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Ok(Self { bytes })
    }

    /// The raw scalar bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        // from_bytes validated the scalar, so this cannot fail
        let signing = k256::ecdsa::SigningKey::from_bytes(&self.bytes.into())
            .expect("scalar validated at construction");
        let point = signing.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(point.as_bytes());
        PublicKey { bytes }
    }

    /// The WIF text form (`5...`).
    pub fn to_wif(&self) -> String {
        let mut data = Vec::with_capacity(37);
        data.push(0x80);
        data.extend_from_slice(&self.bytes);
        let checksum = sha256d_checksum(&data);
        data.extend_from_slice(&checksum);
        bs58::encode(data).into_string()
    }
}

impl FromStr for PrivateKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 32] = if let Some(rest) = s.strip_prefix("PVT_K1_") {
            let payload = decode_checked(rest, 32, |p| ripemd_checksum(p, b"K1"))?;
            payload
                .try_into()
                .map_err(|_| ParseKeyError::InvalidCurvePoint)?
        } else if let Some(rest) = s.strip_prefix("PVT_") {
            let key_type = rest.split('_').next().unwrap_or(rest);
            return Err(ParseKeyError::UnknownKeyType(key_type.to_string()));
        } else {
            // WIF: 0x80 || key || sha256d checksum
            let payload = decode_checked(s, 33, sha256d_checksum)?;
            if payload[0] != 0x80 {
                return Err(ParseKeyError::InvalidFormat);
            }
            payload[1..]
                .try_into()
                .map_err(|_| ParseKeyError::InvalidCurvePoint)?
        };
        Self::from_bytes(bytes)
    }
}

impl Debug for PrivateKey {
    /// Redacted: private key material never appears in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(<redacted>, public: {})", self.public_key())
    }
}

// ============================================================================
// Signature
// ============================================================================

/// A 65-byte recoverable K1 signature (recovery byte, then r, then s).
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; 65],
}

impl Signature {
    /// Construct from the compact recoverable form.
    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self { bytes }
    }

    /// The compact recoverable bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.bytes
    }
}

impl FromStr for Signature {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("SIG_K1_").ok_or(ParseKeyError::InvalidFormat)?;
        let payload = decode_checked(rest, 65, |p| ripemd_checksum(p, b"K1"))?;
        let bytes: [u8; 65] = payload
            .try_into()
            .map_err(|_| ParseKeyError::InvalidFormat)?;
        Ok(Self { bytes })
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checksum = ripemd_checksum(&self.bytes, b"K1");
        let mut data = self.bytes.to_vec();
        data.extend_from_slice(&checksum);
        write!(f, "SIG_K1_{}", bs58::encode(data).into_string())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
