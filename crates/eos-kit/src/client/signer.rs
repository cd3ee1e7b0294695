//! Transaction signing.
//!
//! [`Signer`] is the seam between transaction assembly and key custody: the
//! client hands it a 32-byte signing digest and gets back a recoverable K1
//! signature. [`InMemorySigner`] holds a raw private key; alternative
//! custody (HSMs, remote signers) plugs in behind the same trait.

use std::sync::Arc;

use k256::ecdsa::hazmat::SignPrimitive;
use k256::ecdsa::RecoveryId;
use sha2::Sha256;

use crate::error::{ParseKeyError, SignerError};
use crate::types::{PrivateKey, PublicKey, Signature};

/// Anything that can produce K1 signatures for a known public key.
pub trait Signer: Send + Sync {
    /// The public key signatures will recover to.
    fn public_key(&self) -> PublicKey;

    /// Sign a 32-byte transaction digest.
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignerError>;
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignerError> {
        (**self).sign_digest(digest)
    }
}

/// A signer over a private key held in process memory.
#[derive(Clone, Debug)]
pub struct InMemorySigner {
    secret: PrivateKey,
    public: PublicKey,
}

impl InMemorySigner {
    /// Create a signer from a parsed private key.
    pub fn from_private_key(secret: PrivateKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Create a signer from a WIF or `PVT_K1_` string.
    pub fn from_wif(wif: &str) -> Result<Self, ParseKeyError> {
        Ok(Self::from_private_key(wif.parse()?))
    }
}

impl Signer for InMemorySigner {
    fn public_key(&self) -> PublicKey {
        self.public.clone()
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignerError> {
        sign_canonical(&self.secret, digest)
    }
}

/// Canonicality predicate over the 64 `r || s` bytes.
///
/// Nodes reject signatures whose `r` or `s` would gain a padding byte in
/// DER form: the high bit of the first byte must be clear, and a leading
/// zero byte is only allowed when the next byte has its high bit set.
fn is_canonical(rs: &[u8; 64]) -> bool {
    rs[0] & 0x80 == 0
        && !(rs[0] == 0 && rs[1] & 0x80 == 0)
        && rs[32] & 0x80 == 0
        && !(rs[32] == 0 && rs[33] & 0x80 == 0)
}

/// Deterministic canonical signing.
///
/// RFC 6979 nonces are deterministic, so a digest whose first nonce yields a
/// non-canonical signature would always yield it. The fix is the standard
/// one: feed an incrementing counter into the nonce derivation as additional
/// data and take the first canonical result. The loop terminates quickly in
/// practice; roughly half of all signatures are canonical on the first try.
fn sign_canonical(secret: &PrivateKey, digest: &[u8; 32]) -> Result<Signature, SignerError> {
    let signing_key = k256::ecdsa::SigningKey::from_bytes(secret.as_bytes().into())
        .map_err(|_| SignerError::InvalidSecretKey)?;
    let scalar: &k256::Scalar = signing_key.as_nonzero_scalar().as_ref();
    let z = k256::FieldBytes::from(*digest);

    for nonce in 0u32..=255 {
        let ad = nonce.to_be_bytes();
        let (mut sig, recid) = scalar
            .try_sign_prehashed_rfc6979::<Sha256>(&z, &ad)
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
        let mut recid = recid
            .ok_or_else(|| SignerError::SigningFailed("no recovery id computed".to_string()))?;

        // Low-s normalization negates s, which flips the parity of the
        // recovered point's y coordinate.
        if let Some(normalized) = sig.normalize_s() {
            sig = normalized;
            recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
        }

        let rs: [u8; 64] = sig.to_bytes().into();
        if !is_canonical(&rs) {
            continue;
        }

        let mut bytes = [0u8; 65];
        bytes[0] = recid.to_byte() + 27 + 4;
        bytes[1..].copy_from_slice(&rs);
        return Ok(Signature::from_bytes(bytes));
    }

    Err(SignerError::SigningFailed(
        "no canonical signature found".to_string(),
    ))
}
