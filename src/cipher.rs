//! Node key material — ed25519 key pairs and random byte blocks.
//!
//! Keys travel through config files as lowercase hex strings. The all-zero
//! secret key is the "null" key: boot parameters use it to ask for a freshly
//! generated identity.

use std::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand_core::{OsRng, RngCore};
use serde::{Serialize, Serializer};

use crate::error::AppError;

/// ed25519 verifying key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PubKey([u8; 32]);

/// ed25519 signing key seed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecKey([u8; 32]);

impl PubKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hex-encoded verifying key. The bytes must decode to a valid
    /// curve point.
    pub fn from_hex(s: &str) -> Result<Self, AppError> {
        let bytes = decode_32(s, "public key")?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| AppError::KeyDerivation(format!("invalid public key: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl SecKey {
    pub fn null() -> Self {
        Self([0u8; 32])
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hex-encoded seed. An empty string yields the null key.
    pub fn from_hex(s: &str) -> Result<Self, AppError> {
        if s.is_empty() {
            return Ok(Self::null());
        }
        decode_32(s, "secret key").map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Deterministically derive the matching public key.
    pub fn pub_key(&self) -> Result<PubKey, AppError> {
        if self.is_null() {
            return Err(AppError::KeyDerivation("cannot derive from null secret key".into()));
        }
        let verifying = SigningKey::from_bytes(&self.0).verifying_key();
        if verifying.is_weak() {
            return Err(AppError::KeyDerivation("secret key yields a weak public key".into()));
        }
        Ok(PubKey(verifying.to_bytes()))
    }
}

fn decode_32(s: &str, what: &str) -> Result<[u8; 32], AppError> {
    let raw = hex::decode(s).map_err(|e| AppError::KeyDerivation(format!("invalid {what} hex: {e}")))?;
    raw.try_into()
        .map_err(|v: Vec<u8>| AppError::KeyDerivation(format!("{what} must be 32 bytes, got {}", v.len())))
}

/// A public/secret key pair; the public half is always derived from the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    #[serde(rename = "public_key")]
    pub pk: PubKey,
    #[serde(rename = "secret_key")]
    pub sk: SecKey,
}

impl KeyPair {
    /// Reuse `sk` when it is set, otherwise generate a fresh pair.
    pub fn derive(sk: &SecKey) -> Result<Self, AppError> {
        if sk.is_null() {
            return Ok(generate_key_pair());
        }
        Ok(KeyPair { pk: sk.pub_key()?, sk: *sk })
    }
}

/// Generate a new key pair from the OS CSPRNG.
pub fn generate_key_pair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        pk: PubKey(signing_key.verifying_key().to_bytes()),
        sk: SecKey(signing_key.to_bytes()),
    }
}

/// `n` bytes from the OS CSPRNG.
pub fn rand_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng.fill_bytes(&mut buf);
    buf
}

// ── formatting / serde ───────────────────────────────────────────────────────

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", self.to_hex())
    }
}

// Never print the seed itself.
impl fmt::Debug for SecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("SecKey(null)")
        } else {
            f.write_str("SecKey(..)")
        }
    }
}

impl Serialize for PubKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl Serialize for SecKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Hex serialization for variable-length byte blocks.
pub fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}
