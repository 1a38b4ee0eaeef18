use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bka_types::Digest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ed25519 signing key (private).
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

/// Ed25519 signature. Travels as standard base64 text.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// The corresponding public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer as _;
        Signature(self.0.sign(message))
    }
}

impl VerifyingKey {
    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        use ed25519_dalek::Verifier as _;
        self.0
            .verify(message, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// Verify a base64-encoded signature over the UTF-8 bytes of a digest's
    /// hex text.
    ///
    /// Undecodable or wrong-length signatures verify as `false`.
    pub fn verify_encoded(&self, digest_hex: &str, signature: &str) -> bool {
        Signature::from_base64(signature)
            .and_then(|sig| self.verify(digest_hex.as_bytes(), &sig))
            .is_ok()
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Create from raw 32-byte public key.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| SignatureError::InvalidKey)?;
        Ok(Self(key))
    }

    /// Short hex identifier of this key (first 8 bytes).
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.0.to_bytes()[..8])
    }
}

impl Signature {
    /// Standard base64 encoding of the 64 signature bytes.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0.to_bytes())
    }

    /// Decode a base64 signature.
    pub fn from_base64(encoded: &str) -> Result<Self, SignatureError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| SignatureError::InvalidEncoding(e.to_string()))?;
        let sig = ed25519_dalek::Signature::from_slice(&bytes).map_err(|_| {
            SignatureError::InvalidLength {
                expected: ed25519_dalek::SIGNATURE_LENGTH,
                actual: bytes.len(),
            }
        })?;
        Ok(Self(sig))
    }
}

/// An issuer identity: a human-readable name bound to one key pair for the
/// lifetime of the value.
///
/// The private key never leaves the `Signer`; only the [`VerifyingKey`] is
/// handed out.
pub struct Signer {
    name: String,
    key: SigningKey,
}

impl Signer {
    /// Create an issuer with a freshly generated key pair.
    pub fn generate(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: SigningKey::generate(),
        }
    }

    /// The issuer's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The issuer's public key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Sign the UTF-8 bytes of a digest's hex text.
    pub fn sign_digest(&self, digest: &Digest) -> Signature {
        self.key.sign(digest.to_hex().as_bytes())
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", hex::encode(self.0.to_bytes()))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0.to_bytes()[..8]))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Errors from signing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
    #[error("invalid signature encoding: {0}")]
    InvalidEncoding(String),
    #[error("invalid signature length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
