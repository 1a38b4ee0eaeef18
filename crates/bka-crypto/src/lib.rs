//! Cryptographic primitives for BlockAcademia.
//!
//! Provides SHA-256 hashing over canonical encodings, Ed25519 issuer
//! signing/verification with base64 transport, and hash chain verification.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod chain;
pub mod hasher;
pub mod signer;

pub use chain::{ChainError, ChainLink, HashChainVerifier};
pub use hasher::{ContentHasher, HasherError, FIELD_SEPARATOR};
pub use signer::{Signature, SignatureError, Signer, SigningKey, VerifyingKey};
