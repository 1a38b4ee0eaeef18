//! Foundation types for BlockAcademia.
//!
//! Every other `bka-*` crate depends on this one for the value types that
//! cross crate boundaries.
//!
//! # Key Types
//!
//! - [`Digest`] — SHA-256 content digest with lowercase hex interchange
//! - [`CredentialKind`] — what sort of academic fact a credential attests

pub mod digest;
pub mod error;
pub mod kind;

pub use digest::Digest;
pub use error::TypeError;
pub use kind::CredentialKind;
