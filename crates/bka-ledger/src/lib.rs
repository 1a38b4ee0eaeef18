//! Append-only credential ledger for BlockAcademia.
//!
//! This crate is the heart of the system. It provides:
//! - `Credential` / `CredentialRecord` with deterministic content hashes
//! - `Block` batches linked by recomputable hashes
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger` with atomic minting from a pending pool
//! - Full chain validation reports
//! - Credential verification producing a `Verdict`

pub mod block;
pub mod credential;
pub mod error;
pub mod memory;
pub mod traits;
pub mod validation;
pub mod verifier;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use credential::{Credential, CredentialRecord};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{ChainValidator, ValidationReport, Violation, ViolationKind};
pub use verifier::{CredentialVerifier, Verdict};
