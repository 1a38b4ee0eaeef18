use bka_crypto::{ChainLink, ContentHasher};
use serde::{Deserialize, Serialize};

use crate::credential::CredentialRecord;
use crate::error::LedgerError;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// An immutable batch of credential records linked to its predecessor.
///
/// `hash` commits to `{index, timestamp, data, previous_hash}` encoded as
/// sorted-key JSON. Fields are public because blocks are the storage layer;
/// [`Block::has_valid_hash`] is how edits are caught.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Creation time in unix seconds.
    pub timestamp: f64,
    pub data: Vec<CredentialRecord>,
    pub previous_hash: String,
    pub hash: String,
}

/// The hashed portion of a block.
#[derive(Serialize)]
struct BlockContent<'a> {
    index: u64,
    timestamp: f64,
    data: &'a [CredentialRecord],
    previous_hash: &'a str,
}

impl Block {
    /// Build a block and compute its hash.
    pub fn new(
        index: u64,
        timestamp: f64,
        data: Vec<CredentialRecord>,
        previous_hash: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        let mut block = Self {
            index,
            timestamp,
            data,
            previous_hash: previous_hash.into(),
            hash: String::new(),
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// The genesis block: index 0, no records, sentinel previous hash.
    pub fn genesis(timestamp: f64) -> Result<Self, LedgerError> {
        Self::new(0, timestamp, Vec::new(), GENESIS_PREVIOUS_HASH)
    }

    /// Recompute the block hash from the stored fields.
    pub fn compute_hash(&self) -> Result<String, LedgerError> {
        let content = BlockContent {
            index: self.index,
            timestamp: self.timestamp,
            data: &self.data,
            previous_hash: &self.previous_hash,
        };
        Ok(ContentHasher::hash_json(&content)?.to_hex())
    }

    /// Returns `true` if the stored hash matches the stored fields.
    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash().is_ok_and(|h| h == self.hash)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// First record in this block for `student_id`.
    pub fn find_by_subject(&self, student_id: &str) -> Option<&CredentialRecord> {
        self.data.iter().find(|r| r.student_id == student_id)
    }
}

impl ChainLink for Block {
    fn link_hash(&self) -> &str {
        &self.hash
    }

    fn prev_link_hash(&self) -> &str {
        &self.previous_hash
    }

    fn recompute_link_hash(&self) -> Option<String> {
        self.compute_hash().ok()
    }
}
