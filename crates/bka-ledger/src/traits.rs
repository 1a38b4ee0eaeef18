use crate::block::Block;
use crate::credential::CredentialRecord;
use crate::error::LedgerError;

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Add a record to the pending pool.
    fn stage_pending(&self, record: CredentialRecord) -> Result<(), LedgerError>;

    /// Commit the whole pending pool as a new block and clear the pool.
    ///
    /// Fails with [`LedgerError::EmptyPool`] when nothing is staged.
    fn mint(&self) -> Result<Block, LedgerError>;
}

/// Read boundary for ledger queries and integrity checks.
pub trait LedgerReader: Send + Sync {
    /// First record for `student_id`, scanning blocks in chain order and
    /// records in insertion order. Earlier issuance wins over re-issuance.
    fn find_by_subject(&self, student_id: &str) -> Result<Option<CredentialRecord>, LedgerError>;

    /// Every record for `student_id`, in the same order as `find_by_subject`.
    fn find_all_by_subject(&self, student_id: &str)
        -> Result<Vec<CredentialRecord>, LedgerError>;

    /// Recompute every non-genesis block hash and check every link.
    fn is_valid(&self) -> Result<bool, LedgerError>;

    /// Snapshot of the whole chain, genesis first.
    fn blocks(&self) -> Result<Vec<Block>, LedgerError>;

    /// The most recently appended block.
    fn tip(&self) -> Result<Block, LedgerError>;

    fn chain_len(&self) -> Result<u64, LedgerError>;

    fn pending_len(&self) -> Result<usize, LedgerError>;
}
