use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bka_crypto::HashChainVerifier;
use chrono::Utc;

use crate::block::Block;
use crate::credential::CredentialRecord;
use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory credential ledger for a single process.
///
/// Chain and pending pool share one lock, so `mint` reads the pool, links to
/// the tip, appends, and clears the pool without another caller interleaving.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    chain: Vec<Block>,
    pending: Vec<CredentialRecord>,
}

impl InMemoryLedger {
    /// Create a ledger holding only the genesis block.
    pub fn new() -> Result<Self, LedgerError> {
        let genesis = Block::genesis(now_seconds())?;
        tracing::debug!(hash = %genesis.hash, "created genesis block");
        Ok(Self {
            inner: RwLock::new(LedgerState {
                chain: vec![genesis],
                pending: Vec::new(),
            }),
        })
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))
    }
}

impl LedgerState {
    fn tip(&self) -> &Block {
        // The chain always holds at least the genesis block.
        &self.chain[self.chain.len() - 1]
    }

    fn records_for<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a CredentialRecord> + 'a {
        self.chain
            .iter()
            .flat_map(|block| block.data.iter())
            .filter(move |record| record.student_id == student_id)
    }
}

impl LedgerWriter for InMemoryLedger {
    fn stage_pending(&self, record: CredentialRecord) -> Result<(), LedgerError> {
        let mut state = self.write_state()?;
        tracing::debug!(
            student_id = %record.student_id,
            pending = state.pending.len() + 1,
            "staged credential"
        );
        state.pending.push(record);
        Ok(())
    }

    fn mint(&self) -> Result<Block, LedgerError> {
        let mut state = self.write_state()?;
        if state.pending.is_empty() {
            return Err(LedgerError::EmptyPool);
        }

        let tip = state.tip();
        let index = state.chain.len() as u64;
        let timestamp = now_seconds().max(tip.timestamp);
        let block = Block::new(index, timestamp, state.pending.clone(), tip.hash.clone())?;

        state.chain.push(block.clone());
        state.pending.clear();

        tracing::info!(
            index = block.index,
            records = block.data.len(),
            hash = %block.hash,
            "minted block"
        );
        Ok(block)
    }
}

impl LedgerReader for InMemoryLedger {
    fn find_by_subject(&self, student_id: &str) -> Result<Option<CredentialRecord>, LedgerError> {
        let state = self.read_state()?;
        let found = state.records_for(student_id).next().cloned();
        tracing::debug!(student_id, found = found.is_some(), "credential lookup");
        Ok(found)
    }

    fn find_all_by_subject(
        &self,
        student_id: &str,
    ) -> Result<Vec<CredentialRecord>, LedgerError> {
        let state = self.read_state()?;
        Ok(state.records_for(student_id).cloned().collect())
    }

    fn is_valid(&self) -> Result<bool, LedgerError> {
        let state = self.read_state()?;
        match HashChainVerifier::verify_chain(&state.chain) {
            Ok(()) => Ok(true),
            Err(violation) => {
                tracing::warn!(%violation, "chain integrity check failed");
                Ok(false)
            }
        }
    }

    fn blocks(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read_state()?.chain.clone())
    }

    fn tip(&self) -> Result<Block, LedgerError> {
        Ok(self.read_state()?.tip().clone())
    }

    fn chain_len(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.chain.len() as u64)
    }

    fn pending_len(&self) -> Result<usize, LedgerError> {
        Ok(self.read_state()?.pending.len())
    }
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
