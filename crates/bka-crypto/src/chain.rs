/// An element of a hash-linked chain.
///
/// Hashes are compared as stored text, so the genesis sentinel (which is not
/// a digest) can sit in the same field as real digests.
pub trait ChainLink {
    /// The element's stored hash.
    fn link_hash(&self) -> &str;
    /// The stored hash of the element before it.
    fn prev_link_hash(&self) -> &str;
    /// Hash recomputed from the element's stored fields, or `None` if the
    /// fields could not be encoded.
    fn recompute_link_hash(&self) -> Option<String>;
}

/// Hash chain integrity verifier.
///
/// The first element is trusted by construction and not re-hashed. Every
/// later element must hash to its stored hash and point at the stored hash of
/// its predecessor.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, stopping at the first violation.
    ///
    /// For each index `i >= 1`, checks:
    /// 1. The recomputed hash equals the stored hash
    /// 2. The stored previous hash equals element `i - 1`'s stored hash
    pub fn verify_chain<L: ChainLink>(links: &[L]) -> Result<(), ChainError> {
        for i in 1..links.len() {
            Self::verify_link(&links[i - 1], &links[i], i)?;
        }
        Ok(())
    }

    /// Verify a single element against its predecessor.
    pub fn verify_link<L: ChainLink>(
        previous: &L,
        current: &L,
        index: usize,
    ) -> Result<(), ChainError> {
        match current.recompute_link_hash() {
            Some(computed) if computed == current.link_hash() => {}
            _ => return Err(ChainError::HashMismatch { index }),
        }
        if current.prev_link_hash() != previous.link_hash() {
            return Err(ChainError::BrokenLink { index });
        }
        Ok(())
    }
}

/// Errors from chain verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("broken link at index {index}: previous hash does not match")]
    BrokenLink { index: usize },

    #[error("hash mismatch at index {index}: computed hash differs from stored")]
    HashMismatch { index: usize },
}
