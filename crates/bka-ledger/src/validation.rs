use serde::Serialize;

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of a full chain walk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub block_count: u64,
    pub credential_count: usize,
    pub hash_chain_valid: bool,
    pub sequence_monotonic: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub index: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    SequenceGap,
    HashMismatch,
    BrokenLink,
}

/// Chain integrity validator.
///
/// Unlike [`LedgerReader::is_valid`], which stops at the first failure, this
/// walks every block and records every violation. The genesis block is
/// trusted and only its position is checked.
pub struct ChainValidator;

impl ChainValidator {
    pub fn validate<R: LedgerReader + ?Sized>(reader: &R) -> Result<ValidationReport, LedgerError> {
        let blocks = reader.blocks()?;
        let mut violations = Vec::new();
        let mut hash_chain_valid = true;
        let mut sequence_monotonic = true;

        for (position, block) in blocks.iter().enumerate() {
            let expected_index = position as u64;
            if block.index != expected_index {
                sequence_monotonic = false;
                violations.push(Violation {
                    index: expected_index,
                    kind: ViolationKind::SequenceGap,
                    description: format!(
                        "expected index {expected_index}, found {}",
                        block.index
                    ),
                });
            }

            if position == 0 {
                continue;
            }

            if !block.has_valid_hash() {
                hash_chain_valid = false;
                violations.push(Violation {
                    index: expected_index,
                    kind: ViolationKind::HashMismatch,
                    description: "block hash does not match computed".into(),
                });
            }

            if block.previous_hash != blocks[position - 1].hash {
                hash_chain_valid = false;
                violations.push(Violation {
                    index: expected_index,
                    kind: ViolationKind::BrokenLink,
                    description: "previous hash link mismatch".into(),
                });
            }
        }

        for violation in &violations {
            tracing::warn!(
                index = violation.index,
                kind = ?violation.kind,
                "{}",
                violation.description
            );
        }

        Ok(ValidationReport {
            block_count: blocks.len() as u64,
            credential_count: blocks.iter().map(|b| b.data.len()).sum(),
            hash_chain_valid,
            sequence_monotonic,
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::{record, tamper};
    use crate::memory::InMemoryLedger;
    use crate::traits::LedgerWriter;

    fn ledger_with_blocks(n: usize) -> InMemoryLedger {
        let ledger = InMemoryLedger::new().unwrap();
        for i in 0..n {
            ledger.stage_pending(record(&format!("S{i}"), "x")).unwrap();
            ledger.mint().unwrap();
        }
        ledger
    }

    #[test]
    fn valid_chain_passes() {
        let ledger = ledger_with_blocks(3);
        let report = ChainValidator::validate(&ledger).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.block_count, 4);
        assert_eq!(report.credential_count, 3);
        assert!(report.hash_chain_valid);
        assert!(report.sequence_monotonic);
    }

    #[test]
    fn genesis_only_chain_is_valid() {
        let ledger = InMemoryLedger::new().unwrap();
        assert!(ChainValidator::validate(&ledger).unwrap().is_valid());
    }

    #[test]
    fn collects_every_violation() {
        let ledger = ledger_with_blocks(3);
        tamper(&ledger, |chain| {
            chain[1].data[0].student_name = "Tampered".into();
            chain[3].previous_hash = "0".into();
        });

        let report = ChainValidator::validate(&ledger).unwrap();
        assert!(!report.is_valid());
        assert!(!report.hash_chain_valid);
        assert!(report.sequence_monotonic);

        let found: Vec<_> = report.violations.iter().map(|v| (v.index, v.kind)).collect();
        assert_eq!(
            found,
            [
                (1, ViolationKind::HashMismatch),
                (3, ViolationKind::HashMismatch),
                (3, ViolationKind::BrokenLink),
            ]
        );
    }

    #[test]
    fn reindexed_block_is_a_sequence_gap() {
        let ledger = ledger_with_blocks(2);
        tamper(&ledger, |chain| {
            chain[2].index = 7;
            chain[2].hash = chain[2].compute_hash().unwrap();
        });

        let report = ChainValidator::validate(&ledger).unwrap();
        assert!(!report.sequence_monotonic);
        assert!(report.hash_chain_valid);
        assert_eq!(report.violations[0].kind, ViolationKind::SequenceGap);
    }
}
