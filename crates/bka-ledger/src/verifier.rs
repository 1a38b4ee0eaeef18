use std::fmt;

use bka_crypto::VerifyingKey;
use serde::Serialize;

use crate::credential::CredentialRecord;
use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Outcome of verifying a credential against a ledger.
///
/// Each failing variant points at a different remediation, so they are
/// reported separately rather than folded into one "invalid".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Valid,
    NotFound,
    /// Stored fields no longer hash to the stored content hash.
    TamperedData,
    /// Signature missing, undecodable, or not made by the expected issuer.
    InvalidSignature,
    /// Block hashes or links are broken somewhere in the chain.
    ChainInvalid,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Valid => "credential is valid",
            Self::NotFound => "credential not found on the ledger",
            Self::TamperedData => "credential data has been modified (hash mismatch)",
            Self::InvalidSignature => "digital signature does not match issuer",
            Self::ChainInvalid => "ledger structure invalid (tampering suspected)",
        };
        f.write_str(message)
    }
}

/// Verifies credentials stored on a ledger.
pub struct CredentialVerifier;

impl CredentialVerifier {
    /// Look up `student_id` and check it, stopping at the first failure:
    /// presence, content hash, issuer signature, then whole-chain integrity.
    ///
    /// `Err` is reserved for ledger access faults; every verification outcome
    /// is a [`Verdict`].
    pub fn verify<R: LedgerReader + ?Sized>(
        reader: &R,
        issuer_key: &VerifyingKey,
        student_id: &str,
    ) -> Result<Verdict, LedgerError> {
        let Some(record) = reader.find_by_subject(student_id)? else {
            tracing::warn!(student_id, "credential not found");
            return Ok(Verdict::NotFound);
        };

        let verdict = match Self::check_record(&record, issuer_key) {
            Verdict::Valid if !reader.is_valid()? => Verdict::ChainInvalid,
            verdict => verdict,
        };

        if verdict.is_valid() {
            tracing::debug!(student_id, "credential verified");
        } else {
            tracing::warn!(student_id, %verdict, "credential failed verification");
        }
        Ok(verdict)
    }

    /// Record-level checks only: content hash, then issuer signature.
    pub fn check_record(record: &CredentialRecord, issuer_key: &VerifyingKey) -> Verdict {
        if !record.hash_matches() {
            return Verdict::TamperedData;
        }

        match record.signature.as_deref() {
            Some(signature) if issuer_key.verify_encoded(&record.hash, signature) => Verdict::Valid,
            _ => Verdict::InvalidSignature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::memory::tests::tamper;
    use crate::memory::InMemoryLedger;
    use crate::traits::LedgerWriter;
    use bka_crypto::Signer;
    use bka_types::CredentialKind;

    fn issue(ledger: &InMemoryLedger, issuer: &Signer, id: &str, name: &str) {
        let credential = Credential::issue(id, name, "P", "AI", CredentialKind::MicroCert, issuer);
        ledger.stage_pending(credential.to_record()).unwrap();
        ledger.mint().unwrap();
    }

    #[test]
    fn end_to_end_issue_verify_and_tamper() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");

        let mut credential =
            Credential::new("S1", "Alice", "P", "AI", CredentialKind::MicroCert, issuer.name());
        credential.attach_signature(issuer.sign_digest(credential.hash()));
        ledger.stage_pending(credential.to_record()).unwrap();
        ledger.mint().unwrap();

        assert_eq!(ledger.chain_len().unwrap(), 2);
        assert_eq!(ledger.pending_len().unwrap(), 0);
        assert_eq!(
            ledger.find_by_subject("S1").unwrap(),
            Some(credential.to_record())
        );

        let key = issuer.verifying_key();
        assert_eq!(
            CredentialVerifier::verify(&ledger, &key, "S1").unwrap(),
            Verdict::Valid
        );

        tamper(&ledger, |chain| chain[1].data[0].student_name = "Mallory".into());
        assert_eq!(
            CredentialVerifier::verify(&ledger, &key, "S1").unwrap(),
            Verdict::TamperedData
        );

        tamper(&ledger, |chain| {
            chain[1].data[0].student_name = "Alice".into();
            chain[1].previous_hash = "f".repeat(64);
        });
        assert!(!ledger.is_valid().unwrap());
        assert_eq!(
            CredentialVerifier::verify(&ledger, &key, "S1").unwrap(),
            Verdict::ChainInvalid
        );
    }

    #[test]
    fn unknown_subject_is_not_found() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");
        assert_eq!(
            CredentialVerifier::verify(&ledger, &issuer.verifying_key(), "S404").unwrap(),
            Verdict::NotFound
        );
    }

    #[test]
    fn wrong_issuer_key_is_invalid_signature() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");
        let impostor = Signer::generate("Issuer A");
        issue(&ledger, &issuer, "S1", "Alice");

        assert_eq!(
            CredentialVerifier::verify(&ledger, &impostor.verifying_key(), "S1").unwrap(),
            Verdict::InvalidSignature
        );
    }

    #[test]
    fn unsigned_or_garbled_signature_is_invalid() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");
        let unsigned =
            Credential::new("S1", "Alice", "P", "AI", CredentialKind::Degree, issuer.name());
        ledger.stage_pending(unsigned.to_record()).unwrap();
        ledger.mint().unwrap();
        let key = issuer.verifying_key();

        assert_eq!(
            CredentialVerifier::verify(&ledger, &key, "S1").unwrap(),
            Verdict::InvalidSignature
        );

        let mut garbled = unsigned.to_record();
        garbled.signature = Some("%%%not-base64%%%".into());
        assert_eq!(
            CredentialVerifier::check_record(&garbled, &key),
            Verdict::InvalidSignature
        );
    }

    #[test]
    fn stored_signature_rewritten_on_chain_is_invalid() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");
        issue(&ledger, &issuer, "S1", "Alice");
        let key = issuer.verifying_key();

        tamper(&ledger, |chain| chain[1].data[0].signature = Some("%%%not-base64%%%".into()));
        assert_eq!(
            CredentialVerifier::verify(&ledger, &key, "S1").unwrap(),
            Verdict::InvalidSignature
        );

        tamper(&ledger, |chain| chain[1].data[0].signature = None);
        assert_eq!(
            CredentialVerifier::verify(&ledger, &key, "S1").unwrap(),
            Verdict::InvalidSignature
        );
    }

    #[test]
    fn stored_hash_rewritten_on_chain_is_tampered() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");
        issue(&ledger, &issuer, "S1", "Alice");

        tamper(&ledger, |chain| chain[1].data[0].hash = "0".repeat(64));
        assert_eq!(
            CredentialVerifier::verify(&ledger, &issuer.verifying_key(), "S1").unwrap(),
            Verdict::TamperedData
        );
    }

    #[test]
    fn separator_and_escape_characters_in_fields_verify() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer|A\\");
        let credential =
            Credential::issue("S|1", "Al\\ice", "P|Q", "A\\|I", CredentialKind::Degree, &issuer);
        ledger.stage_pending(credential.to_record()).unwrap();
        ledger.mint().unwrap();

        assert_eq!(
            ledger.find_by_subject("S|1").unwrap(),
            Some(credential.to_record())
        );
        assert_eq!(
            CredentialVerifier::verify(&ledger, &issuer.verifying_key(), "S|1").unwrap(),
            Verdict::Valid
        );
        assert!(ledger.is_valid().unwrap());
    }

    #[test]
    fn tampering_reported_before_signature() {
        let issuer = Signer::generate("Issuer A");
        let other = Signer::generate("Issuer B");
        let mut record =
            Credential::issue("S1", "Alice", "P", "AI", CredentialKind::Degree, &issuer).to_record();
        record.program = "Forged".into();
        // Even with the wrong key, the hash check runs first.
        assert_eq!(
            CredentialVerifier::check_record(&record, &other.verifying_key()),
            Verdict::TamperedData
        );
    }

    #[test]
    fn signature_checked_before_chain() {
        let ledger = InMemoryLedger::new().unwrap();
        let issuer = Signer::generate("Issuer A");
        issue(&ledger, &issuer, "S1", "Alice");
        issue(&ledger, &issuer, "S2", "Bob");

        tamper(&ledger, |chain| chain[2].data[0].student_name = "Mallory".into());
        let other = Signer::generate("Issuer B");
        assert_eq!(
            CredentialVerifier::verify(&ledger, &other.verifying_key(), "S1").unwrap(),
            Verdict::InvalidSignature
        );
        assert_eq!(
            CredentialVerifier::verify(&ledger, &issuer.verifying_key(), "S1").unwrap(),
            Verdict::ChainInvalid
        );
    }

    #[test]
    fn verdict_display_and_validity() {
        assert!(Verdict::Valid.is_valid());
        assert!(!Verdict::ChainInvalid.is_valid());
        assert_eq!(Verdict::NotFound.to_string(), "credential not found on the ledger");
    }
}
