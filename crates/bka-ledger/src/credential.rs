use bka_crypto::{ContentHasher, Signature, Signer};
use bka_types::{CredentialKind, Digest};
use serde::{Deserialize, Serialize};

/// A single attested academic fact about a subject.
///
/// The content hash is computed at construction from the six identifying
/// fields and cannot change afterwards. The signature is attached once by the
/// issuing [`Signer`]; attaching again overwrites it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    student_id: String,
    student_name: String,
    program: String,
    specialization: String,
    credential_type: CredentialKind,
    issuer_name: String,
    hash: Digest,
    signature: Option<Signature>,
}

impl Credential {
    pub fn new(
        student_id: impl Into<String>,
        student_name: impl Into<String>,
        program: impl Into<String>,
        specialization: impl Into<String>,
        credential_type: CredentialKind,
        issuer_name: impl Into<String>,
    ) -> Self {
        let student_id = student_id.into();
        let student_name = student_name.into();
        let program = program.into();
        let specialization = specialization.into();
        let issuer_name = issuer_name.into();
        let hash = content_hash(
            &student_id,
            &student_name,
            &program,
            &specialization,
            credential_type,
            &issuer_name,
        );

        Self {
            student_id,
            student_name,
            program,
            specialization,
            credential_type,
            issuer_name,
            hash,
            signature: None,
        }
    }

    /// Build a credential attributed to `issuer` and sign it.
    pub fn issue(
        student_id: impl Into<String>,
        student_name: impl Into<String>,
        program: impl Into<String>,
        specialization: impl Into<String>,
        credential_type: CredentialKind,
        issuer: &Signer,
    ) -> Self {
        let mut credential = Self::new(
            student_id,
            student_name,
            program,
            specialization,
            credential_type,
            issuer.name(),
        );
        credential.attach_signature(issuer.sign_digest(&credential.hash));
        credential
    }

    /// Attach the issuer's signature over [`Credential::hash`].
    ///
    /// Re-signing replaces the previous signature; no history is kept.
    pub fn attach_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn specialization(&self) -> &str {
        &self.specialization
    }

    pub fn credential_type(&self) -> CredentialKind {
        self.credential_type
    }

    pub fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    pub fn hash(&self) -> &Digest {
        &self.hash
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Project to the plain record stored in blocks and sent over the wire.
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            student_id: self.student_id.clone(),
            student_name: self.student_name.clone(),
            program: self.program.clone(),
            specialization: self.specialization.clone(),
            credential_type: self.credential_type,
            issuer_name: self.issuer_name.clone(),
            hash: self.hash.to_hex(),
            signature: self.signature.as_ref().map(Signature::to_base64),
        }
    }
}

/// Storage and wire form of a credential.
///
/// Fields are plain and public: once a record sits in a block nothing in the
/// ledger protects it except the hashes, which is exactly what verification
/// checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub student_id: String,
    pub student_name: String,
    pub program: String,
    pub specialization: String,
    pub credential_type: CredentialKind,
    pub issuer_name: String,
    /// Lowercase hex SHA-256 content hash.
    pub hash: String,
    /// Base64 issuer signature over `hash`.
    pub signature: Option<String>,
}

impl CredentialRecord {
    /// Recompute the content hash from the six identifying fields.
    pub fn recompute_hash(&self) -> Digest {
        content_hash(
            &self.student_id,
            &self.student_name,
            &self.program,
            &self.specialization,
            self.credential_type,
            &self.issuer_name,
        )
    }

    /// Returns `true` if the stored hash matches the stored fields.
    pub fn hash_matches(&self) -> bool {
        self.recompute_hash().matches_hex(&self.hash)
    }
}

fn content_hash(
    student_id: &str,
    student_name: &str,
    program: &str,
    specialization: &str,
    credential_type: CredentialKind,
    issuer_name: &str,
) -> Digest {
    ContentHasher::hash_fields(&[
        student_id,
        student_name,
        program,
        specialization,
        credential_type.as_str(),
        issuer_name,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Credential {
        Credential::new("2001", "Test Student", "MITS", "AI", CredentialKind::MicroCert, "Ontario Tech University")
    }

    #[test]
    fn hash_computed_at_construction() {
        let c = sample();
        let expected =
            ContentHasher::hash(b"2001|Test Student|MITS|AI|MicroCert|Ontario Tech University");
        assert_eq!(c.hash(), &expected);
        assert!(!c.is_signed());
    }

    #[test]
    fn equal_fields_equal_hash() {
        assert_eq!(sample().hash(), sample().hash());
    }

    #[test]
    fn record_has_wire_shape() {
        let record = sample().to_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["student_id"], "2001");
        assert_eq!(json["credential_type"], "MicroCert");
        assert_eq!(json["hash"], sample().hash().to_hex());
        assert!(json["signature"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn issue_signs_the_hash() {
        let issuer = Signer::generate("Ontario Tech University");
        let c = Credential::issue("2001", "Test Student", "MITS", "AI", CredentialKind::Degree, &issuer);
        assert_eq!(c.issuer_name(), "Ontario Tech University");
        let record = c.to_record();
        let sig = record.signature.as_deref().unwrap();
        assert!(issuer.verifying_key().verify_encoded(&record.hash, sig));
    }

    #[test]
    fn re_signing_overwrites() {
        let first = Signer::generate("A");
        let second = Signer::generate("A");
        let mut c = sample();
        c.attach_signature(first.sign_digest(c.hash()));
        c.attach_signature(second.sign_digest(c.hash()));
        let record = c.to_record();
        let sig = record.signature.as_deref().unwrap();
        assert!(second.verifying_key().verify_encoded(&record.hash, sig));
        assert!(!first.verifying_key().verify_encoded(&record.hash, sig));
    }

    #[test]
    fn tampered_record_detected() {
        let mut record = sample().to_record();
        assert!(record.hash_matches());
        record.student_name = "Evil Hacker".into();
        assert!(!record.hash_matches());
    }

    #[test]
    fn kind_is_part_of_the_hash() {
        let mut record = sample().to_record();
        record.credential_type = CredentialKind::Degree;
        assert!(!record.hash_matches());
    }

    proptest! {
        #[test]
        fn mutating_any_field_breaks_hash(
            fields in proptest::collection::vec("[ -~]{0,16}", 5),
            slot in 0usize..5,
        ) {
            let c = Credential::new(
                fields[0].clone(),
                fields[1].clone(),
                fields[2].clone(),
                fields[3].clone(),
                CredentialKind::Degree,
                fields[4].clone(),
            );
            let mut record = c.to_record();
            prop_assert!(record.hash_matches());

            let target = match slot {
                0 => &mut record.student_id,
                1 => &mut record.student_name,
                2 => &mut record.program,
                3 => &mut record.specialization,
                _ => &mut record.issuer_name,
            };
            target.push('!');
            prop_assert!(!record.hash_matches());
        }
    }
}
