use bka_types::Digest;

/// Separator placed between fields in the delimited canonical encoding.
pub const FIELD_SEPARATOR: char = '|';

const ESCAPE: char = '\\';

/// SHA-256 hasher over canonical byte encodings.
///
/// Two canonical forms are supported:
/// - delimited fields: a fixed-order list of strings joined by
///   [`FIELD_SEPARATOR`], used for credential content hashes
/// - JSON with keys sorted at every level and compact separators, used for
///   block hashes
///
/// Logically-equal inputs always produce the same bytes, so they always
/// produce the same [`Digest`].
pub struct ContentHasher;

impl ContentHasher {
    /// Hash raw bytes.
    pub fn hash(data: &[u8]) -> Digest {
        Digest::of(data)
    }

    /// Hash an ordered list of fields using the delimited encoding.
    pub fn hash_fields(fields: &[&str]) -> Digest {
        Self::hash(Self::canonical_fields(fields).as_bytes())
    }

    /// Delimited canonical encoding of an ordered list of fields.
    ///
    /// A separator or escape character inside a field is prefixed with `\`,
    /// so field boundaries stay unambiguous for any input. Fields containing
    /// neither encode verbatim.
    pub fn canonical_fields(fields: &[&str]) -> String {
        let mut out = String::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(FIELD_SEPARATOR);
            }
            for c in field.chars() {
                if c == FIELD_SEPARATOR || c == ESCAPE {
                    out.push(ESCAPE);
                }
                out.push(c);
            }
        }
        out
    }

    /// Hash a serializable value using the sorted-key JSON encoding.
    pub fn hash_json<T: serde::Serialize>(value: &T) -> Result<Digest, HasherError> {
        Ok(Self::hash(&Self::canonical_json(value)?))
    }

    /// Sorted-key JSON encoding of a serializable value.
    pub fn canonical_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, HasherError> {
        // `Value` objects are backed by an ordered map, so re-serializing through
        // it sorts keys at every nesting level.
        let value =
            serde_json::to_value(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        serde_json::to_vec(&value).map_err(|e| HasherError::Serialization(e.to_string()))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(data: &[u8], expected: &Digest) -> bool {
        Self::hash(data) == *expected
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
