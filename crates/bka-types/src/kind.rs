use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The sort of academic fact a credential attests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKind {
    /// A full degree program.
    Degree,
    /// A micro-certification.
    MicroCert,
}

impl CredentialKind {
    /// Canonical name, used both on the wire and in the credential hash.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Degree => "Degree",
            Self::MicroCert => "MicroCert",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "microcert" | "micro-cert" | "micro_cert" => Ok(Self::MicroCert),
            _ => Err(TypeError::UnknownCredentialKind(s.to_string())),
        }
    }
}
