use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Settings for the `bka` shell, read from an optional TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Name the issuing signer is created under.
    pub issuer_name: String,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    /// How many characters of hashes and signatures to print.
    pub preview_len: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            issuer_name: "Ontario Tech University".into(),
            log_level: "warn".into(),
            preview_len: 60,
        }
    }
}

impl ShellConfig {
    /// Read `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// The configured log level, falling back to WARN for unknown names.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::WARN)
    }

    /// Issuer name from the command line if present, else from config.
    pub fn issuer_or(&self, override_name: Option<String>) -> String {
        override_name.unwrap_or_else(|| self.issuer_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ShellConfig::default();
        assert_eq!(c.issuer_name, "Ontario Tech University");
        assert_eq!(c.preview_len, 60);
        assert_eq!(c.tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(ShellConfig::load(None).unwrap(), ShellConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "issuer_name = \"Issuer A\"\nlog_level = \"debug\"").unwrap();

        let c = ShellConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.issuer_name, "Issuer A");
        assert_eq!(c.tracing_level(), tracing::Level::DEBUG);
        assert_eq!(c.preview_len, 60);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preview_len = \"lots\"").unwrap();
        assert!(ShellConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ShellConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn unknown_log_level_falls_back_to_warn() {
        let c = ShellConfig { log_level: "chatty".into(), ..Default::default() };
        assert_eq!(c.tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn command_line_issuer_wins() {
        let c = ShellConfig::default();
        assert_eq!(c.issuer_or(Some("Issuer A".into())), "Issuer A");
        assert_eq!(c.issuer_or(None), "Ontario Tech University");
    }
}
