//! Normalizer configuration
//!
//! A [`NormalizerConfig`] is read once, turned into a [`crate::Normalizer`],
//! and never consulted again. Every field has a default, so an empty JSON
//! object is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Letter case used for hex digits in canonical output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    #[default]
    Lower,
    Upper,
}

impl HexCase {
    /// Apply this case to an ASCII hex string
    pub fn apply(self, hex: &mut String) {
        match self {
            HexCase::Lower => hex.make_ascii_lowercase(),
            HexCase::Upper => hex.make_ascii_uppercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Case of hex digits in canonical IPv6 hosts
    pub hex_case: HexCase,
    /// Register the session-id stripping rule
    pub strip_session_ids: bool,
    /// Register the default-port stripping rule
    pub strip_default_port: bool,
    /// Register the fragment stripping rule
    pub strip_fragment: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            hex_case: HexCase::Lower,
            strip_session_ids: true,
            strip_default_port: true,
            strip_fragment: false,
        }
    }
}

impl NormalizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = NormalizerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, NormalizerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            NormalizerConfig::from_json_str(r#"{"hex_case": "upper", "strip_fragment": true}"#)
                .unwrap();
        assert_eq!(config.hex_case, HexCase::Upper);
        assert!(config.strip_fragment);
        assert!(config.strip_session_ids);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = NormalizerConfig::from_json_str(r#"{"hexcase": "upper"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = NormalizerConfig::from_path(Path::new("/nonexistent/uricanon.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_hex_case_apply() {
        let mut s = String::from("fEdC");
        HexCase::Upper.apply(&mut s);
        assert_eq!(s, "FEDC");
        HexCase::Lower.apply(&mut s);
        assert_eq!(s, "fedc");
    }
}
