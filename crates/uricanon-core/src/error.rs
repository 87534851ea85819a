//! Error types for URI canonicalization
//!
//! All fallible operations return `Result<T, Error>`.
//! "Not an IP literal" is never an error: detectors report it as
//! `Ok(None)` / `Ok(false)` so callers can tell it apart from a literal
//! that commits to IP syntax and then breaks it.

use thiserror::Error;

use crate::normalizer::Stage;

/// Canonicalization error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text committed to IPv4 literal syntax but violates its grammar or bounds
    #[error("Malformed IPv4 literal '{input}': {reason}")]
    MalformedIpv4 { input: String, reason: String },

    /// Text committed to IPv6 literal syntax but violates its grammar or bounds
    #[error("Malformed IPv6 literal '{input}': {reason}")]
    MalformedIpv6 { input: String, reason: String },

    /// A normalization rule rejected the URI; the pass was aborted
    #[error("Normalization rule '{rule}' failed in {stage} stage: {source}")]
    Normalization {
        rule: String,
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    /// The URI text could not be split into components
    #[error("Malformed URI: {0}")]
    MalformedUri(String),

    /// Invalid or unreadable normalizer configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn ipv4(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedIpv4 {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ipv6(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedIpv6 {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the rule that failed, if this is a pipeline failure
    pub fn rule(&self) -> Option<&str> {
        match self {
            Error::Normalization { rule, .. } => Some(rule.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for canonicalization operations
pub type Result<T> = std::result::Result<T, Error>;
