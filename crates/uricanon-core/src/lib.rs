//! uricanon core - URI canonicalization for web archiving and crawling
//!
//! Reduces URIs that a browser treats as equivalent to one canonical string,
//! so duplicate captures are recognized and dedup keys stay stable.
//!
//! # Architecture
//!
//! ```text
//! URI text → Tokenizer → UriBuilder → Normalizer (staged rules) → canonical text → dedup key
//!                                          ↓
//!                                  IP literal canonicalizer
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: same input and same rule registry always produce identical output
//! - **Idempotent**: canonicalizing a canonical URI is a no-op
//! - **Reentrant**: no global state; a built `Normalizer` is shared freely across threads
//! - **Explicit**: "not an IP literal" and "invalid IP literal" are different outcomes
//!
//! # Example
//!
//! ```
//! use uricanon_core::{Normalizer, NormalizerConfig};
//!
//! let normalizer = Normalizer::default_pipeline(&NormalizerConfig::default());
//! let canonical = normalizer
//!     .canonicalize("HTTP://0xC0.0250.01:80/index.html?jsessionid=42")
//!     .unwrap();
//! assert_eq!(canonical, "http://192.168.0.1/index.html");
//! ```

pub mod config;
pub mod error;
pub mod ip;
pub mod normalizer;
pub mod uri;

pub use config::{HexCase, NormalizerConfig};
pub use error::{Error, Result};
pub use normalizer::{
    dedup_key, NormalizationRule, Normalizer, NormalizerBuilder, RuleDescription, Stage,
};
pub use uri::{ParsedQuery, Scheme, SchemeSet, UriBuilder};
