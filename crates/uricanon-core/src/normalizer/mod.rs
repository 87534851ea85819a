//! Normalization pipeline — rewrites a parsed URI into canonical form
//!
//! A [`Normalizer`] owns an immutable registry of [`NormalizationRule`]s per
//! [`Stage`]. One pass walks the stages in their fixed order and, inside each
//! stage, runs the rules in registration order, skipping any rule whose
//! scheme set does not contain the URI's scheme.
//!
//! # Pipeline
//!
//! `text → UriBuilder::parse → PreParse → InParse → PostParse → ReferenceResolve → Display`
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`, provided every
//!   registered rule is idempotent (all built-in rules are)
//! - **Deterministic**: same input and same registry always produce the same output
//! - **Fail-fast**: the first failing rule aborts the pass; the error names it
//! - **Shareable**: a built `Normalizer` is `Send + Sync` and never mutated

pub mod rules;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::config::NormalizerConfig;
use crate::uri::{SchemeSet, UriBuilder};
use crate::{Error, Result};

pub use rules::{
    CanonicalizeIpHost, FnRule, LowerCaseSchemeAndHost, StripDefaultPort, StripFragment,
    StripSessionId,
};

// ── Stages ─────────────────────────────────────────────────

/// Fixed points in URI processing at which rules run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Raw components, before any component-level canonicalization
    PreParse,
    /// Component-level canonicalization (host, port)
    InParse,
    /// Whole-URI rewrites over canonical components (query, fragment)
    PostParse,
    /// After reference resolution; last chance to rewrite
    ReferenceResolve,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::PreParse,
        Stage::InParse,
        Stage::PostParse,
        Stage::ReferenceResolve,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PreParse => "pre-parse",
            Stage::InParse => "in-parse",
            Stage::PostParse => "post-parse",
            Stage::ReferenceResolve => "reference-resolve",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Rules ──────────────────────────────────────────────────

static UNIVERSAL: SchemeSet = SchemeSet::universal();

/// A unit of canonicalization logic.
///
/// Rules must be stateless (or hold only immutable configuration) and
/// idempotent on their own: applying a rule to its own output changes nothing.
pub trait NormalizationRule: Send + Sync {
    /// Stable identity, used in errors and descriptions
    fn name(&self) -> &str;

    fn stage(&self) -> Stage;

    /// Schemes this rule runs for; universal by default
    fn supported_schemes(&self) -> &SchemeSet {
        &UNIVERSAL
    }

    /// Rewrite the URI in place
    fn normalize(&self, uri: &mut UriBuilder) -> Result<()>;

    /// Free-text explanation for documentation tooling
    fn description(&self) -> &str {
        ""
    }

    fn describe(&self) -> RuleDescription {
        RuleDescription {
            name: self.name().to_string(),
            stage: self.stage(),
            schemes: self.supported_schemes().names().map(String::from).collect(),
            description: self.description().to_string(),
        }
    }
}

/// Documentation record for one rule; has no effect on canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDescription {
    pub name: String,
    pub stage: Stage,
    /// Empty when the rule applies to every scheme
    pub schemes: Vec<String>,
    pub description: String,
}

// ── Pipeline ───────────────────────────────────────────────

/// Immutable, ordered rule registry
#[derive(Clone, Default)]
pub struct Normalizer {
    stages: BTreeMap<Stage, Vec<Arc<dyn NormalizationRule>>>,
}

impl Normalizer {
    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::default()
    }

    /// The standard rule set, configured by `config`
    pub fn default_pipeline(config: &NormalizerConfig) -> Self {
        let mut builder = Normalizer::builder()
            .register(LowerCaseSchemeAndHost)
            .register(CanonicalizeIpHost::new(config.hex_case));
        if config.strip_session_ids {
            builder = builder.register(StripSessionId::new());
        }
        if config.strip_default_port {
            builder = builder.register(StripDefaultPort);
        }
        if config.strip_fragment {
            builder = builder.register(StripFragment);
        }
        builder.build()
    }

    /// Run every applicable rule over `uri`, stage by stage.
    ///
    /// # Errors
    /// `Normalization` wrapping the cause reported by the first rule that
    /// fails. The remaining rules do not run and `uri` is left as that rule
    /// found it; callers must not treat it as canonical.
    pub fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        debug!(uri = %uri, "normalizing");

        for (&stage, rules) in &self.stages {
            for rule in rules {
                if !rule.supported_schemes().supports(uri.scheme()) {
                    trace!(rule = rule.name(), %stage, scheme = uri.scheme(), "scheme not supported, skipped");
                    continue;
                }

                rule.normalize(uri).map_err(|source| Error::Normalization {
                    rule: rule.name().to_string(),
                    stage,
                    source: Box::new(source),
                })?;
                trace!(rule = rule.name(), %stage, uri = %uri, "applied");
            }
        }

        debug!(uri = %uri, "normalized");
        Ok(())
    }

    /// Parse, normalize and serialize URI text
    pub fn canonicalize(&self, text: &str) -> Result<String> {
        let mut uri = UriBuilder::parse(text)?;
        self.normalize(&mut uri)?;
        Ok(uri.to_string())
    }

    /// Registered rules in execution order
    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn NormalizationRule>> {
        self.stages.values().flatten()
    }

    pub fn describe(&self) -> Vec<RuleDescription> {
        self.rules().map(|r| r.describe()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (stage, rules) in &self.stages {
            let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
            map.entry(stage, &names);
        }
        map.finish()
    }
}

/// Collects rules before a [`Normalizer`] is frozen.
///
/// Registration is only possible here, so a built pipeline can never be
/// modified while in use.
#[derive(Default)]
pub struct NormalizerBuilder {
    stages: BTreeMap<Stage, Vec<Arc<dyn NormalizationRule>>>,
}

impl NormalizerBuilder {
    /// Append a rule to its stage
    pub fn register(self, rule: impl NormalizationRule + 'static) -> Self {
        self.register_shared(Arc::new(rule))
    }

    /// Append an already shared rule to its stage
    pub fn register_shared(mut self, rule: Arc<dyn NormalizationRule>) -> Self {
        self.stages.entry(rule.stage()).or_default().push(rule);
        self
    }

    pub fn build(self) -> Normalizer {
        Normalizer {
            stages: self.stages,
        }
    }
}

// ── Dedup key ──────────────────────────────────────────────

/// SHA-256 of a canonical URI, as lowercase hex.
///
/// Stable across runs and processes; only meaningful for text produced by
/// [`Normalizer::canonicalize`].
pub fn dedup_key(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
