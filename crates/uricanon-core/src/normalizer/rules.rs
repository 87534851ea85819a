//! Built-in normalization rules
//!
//! Every rule here is idempotent on its own.

use crate::config::HexCase;
use crate::ip;
use crate::uri::{Scheme, SchemeSet, UriBuilder};
use crate::Result;

use super::{NormalizationRule, Stage};

// ── Case folding ───────────────────────────────────────────

/// ASCII-lowercases the scheme and any registered-name or IPvFuture host.
///
/// Runs first so that scheme filters and IPv4 detection see folded text.
/// IPv6 literals are left to [`CanonicalizeIpHost`], which applies the
/// configured hex case.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCaseSchemeAndHost;

impl NormalizationRule for LowerCaseSchemeAndHost {
    fn name(&self) -> &str {
        "lower-case-scheme-and-host"
    }

    fn stage(&self) -> Stage {
        Stage::PreParse
    }

    fn description(&self) -> &str {
        "Converts the scheme and non-IPv6 hosts to lower case."
    }

    fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        if uri.scheme().bytes().any(|b| b.is_ascii_uppercase()) {
            let scheme = uri.scheme().to_ascii_lowercase();
            uri.set_scheme(scheme);
        }

        if let Some(host) = uri.host() {
            let ipv6 = host.starts_with('[') && !is_ipvfuture(host);
            if !ipv6 && host.bytes().any(|b| b.is_ascii_uppercase()) {
                let host = host.to_ascii_lowercase();
                uri.set_host(Some(host));
            }
        }
        Ok(())
    }
}

fn is_ipvfuture(host: &str) -> bool {
    host.starts_with("[v") || host.starts_with("[V")
}

// ── IP hosts ───────────────────────────────────────────────

/// Rewrites IP literal hosts to their canonical text
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalizeIpHost {
    hex_case: HexCase,
}

impl CanonicalizeIpHost {
    pub fn new(hex_case: HexCase) -> Self {
        Self { hex_case }
    }
}

impl NormalizationRule for CanonicalizeIpHost {
    fn name(&self) -> &str {
        "canonicalize-ip-host"
    }

    fn stage(&self) -> Stage {
        Stage::InParse
    }

    fn description(&self) -> &str {
        "Rewrites IPv4 hosts in any numeric encoding to dotted decimal and \
         IPv6 hosts to compressed hex notation."
    }

    fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        let Some(host) = uri.host() else {
            return Ok(());
        };

        if let Some(canonical) = ip::canonicalize_host(host, self.hex_case)? {
            if canonical != host {
                uri.set_host(Some(canonical));
            }
        }
        Ok(())
    }
}

// ── Query ──────────────────────────────────────────────────

const SESSION_ID_KEYS: [&str; 2] = ["jsessionid", "phpsessionid"];

/// Strips common session id parameters from the query
#[derive(Debug, Clone)]
pub struct StripSessionId {
    schemes: SchemeSet,
}

impl StripSessionId {
    pub fn new() -> Self {
        Self {
            schemes: SchemeSet::of(&[Scheme::HTTP, Scheme::HTTPS]),
        }
    }
}

impl Default for StripSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationRule for StripSessionId {
    fn name(&self) -> &str {
        "strip-session-id"
    }

    fn stage(&self) -> Stage {
        Stage::PostParse
    }

    fn supported_schemes(&self) -> &SchemeSet {
        &self.schemes
    }

    fn description(&self) -> &str {
        "Removes query parameters with names: jsessionid and phpsessionid."
    }

    fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        let mut query = uri.parsed_query();
        let removed: usize = SESSION_ID_KEYS.iter().map(|key| query.remove(key)).sum();
        if removed > 0 {
            uri.set_parsed_query(query);
        }
        Ok(())
    }
}

// ── Port & fragment ────────────────────────────────────────

/// Drops a port equal to the scheme's well-known default
#[derive(Debug, Clone, Copy, Default)]
pub struct StripDefaultPort;

impl NormalizationRule for StripDefaultPort {
    fn name(&self) -> &str {
        "strip-default-port"
    }

    fn stage(&self) -> Stage {
        Stage::PostParse
    }

    fn description(&self) -> &str {
        "Removes the port when it is the default port of a well-known scheme."
    }

    fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        if let (Some(port), Some(scheme)) = (uri.port(), Scheme::lookup(uri.scheme())) {
            if scheme.default_port == Some(port) {
                uri.set_port(None);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StripFragment;

impl NormalizationRule for StripFragment {
    fn name(&self) -> &str {
        "strip-fragment"
    }

    fn stage(&self) -> Stage {
        Stage::PostParse
    }

    fn description(&self) -> &str {
        "Removes the fragment."
    }

    fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        uri.set_fragment(None);
        Ok(())
    }
}

// ── Closure rules ──────────────────────────────────────────

/// A rule built from a function, a stage and a scheme set.
///
/// For one-off transformations that do not deserve their own type.
pub struct FnRule<F> {
    name: String,
    stage: Stage,
    schemes: SchemeSet,
    transform: F,
}

impl<F> FnRule<F>
where
    F: Fn(&mut UriBuilder) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, stage: Stage, transform: F) -> Self {
        Self {
            name: name.into(),
            stage,
            schemes: SchemeSet::universal(),
            transform,
        }
    }

    pub fn with_schemes(mut self, schemes: SchemeSet) -> Self {
        self.schemes = schemes;
        self
    }
}

impl<F> NormalizationRule for FnRule<F>
where
    F: Fn(&mut UriBuilder) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn supported_schemes(&self) -> &SchemeSet {
        &self.schemes
    }

    fn normalize(&self, uri: &mut UriBuilder) -> Result<()> {
        (self.transform)(uri)
    }
}
