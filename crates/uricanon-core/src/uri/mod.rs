//! Parsed URI handle and its collaborators
//!
//! [`UriBuilder`] is the mutable handle the normalizer rewrites. It is owned
//! by the caller for the whole pass; rules only ever borrow it.

pub mod query;
pub mod scheme;
pub mod tokenizer;

use std::fmt;

pub use query::{ParsedQuery, QueryEntry};
pub use scheme::{Scheme, SchemeSet};
pub use tokenizer::{Component, SpannedComponent, Tokenizer};

use crate::{Error, Result};

/// Mutable, component-wise URI representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriBuilder {
    scheme: String,
    user_info: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl UriBuilder {
    /// Split URI text into a builder.
    ///
    /// # Errors
    /// `MalformedUri` when the text has no scheme, an unterminated IP
    /// literal, or a port that is not a 16-bit decimal number.
    pub fn parse(text: &str) -> Result<Self> {
        let components = Tokenizer::new(text).tokenize()?;
        let mut builder = UriBuilder::default();

        for spanned in components {
            match spanned.component {
                Component::Scheme(s) => builder.scheme = s,
                Component::UserInfo(u) => builder.user_info = Some(u),
                Component::Host(h) => builder.host = Some(h),
                Component::Port(p) if p.is_empty() => {}
                Component::Port(p) => {
                    if !p.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(Error::MalformedUri(format!(
                            "port '{}' at offset {} is not a number",
                            p, spanned.offset
                        )));
                    }
                    let port = p.parse::<u16>().map_err(|_| {
                        Error::MalformedUri(format!(
                            "port {} at offset {} is out of range",
                            p, spanned.offset
                        ))
                    })?;
                    builder.port = Some(port);
                }
                Component::Path(p) => builder.path = p,
                Component::Query(q) => builder.query = Some(q),
                Component::Fragment(f) => builder.fragment = Some(f),
            }
        }

        Ok(builder)
    }

    // ── Accessors ──────────────────────────────────────────

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into();
    }

    pub fn user_info(&self) -> Option<&str> {
        self.user_info.as_deref()
    }

    pub fn set_user_info(&mut self, user_info: Option<String>) {
        self.user_info = user_info;
    }

    /// Host as written, brackets included for IP literals
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Raw query without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment;
    }

    // ── Query container ────────────────────────────────────

    pub fn parsed_query(&self) -> ParsedQuery {
        self.query.as_deref().map(ParsedQuery::parse).unwrap_or_default()
    }

    /// Write a query container back; an empty container removes the query
    pub fn set_parsed_query(&mut self, query: ParsedQuery) {
        self.query = if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        };
    }
}

impl fmt::Display for UriBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(ref host) = self.host {
            write!(f, "//")?;
            if let Some(ref user_info) = self.user_info {
                write!(f, "{}@", user_info)?;
            }
            write!(f, "{}", host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        }
        write!(f, "{}", self.path)?;
        if let Some(ref query) = self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
