//! URI tokenizer — splits URI text into its components
//!
//! `scheme ":" ["//" [userinfo "@"] host [":" port]] path ["?" query] ["#" fragment]`
//!
//! No component is decoded or validated beyond what is needed to find its
//! boundaries. Bracketed hosts keep their brackets.
//!
//! Guarantees:
//! - Deterministic: same input always produces the same component stream
//! - Errors carry the character offset where splitting failed

use crate::{Error, Result};

/// Component kinds, in the order they appear in a URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Scheme(String),
    UserInfo(String),
    Host(String),
    Port(String),
    Path(String),
    Query(String),
    Fragment(String),
}

/// Component with its character offset in the trimmed input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedComponent {
    pub component: Component,
    pub offset: usize,
}

/// Tokenizer for URI text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
}

impl Tokenizer {
    /// Create a tokenizer; surrounding ASCII whitespace is ignored
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.trim_matches(|c: char| c.is_ascii_whitespace()).chars().collect(),
            position: 0,
        }
    }

    /// Split the entire input into components
    pub fn tokenize(&mut self) -> Result<Vec<SpannedComponent>> {
        let mut components = Vec::new();

        components.push(self.read_scheme()?);

        if self.peek() == Some('/') && self.peek_ahead(1) == Some('/') {
            self.advance();
            self.advance();
            self.read_authority(&mut components)?;
        }

        let offset = self.position;
        let path = self.read_until(&['?', '#']);
        components.push(SpannedComponent {
            component: Component::Path(path),
            offset,
        });

        if self.peek() == Some('?') {
            self.advance();
            let offset = self.position;
            let query = self.read_until(&['#']);
            components.push(SpannedComponent {
                component: Component::Query(query),
                offset,
            });
        }

        if self.peek() == Some('#') {
            self.advance();
            let offset = self.position;
            let fragment = self.read_until(&[]);
            components.push(SpannedComponent {
                component: Component::Fragment(fragment),
                offset,
            });
        }

        Ok(components)
    }

    // ── Character helpers ──────────────────────────────────

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn read_until(&mut self, stops: &[char]) -> String {
        let start = self.position;
        while !self.is_at_end() && !stops.contains(&self.input[self.position]) {
            self.position += 1;
        }
        self.input[start..self.position].iter().collect()
    }

    // ── Scheme ─────────────────────────────────────────────

    fn read_scheme(&mut self) -> Result<SpannedComponent> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => {
                return Err(Error::MalformedUri(format!(
                    "scheme must start with a letter at offset {}",
                    self.position
                )))
            }
        }

        let scheme = self.read_until(&[':', '/', '?', '#']);
        if self.peek() != Some(':') {
            return Err(Error::MalformedUri("missing scheme".to_string()));
        }
        if let Some(bad) = scheme
            .chars()
            .find(|&c| !(c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'))
        {
            return Err(Error::MalformedUri(format!(
                "invalid character '{}' in scheme",
                bad
            )));
        }
        self.advance(); // consume ':'

        Ok(SpannedComponent {
            component: Component::Scheme(scheme),
            offset: 0,
        })
    }

    // ── Authority ──────────────────────────────────────────

    fn read_authority(&mut self, components: &mut Vec<SpannedComponent>) -> Result<()> {
        let start = self.position;
        let authority: Vec<char> = self.read_until(&['/', '?', '#']).chars().collect();

        // userinfo ends at the last '@'
        let host_start = match authority.iter().rposition(|&c| c == '@') {
            Some(at) => {
                components.push(SpannedComponent {
                    component: Component::UserInfo(authority[..at].iter().collect()),
                    offset: start,
                });
                at + 1
            }
            None => 0,
        };

        let rest = &authority[host_start..];
        let host_end = if rest.first() == Some(&'[') {
            match rest.iter().position(|&c| c == ']') {
                Some(close) => close + 1,
                None => {
                    return Err(Error::MalformedUri(format!(
                        "unterminated IP literal at offset {}",
                        start + host_start
                    )))
                }
            }
        } else {
            rest.iter().position(|&c| c == ':').unwrap_or(rest.len())
        };

        components.push(SpannedComponent {
            component: Component::Host(rest[..host_end].iter().collect()),
            offset: start + host_start,
        });

        match rest.get(host_end).copied() {
            None => {}
            Some(':') => components.push(SpannedComponent {
                component: Component::Port(rest[host_end + 1..].iter().collect()),
                offset: start + host_start + host_end + 1,
            }),
            Some(c) => {
                return Err(Error::MalformedUri(format!(
                    "unexpected character '{}' after IP literal at offset {}",
                    c,
                    start + host_start + host_end
                )))
            }
        }

        Ok(())
    }
}
