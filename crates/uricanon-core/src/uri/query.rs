//! Ordered query-string container
//!
//! Entries keep their original order and raw (still percent-encoded) text,
//! so `parse(q).to_string() == q` for every query string.

use std::fmt;

/// One `key[=value]` pair; `None` means the `=` was absent
pub type QueryEntry = (String, Option<String>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    entries: Vec<QueryEntry>,
}

impl ParsedQuery {
    /// Split a raw query (without the leading `?`) into entries
    pub fn parse(query: &str) -> Self {
        if query.is_empty() {
            return Self::default();
        }
        let entries = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (pair.to_string(), None),
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = QueryEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[QueryEntry] {
        &self.entries
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// First value for `key`, if the key is present with a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Remove every entry whose key is exactly `key`; returns how many went
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        before - self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}", key)?;
            if let Some(value) = value {
                write!(f, "={}", value)?;
            }
        }
        Ok(())
    }
}
