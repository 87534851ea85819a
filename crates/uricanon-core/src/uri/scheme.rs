//! Well-known schemes and scheme sets used as rule filters

use std::collections::BTreeSet;

/// A well-known URI scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheme {
    pub name: &'static str,
    pub default_port: Option<u16>,
}

impl Scheme {
    pub const HTTP: Scheme = Scheme { name: "http", default_port: Some(80) };
    pub const HTTPS: Scheme = Scheme { name: "https", default_port: Some(443) };
    pub const FTP: Scheme = Scheme { name: "ftp", default_port: Some(21) };
    pub const WS: Scheme = Scheme { name: "ws", default_port: Some(80) };
    pub const WSS: Scheme = Scheme { name: "wss", default_port: Some(443) };
    pub const FILE: Scheme = Scheme { name: "file", default_port: None };

    pub const WELL_KNOWN: [Scheme; 6] = [
        Scheme::HTTP,
        Scheme::HTTPS,
        Scheme::FTP,
        Scheme::WS,
        Scheme::WSS,
        Scheme::FILE,
    ];

    /// Find a well-known scheme by name, ignoring ASCII case
    pub fn lookup(name: &str) -> Option<Scheme> {
        Self::WELL_KNOWN
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Set of scheme names a rule applies to. The empty set means every scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeSet {
    names: BTreeSet<String>,
}

impl SchemeSet {
    pub const fn universal() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    pub fn of(schemes: &[Scheme]) -> Self {
        Self::from_names(schemes.iter().map(|s| s.name))
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            names: names.into_iter().map(|n| n.to_ascii_lowercase()).collect(),
        }
    }

    pub fn is_universal(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a rule with this set runs for `scheme`
    pub fn supports(&self, scheme: &str) -> bool {
        self.is_universal()
            || self
                .names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(scheme))
    }

    /// Scheme names in sorted order; empty for a universal set
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Scheme::lookup("http"), Some(Scheme::HTTP));
        assert_eq!(Scheme::lookup("HTTPS"), Some(Scheme::HTTPS));
        assert_eq!(Scheme::lookup("gopher"), None);
    }

    #[test]
    fn test_universal_supports_everything() {
        let set = SchemeSet::universal();
        assert!(set.is_universal());
        assert!(set.supports("http"));
        assert!(set.supports("urn"));
    }

    #[test]
    fn test_restricted_set() {
        let set = SchemeSet::of(&[Scheme::HTTP, Scheme::HTTPS]);
        assert!(set.supports("http"));
        assert!(set.supports("HTTPS"));
        assert!(!set.supports("ftp"));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["http", "https"]);
    }
}
