//! IP literal canonicalizer
//!
//! Pure, reentrant conversions between the textual forms of IP host literals
//! and their integer values (`u32` for IPv4, `u128` for IPv6), and back to
//! one canonical text form. Usable on their own, e.g. by host matching, and
//! by the host canonicalization rule of the normalizer.

pub mod base85;
pub mod ipv4;
pub mod ipv6;

pub use ipv4::{check_and_normalize_ipv4, check_ipv4, parse_ipv4, serialize_ipv4};
pub use ipv6::{check_and_normalize_ipv6, parse_ipv6, serialize_ipv6, serialize_ipv6_base85};

use crate::config::HexCase;
use crate::Result;

/// Canonicalize a URI host if it is an IP literal.
///
/// - `[...]` hosts are IPv6 literals; the interior is re-serialized.
///   IPvFuture literals (`[v1.xyz]`) are left alone.
/// - Other hosts are tried as IPv4 literals.
///
/// Returns `Ok(None)` when the host is not an IP literal.
pub fn canonicalize_host(host: &str, hex_case: HexCase) -> Result<Option<String>> {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        if inner.starts_with(&['v', 'V'][..]) {
            return Ok(None);
        }
        let canonical = check_and_normalize_ipv6(inner, hex_case)?;
        return Ok(Some(format!("[{}]", canonical)));
    }
    check_and_normalize_ipv4(host)
}
