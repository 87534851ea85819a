//! IPv6 literal parsing and canonical serialization
//!
//! Parsing accepts full hex-colon notation, one `::` run, a trailing
//! dotted-decimal IPv4 suffix, and the RFC 1924 base-85 form. Serialization
//! follows RFC 5952 zero-run compression: the longest run of two or more zero
//! groups becomes `::`, the leftmost run wins ties.

use crate::config::HexCase;
use crate::{Error, Result};

use super::{base85, ipv4};

const GROUPS: usize = 8;

// ── Group conversions ──────────────────────────────────────

/// Split an address into its eight 16-bit groups, most significant first
pub fn to_groups(value: u128) -> [u16; GROUPS] {
    std::array::from_fn(|i| (value >> (112 - 16 * i)) as u16)
}

pub fn from_groups(groups: [u16; GROUPS]) -> u128 {
    groups
        .iter()
        .fold(0u128, |acc, &group| (acc << 16) | group as u128)
}

// ── Parsing ────────────────────────────────────────────────

/// Parse an IPv6 literal (without brackets).
///
/// # Errors
/// `MalformedIpv6` when the expanded group count is not eight, when `::`
/// occurs more than once, when a group is not 1–4 hex digits, when the
/// embedded IPv4 suffix is invalid, or when a base-85 literal is invalid.
pub fn parse_ipv6(text: &str) -> Result<u128> {
    if base85::looks_like_base85(text) {
        return base85::decode(text);
    }
    if text.is_empty() {
        return Err(Error::ipv6(text, "empty literal"));
    }

    let (head, tail) = match text.find("::") {
        Some(pos) => {
            let tail = &text[pos + 2..];
            if tail.contains("::") {
                return Err(Error::ipv6(text, "more than one '::'"));
            }
            (&text[..pos], Some(tail))
        }
        None => (text, None),
    };

    let head_groups = parse_groups(text, head, tail.is_none())?;
    let tail_groups = match tail {
        Some(tail) => parse_groups(text, tail, true)?,
        None => Vec::new(),
    };

    let present = head_groups.len() + tail_groups.len();
    let expected = if tail.is_some() { GROUPS - 1 } else { GROUPS };
    if (tail.is_some() && present > expected) || (tail.is_none() && present != expected) {
        let expanded = if tail.is_some() { present + 1 } else { present };
        return Err(Error::ipv6(
            text,
            format!("{} groups after expansion, expected {}", expanded, GROUPS),
        ));
    }

    let mut groups = [0u16; GROUPS];
    groups[..head_groups.len()].copy_from_slice(&head_groups);
    groups[GROUPS - tail_groups.len()..].copy_from_slice(&tail_groups);
    Ok(from_groups(groups))
}

/// Parse one side of a `::` (or the whole literal when there is none).
///
/// `allow_ipv4` is set when this piece ends the literal, the only place an
/// embedded IPv4 address may appear.
fn parse_groups(input: &str, piece: &str, allow_ipv4: bool) -> Result<Vec<u16>> {
    if piece.is_empty() {
        return Ok(Vec::new());
    }

    let parts: Vec<&str> = piece.split(':').collect();
    let mut groups = Vec::with_capacity(GROUPS);
    for (i, part) in parts.iter().enumerate() {
        let is_last = i + 1 == parts.len();
        if part.contains('.') {
            if !(is_last && allow_ipv4) {
                return Err(Error::ipv6(
                    input,
                    "embedded IPv4 address must be the final component",
                ));
            }
            let v4 = parse_embedded_ipv4(input, part)?;
            groups.push((v4 >> 16) as u16);
            groups.push(v4 as u16);
        } else {
            groups.push(parse_group(input, part)?);
        }
    }
    Ok(groups)
}

fn parse_group(input: &str, group: &str) -> Result<u16> {
    if group.is_empty() {
        return Err(Error::ipv6(input, "empty group"));
    }
    if group.len() > 4 {
        return Err(Error::ipv6(
            input,
            format!("group '{}' exceeds 16 bits", group),
        ));
    }
    if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::ipv6(
            input,
            format!("group '{}' is not hexadecimal", group),
        ));
    }
    u16::from_str_radix(group, 16)
        .map_err(|_| Error::ipv6(input, format!("group '{}' is not hexadecimal", group)))
}

fn parse_embedded_ipv4(input: &str, suffix: &str) -> Result<u32> {
    match ipv4::dotted_decimal(suffix) {
        Some(Ok(address)) => Ok(address),
        Some(Err(Error::MalformedIpv4 { reason, .. })) => Err(Error::ipv6(
            input,
            format!("embedded IPv4 address '{}': {}", suffix, reason),
        )),
        Some(Err(other)) => Err(other),
        None => Err(Error::ipv6(
            input,
            format!("'{}' is not a dotted-decimal IPv4 address", suffix),
        )),
    }
}

// ── Serialization ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ZeroRun {
    start: usize,
    len: usize,
}

/// Longest run of at least two zero groups, leftmost on ties
fn longest_zero_run(groups: &[u16; GROUPS]) -> Option<ZeroRun> {
    let mut longest = ZeroRun::default();
    let mut current = ZeroRun::default();

    for (i, &group) in groups.iter().enumerate() {
        if group == 0 {
            if current.len == 0 {
                current.start = i;
            }
            current.len += 1;
            // strict comparison keeps the earlier run on ties
            if current.len > longest.len {
                longest = current;
            }
        } else {
            current = ZeroRun::default();
        }
    }

    (longest.len >= 2).then_some(longest)
}

fn write_groups(out: &mut String, groups: &[u16]) {
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        out.push_str(&format!("{:x}", group));
    }
}

/// Serialize an address in canonical text form.
///
/// `serialize_ipv6(0, _)` is `"::"`.
pub fn serialize_ipv6(value: u128, hex_case: HexCase) -> String {
    let groups = to_groups(value);
    let mut out = String::with_capacity(39);

    match longest_zero_run(&groups) {
        Some(run) => {
            write_groups(&mut out, &groups[..run.start]);
            out.push_str("::");
            write_groups(&mut out, &groups[run.start + run.len..]);
        }
        None => write_groups(&mut out, &groups),
    }

    hex_case.apply(&mut out);
    out
}

/// Serialize an address as twenty base-85 digits
pub fn serialize_ipv6_base85(value: u128) -> String {
    base85::encode(value)
}

/// Parse any supported IPv6 form and return the canonical text
pub fn check_and_normalize_ipv6(text: &str, hex_case: HexCase) -> Result<String> {
    parse_ipv6(text).map(|value| serialize_ipv6(value, hex_case))
}
