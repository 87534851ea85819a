//! IPv4 literal parsing and canonicalization
//!
//! Accepts every encoding a browser accepts for an IPv4 host:
//!
//! - dotted decimal: `192.168.0.1`
//! - octal segments: `0300.0250.0.01`
//! - hex segments: `0xc0.0xa8.0.1`, `0Xc0.0250.01`
//! - shorthand with fewer than four segments, where the last segment fills
//!   the remaining low-order bits: `192.168.1` (last = 16 bits),
//!   `192.11010049` (last = 24 bits), `3232235521` (32 bits)
//! - percent-encoded characters, decoded over the whole text first so that
//!   `%2e` acts as a separator
//! - a single trailing dot: `192.168.0.1.`
//!
//! The canonical form is plain dotted decimal.

use std::net::Ipv4Addr;

use percent_encoding::percent_decode_str;

use crate::{Error, Result};

// ── Segment classification ─────────────────────────────────

/// Shape of one dot-separated segment, before any value is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentShape {
    Empty,
    /// `[0-9]+` or `0[xX][0-9a-fA-F]*`
    Numeral,
    /// Anything a hostname label may contain that is not a numeral
    Foreign,
}

fn shape(segment: &str) -> SegmentShape {
    let bytes = segment.as_bytes();
    if bytes.is_empty() {
        return SegmentShape::Empty;
    }
    let numeral = match bytes {
        [b'0', b'x' | b'X', digits @ ..] => digits.iter().all(u8::is_ascii_hexdigit),
        digits => digits.iter().all(u8::is_ascii_digit),
    };
    if numeral {
        SegmentShape::Numeral
    } else {
        SegmentShape::Foreign
    }
}

/// Value of a numeral segment in its prefix-selected base
fn segment_value(input: &str, segment: &str) -> Result<u64> {
    let (digits, radix) = if let Some(hex) = segment
        .strip_prefix("0x")
        .or_else(|| segment.strip_prefix("0X"))
    {
        (hex, 16)
    } else if segment.len() > 1 && segment.starts_with('0') {
        (&segment[1..], 8)
    } else {
        (segment, 10)
    };

    // A bare "0x" is zero, as in browsers
    if digits.is_empty() {
        return Ok(0);
    }

    u64::from_str_radix(digits, radix).map_err(|_| {
        Error::ipv4(
            input,
            format!("segment '{}' is not a valid base-{} number", segment, radix),
        )
    })
}

fn strip_trailing_dot(text: &str) -> &str {
    text.strip_suffix('.').unwrap_or(text)
}

/// Combine classified segments into an address.
///
/// Every segment but the last is one octet; the last one absorbs all
/// remaining low-order bits.
fn assemble(input: &str, segments: &[&str]) -> Result<u32> {
    if segments.len() > 4 {
        return Err(Error::ipv4(
            input,
            format!("{} segments, at most 4 allowed", segments.len()),
        ));
    }

    let mut values = Vec::with_capacity(segments.len());
    for segment in segments {
        match shape(segment) {
            SegmentShape::Empty => return Err(Error::ipv4(input, "empty segment")),
            SegmentShape::Foreign => {
                return Err(Error::ipv4(
                    input,
                    format!("segment '{}' is not a number", segment),
                ))
            }
            SegmentShape::Numeral => values.push(segment_value(input, segment)?),
        }
    }

    let Some((&last, leading)) = values.split_last() else {
        return Err(Error::ipv4(input, "no segments"));
    };

    let mut address: u32 = 0;
    for (i, &octet) in leading.iter().enumerate() {
        if octet > 255 {
            return Err(Error::ipv4(
                input,
                format!("segment {} value {} exceeds 255", i + 1, octet),
            ));
        }
        address |= (octet as u32) << (24 - 8 * i);
    }

    let remaining_bits = 32 - 8 * leading.len() as u32;
    let limit = (1u64 << remaining_bits) - 1;
    if last > limit {
        return Err(Error::ipv4(
            input,
            format!("final segment value {} exceeds {}", last, limit),
        ));
    }

    Ok(address | last as u32)
}

// ── Public API ─────────────────────────────────────────────

/// Parse an IPv4 literal in any supported encoding.
///
/// # Errors
/// `MalformedIpv4` when a segment is empty or not a numeral, when there are
/// more than four segments, or when a segment exceeds its bound after its
/// base is resolved. Values are never clamped.
pub fn parse_ipv4(text: &str) -> Result<u32> {
    let decoded = percent_decode_str(text)
        .decode_utf8()
        .map_err(|_| Error::ipv4(text, "percent-decoding yields invalid UTF-8"))?;
    let segments: Vec<&str> = strip_trailing_dot(&decoded).split('.').collect();
    assemble(text, &segments)
}

/// Fast-path check for an already canonical dotted-decimal literal.
///
/// Returns `Ok(false)` for anything that is not four plain decimal octets
/// without leading zeros, including alternative encodings that
/// [`check_and_normalize_ipv4`] would accept.
///
/// # Errors
/// `MalformedIpv4` when the text has the dotted-quad shape but an octet
/// exceeds 255.
pub fn check_ipv4(text: &str) -> Result<bool> {
    match dotted_decimal(text) {
        None => Ok(false),
        Some(parsed) => parsed.map(|_| true),
    }
}

/// Canonicalize `text` if it is an IPv4 literal.
///
/// Returns `Ok(None)` when the text is not an IP literal at all, e.g. a
/// hostname such as `8584905.fls.doubleclick.net`. Returns an error only when
/// every segment is numeric but the literal is still invalid, e.g.
/// `192.168.0.257`.
pub fn check_and_normalize_ipv4(text: &str) -> Result<Option<String>> {
    let Ok(decoded) = percent_decode_str(text).decode_utf8() else {
        return Ok(None);
    };
    let segments: Vec<&str> = strip_trailing_dot(&decoded).split('.').collect();

    let shapes: Vec<SegmentShape> = segments.iter().map(|s| shape(s)).collect();
    if shapes.contains(&SegmentShape::Foreign) || !shapes.contains(&SegmentShape::Numeral) {
        return Ok(None);
    }

    let address = assemble(text, &segments)?;
    Ok(Some(serialize_ipv4(address)))
}

/// Render an address as dotted decimal
pub fn serialize_ipv4(address: u32) -> String {
    Ipv4Addr::from(address).to_string()
}

/// Strict `dec-octet "." dec-octet "." dec-octet "." dec-octet` matcher.
///
/// `None` when the shape does not match; `Some(Err)` when it matches but an
/// octet is out of range.
pub(crate) fn dotted_decimal(text: &str) -> Option<Result<u32>> {
    let octets: Vec<&str> = text.split('.').collect();
    let well_formed = octets.len() == 4
        && octets.iter().all(|o| {
            (1..=3).contains(&o.len())
                && o.bytes().all(|b| b.is_ascii_digit())
                && !(o.len() > 1 && o.starts_with('0'))
        });
    if !well_formed {
        return None;
    }

    let mut address: u32 = 0;
    for octet in octets {
        // at most three digits, always fits
        let value: u32 = octet.parse().unwrap_or(u32::MAX);
        if value > 255 {
            return Some(Err(Error::ipv4(
                text,
                format!("octet {} exceeds 255", value),
            )));
        }
        address = (address << 8) | value;
    }
    Some(Ok(address))
}
