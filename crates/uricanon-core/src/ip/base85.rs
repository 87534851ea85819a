//! RFC 1924 base-85 form of a 128-bit address

use crate::{Error, Result};

/// Number of digits in an encoded address; 85^20 > 2^128 > 85^19
pub const WIDTH: usize = 20;

const ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

fn digit_value(ch: char) -> Option<u128> {
    if !ch.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&b| b == ch as u8)
        .map(|p| p as u128)
}

/// Whether `text` should be read as base-85 rather than hex-colon notation.
///
/// The alphabet has no `:`, and a hex-colon literal of exactly twenty
/// characters always contains one.
pub fn looks_like_base85(text: &str) -> bool {
    text.chars().count() == WIDTH && !text.contains(':')
}

pub fn encode(value: u128) -> String {
    let mut digits = [ALPHABET[0]; WIDTH];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(rest % 85) as usize];
        rest /= 85;
    }
    digits.iter().map(|&b| b as char).collect()
}

pub fn decode(text: &str) -> Result<u128> {
    if text.chars().count() != WIDTH {
        return Err(Error::ipv6(
            text,
            format!("base-85 literal must be {} characters", WIDTH),
        ));
    }

    let mut value: u128 = 0;
    for ch in text.chars() {
        let digit = digit_value(ch)
            .ok_or_else(|| Error::ipv6(text, format!("'{}' is not a base-85 digit", ch)))?;
        value = value
            .checked_mul(85)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::ipv6(text, "base-85 value exceeds 128 bits"))?;
    }
    Ok(value)
}
