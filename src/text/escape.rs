//! Mapping between decrypted code units and editable strings.
//!
//! Printable units become their character.  Everything else (control codes,
//! surrogates, the private 0xF000 marker, the 0xFFF1..=0xFFFE range) is
//! written as the six-character token `\xHHHH` with lowercase hex digits, so
//! a string survives a trip through JSON or a text file unchanged.
//!
//! `\xffff` is the exception: 0xFFFF is the string terminator and is never
//! part of decoded text, so [`encode`](super::encode) refuses it.

use super::cipher::TERMINATOR;

const ESCAPE_LEN: usize = 6;

/// Whether `unit` is emitted as a literal character.
pub fn is_printable(unit: u16) -> bool {
    (0x20..=0xFFF0).contains(&unit) && unit != 0xF000 && !(0xD800..=0xDFFF).contains(&unit)
}

/// Render decrypted units as a string, dropping terminators.
pub fn units_to_text(units: &[u16]) -> String {
    let mut out = String::with_capacity(units.len());
    for &unit in units.iter().filter(|&&u| u != TERMINATOR) {
        match char::from_u32(u32::from(unit)).filter(|_| is_printable(unit)) {
            Some(c) => out.push(c),
            None => out.push_str(&format!("\\x{unit:04x}")),
        }
    }
    out
}

/// Parse a string back into code units.
///
/// `\x` followed by exactly four hex digits (either case) is one literal
/// unit.  Any other character contributes its code point truncated to 16
/// bits.
pub fn text_to_units(text: &str) -> Vec<u16> {
    let chars: Vec<char> = text.chars().collect();
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if let Some(unit) = escape_at(&chars, i) {
            units.push(unit);
            i += ESCAPE_LEN;
            continue;
        }
        units.push((u32::from(chars[i]) & 0xFFFF) as u16);
        i += 1;
    }
    units
}

fn escape_at(chars: &[char], i: usize) -> Option<u16> {
    let token = chars.get(i..i + ESCAPE_LEN)?;
    if token[0] != '\\' || token[1] != 'x' {
        return None;
    }
    let digits: String = token[2..].iter().collect();
    let mut raw = [0u8; 2];
    hex::decode_to_slice(&digits, &mut raw).ok()?;
    Some(u16::from_be_bytes(raw))
}
