//! Text conversion between UTF-8 bytes and UTF-16 code units.

use std::rc::Rc;

const REPLACEMENT: u16 = 0xFFFD;

/// UTF-8 bytes to UTF-16 code units. Each byte that is not part of a valid
/// sequence becomes one U+FFFD.
pub fn utf8_to_utf16(bytes: &[u8]) -> Rc<[u16]> {
    if bytes.is_ascii() {
        return bytes.iter().map(|&b| u16::from(b)).collect();
    }
    let mut out: Vec<u16> = Vec::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.extend(chunk.valid().encode_utf16());
        out.extend(std::iter::repeat(REPLACEMENT).take(chunk.invalid().len()));
    }
    out.into()
}

/// UTF-16 code units to UTF-8 bytes. Surrogate pairs combine into one
/// scalar; a lone surrogate becomes U+FFFD.
pub fn utf16_to_utf8(units: &[u16]) -> Rc<[u8]> {
    if units.iter().all(|&u| u < 0x80) {
        #[expect(clippy::cast_possible_truncation, reason = "all units are ASCII")]
        return units.iter().map(|&u| u as u8).collect();
    }
    let text: String = char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    Rc::from(text.into_bytes())
}
