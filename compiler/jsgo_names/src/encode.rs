//! Identifier and string-literal encoding for the host language.

use std::fmt::Write as _;

/// Separator used in synthesized identifiers. Legal in host identifiers and
/// never produced by [`encode_ident`] for anything else.
pub const MID_DOT: &str = "·";

/// Make any string safe to use as a host identifier.
///
/// ASCII letters, digits and `_` are kept, as is [`MID_DOT`]. Every other
/// character is written as its UTF-8 bytes, each as `$XX`. Since `$` itself
/// is escaped, distinct inputs never encode to the same output and no
/// encoded name contains a bare `$`, which leaves `$` free for suffixes
/// added by the allocator.
pub fn encode_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '·' {
            out.push(c);
            continue;
        }
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            let _ = write!(out, "${byte:02X}");
        }
    }
    out
}

/// Quote `s` as a host string literal, byte by byte.
///
/// Short escapes are used where the host has them; every byte outside
/// printable ASCII becomes `\xNN`, so the literal reproduces the exact byte
/// sequence.
pub fn encode_string(s: &[u8]) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s {
        match b {
            0x08 => out.push_str("\\b"),
            0x0C => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0B => out.push_str("\\v"),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\x{b:02X}");
            }
        }
    }
    out.push('"');
    out
}
