//! External field annotations: the `js:"name"` struct tag key.

use std::fmt::Write as _;

/// Value of the `js` key in a struct tag, or `None` when the tag has no
/// such key or it is malformed.
///
/// Tags follow the conventional `key:"value" key2:"value2"` layout; the
/// value is a double-quoted string with the usual escapes.
pub fn get_js_tag(tag: &str) -> Option<String> {
    let mut rest = tag.as_bytes();
    while !rest.is_empty() {
        let skip = rest.iter().take_while(|&&b| b == b' ').count();
        rest = &rest[skip..];
        if rest.is_empty() {
            break;
        }

        // Key runs up to the colon; a space or quote first is malformed.
        let key_len = rest
            .iter()
            .take_while(|&&b| b != b' ' && b != b':' && b != b'"')
            .count();
        if key_len + 1 >= rest.len() || rest[key_len] != b':' || rest[key_len + 1] != b'"' {
            break;
        }
        let key = &rest[..key_len];
        rest = &rest[key_len + 1..];

        let mut i = 1;
        while i < rest.len() && rest[i] != b'"' {
            if rest[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= rest.len() {
            break;
        }
        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        if key == b"js" {
            return std::str::from_utf8(quoted).ok().and_then(unquote);
        }
    }
    None
}

/// Decode a double-quoted string literal.
fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {}
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                continue;
            }
        }
        let escaped = chars.next()?;
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0C),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0B),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            _ => None,
        };
        if let Some(b) = simple {
            out.push(b);
            continue;
        }
        match escaped {
            'x' => out.push(u8::try_from(hex_digits(&mut chars, 2)?).ok()?),
            '0'..='7' => {
                let mut value = escaped.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                out.push(u8::try_from(value).ok()?);
            }
            'u' | 'U' => {
                let width = if escaped == 'u' { 4 } else { 8 };
                let c = char::from_u32(hex_digits(&mut chars, width)?)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}

fn hex_digits(chars: &mut std::str::Chars<'_>, width: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..width {
        value = value.checked_mul(16)? + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

/// Property accessor for an external field name: `.name` when the name is
/// a valid host identifier, `["name"]` otherwise.
pub fn format_js_tag_val(tag: &str) -> String {
    let is_ident = tag.chars().enumerate().all(|(i, c)| {
        c.is_alphabetic() || (i != 0 && c.is_numeric()) || c == '$' || c == '_'
    });
    if is_ident {
        return format!(".{tag}");
    }
    format!("[\"{}\"]", js_escape(tag))
}

/// Escape for a host string literal that is also safe inside markup.
fn js_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '<' | '>' | '&' | '=' => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c if c < ' ' || c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}
