//! Whitespace removal for minified output.

/// Drop whitespace and block comments from generated code.
///
/// A whitespace character survives only where removing it would join two
/// tokens: between two identifier characters, or between `--` / `++`
/// halves (`a - -b`). Double-quoted string literals are copied verbatim.
/// A surviving separator keeps its original character, so a newline that
/// ends a statement stays a newline.
pub fn remove_whitespace(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\n' | '\r' => keep_separator(&mut out, c, chars.peek().copied()),
            '"' => {
                out.push(c);
                copy_string(&mut chars, &mut out);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                skip_comment(&mut chars);
                keep_separator(&mut out, ' ', chars.peek().copied());
            }
            _ => out.push(c),
        }
    }
    out
}

fn keep_separator(out: &mut String, sep: char, next: Option<char>) {
    if let (Some(prev), Some(next)) = (out.chars().next_back(), next) {
        if joins(prev, next) {
            out.push(sep);
        }
    }
}

/// Whether `prev` and `next` would lex differently without a separator.
fn joins(prev: char, next: char) -> bool {
    (is_ident_char(prev) && is_ident_char(next)) || (prev == next && matches!(prev, '-' | '+'))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

/// Copy the rest of a string literal whose opening quote was already
/// written.
fn copy_string(chars: &mut impl Iterator<Item = char>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => return,
            _ => {}
        }
    }
}

fn skip_comment(chars: &mut impl Iterator<Item = char>) {
    let mut star = false;
    for c in chars {
        if star && c == '/' {
            return;
        }
        star = c == '*';
    }
}
