//! PowerShell single-quoted string literals.
//!
//! Text inside `'...'` is never expanded. The only escape is doubling a
//! quote character, and PowerShell counts the typographic single quotes as
//! quote characters too.

use std::ffi::{OsStr, OsString};

/// Characters PowerShell accepts as single quotes.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Double every single-quote character so `s` survives inside `'...'`.
#[must_use]
pub fn escape_single_quoted(s: &OsStr) -> OsString {
    match s.to_str() {
        Some(text) => {
            let mut out = String::with_capacity(text.len());
            for c in text.chars() {
                out.push(c);
                if SINGLE_QUOTES.contains(&c) {
                    out.push(c);
                }
            }
            OsString::from(out)
        }
        None => escape_single_quoted_raw(s),
    }
}

#[cfg(windows)]
fn escape_single_quoted_raw(s: &OsStr) -> OsString {
    use std::os::windows::ffi::{OsStrExt, OsStringExt};

    let mut out = Vec::new();
    for unit in s.encode_wide() {
        out.push(unit);
        if SINGLE_QUOTES.iter().any(|&q| u32::from(unit) == q as u32) {
            out.push(unit);
        }
    }
    OsString::from_wide(&out)
}

#[cfg(unix)]
fn escape_single_quoted_raw(s: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let mut out = Vec::new();
    for &byte in s.as_bytes() {
        out.push(byte);
        if byte == b'\'' {
            out.push(byte);
        }
    }
    OsString::from_vec(out)
}

/// Wrap `s` in single quotes so PowerShell reads it as one literal token.
#[must_use]
pub fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        out.push(c);
        if SINGLE_QUOTES.contains(&c) {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typographic_quotes_are_escaped() {
        assert_eq!(
            escape_single_quoted(OsStr::new("a\u{2019}b")),
            OsString::from("a\u{2019}\u{2019}b")
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            escape_single_quoted(OsStr::new(r"C:\Temp\ldo1.ps1")),
            OsString::from(r"C:\Temp\ldo1.ps1")
        );
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("a;calc"), "'a;calc'");
        assert_eq!(quote_literal("cost $5"), "'cost $5'");
        assert_eq!(quote_literal("it's"), "'it''s'");
        assert_eq!(quote_literal("\u{2018}x\u{201B}"), "'\u{2018}\u{2018}x\u{201B}\u{201B}'");
        assert_eq!(quote_literal(""), "''");
    }
}
