//! Header-safe rendering of JSON payloads.
//!
//! Header values must be visible ASCII. JSON produced by `serde_json` only
//! contains non-ASCII inside string literals, so replacing each such char
//! with a `\uXXXX` escape keeps the text valid JSON with the same meaning.

use std::fmt::Write as _;

/// Escapes every char outside printable ASCII as a JSON `\uXXXX` sequence
/// (surrogate pairs above the BMP).
///
/// Input is expected to be serialized JSON; raw control chars never appear
/// there because `serde_json` already escapes them.
pub fn ascii_escape_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        if (' '..='~').contains(&ch) {
            out.push(ch);
            continue;
        }
        let mut buf = [0u16; 2];
        for unit in ch.encode_utf16(&mut buf) {
            let _ = write!(out, "\\u{:04x}", unit);
        }
    }
    out
}

/// Cuts `s` to at most `max_bytes`, never splitting a char.
pub fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// ASCII-escapes and then cuts to `max_bytes`.
pub fn header_safe(json: &str, max_bytes: usize) -> String {
    truncate_bytes(&ascii_escape_json(json), max_bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_non_ascii_and_stays_parseable() {
        let json = r#"{"fileName":"résumé 🎉"}"#;
        let escaped = ascii_escape_json(json);
        assert!(escaped.is_ascii());
        assert!(escaped.contains("\\u00e9"));
        assert!(escaped.contains("\\ud83c\\udf89"));

        let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back["fileName"], "résumé 🎉");
    }

    #[test]
    fn escapes_del() {
        assert_eq!(ascii_escape_json("a\u{7f}b"), "a\\u007fb");
    }

    #[test]
    fn truncation_respects_budget() {
        let s = "x".repeat(1500);
        assert_eq!(header_safe(&s, 1000).len(), 1000);
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("short", 1000), "short");
    }
}
