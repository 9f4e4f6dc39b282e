//! Whitespace as the browser's script engine sees it.
//!
//! Form checks use the ECMAScript `WhiteSpace` and `LineTerminator` sets so
//! the server agrees with client-side validation. They differ from
//! [`char::is_whitespace`]: U+FEFF counts as whitespace, U+0085 does not.

/// Whether `c` is whitespace under ECMAScript rules (what `\s` matches).
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{B}'
            | '\u{C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Strip leading and trailing whitespace, like `String.prototype.trim`.
#[must_use]
pub fn trim(s: &str) -> &str {
    s.trim_matches(is_whitespace)
}

/// Whether `s` is empty after [`trim`].
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.chars().all(is_whitespace)
}
