//! JSON Pointer (RFC 6901) paths.
//!
//! This crate implements the pointer grammar used by JSON Patch documents
//! (RFC 6902), including the `#`-prefixed URL-encoded fragment form.
//!
//! # Example
//!
//! ```
//! use patchwork_json_pointer::PointerPath;
//!
//! let path = PointerPath::parse("/foo/a~1b").unwrap();
//! assert_eq!(path.tokens(), ["foo", "a/b"]);
//! assert_eq!(path.serialize(), "/foo/a~1b");
//!
//! let fragment = PointerPath::parse("#/a%20b").unwrap();
//! assert_eq!(fragment.tokens(), ["a b"]);
//! ```

use thiserror::Error;

pub mod path;
pub use path::{PointerPath, APPEND_TOKEN};

pub mod validate;
pub use validate::validate_json_pointer;

/// Decodes one raw token: `~1` becomes `/`, then `~0` becomes `~`.
///
/// Escape validity is checked separately by [`has_valid_escapes`].
///
/// ```
/// use patchwork_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("m~0n"), "m~n");
/// assert_eq!(unescape_component("x~1y"), "x/y");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('~', Some('0')) => {
                out.push('~');
                chars.next();
            }
            ('~', Some('1')) => {
                out.push('/');
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Encodes one token for pointer text (`~` as `~0`, `/` as `~1`).
///
/// ```
/// use patchwork_json_pointer::escape_component;
///
/// assert_eq!(escape_component("m~n"), "m~0n");
/// assert_eq!(escape_component("x/y"), "x~1y");
/// ```
pub fn escape_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns true when every `~` in a raw component starts a `~0` or `~1` escape.
pub fn has_valid_escapes(component: &str) -> bool {
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0') | Some('1')) {
            return false;
        }
    }
    true
}

/// Formats unescaped tokens as pointer text. Every token gets a leading `/`.
///
/// # Example
///
/// ```
/// use patchwork_json_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&["".to_string()]), "/");
/// assert_eq!(format_json_pointer(&["a/b".to_string(), "c".to_string()]), "/a~1b/c");
/// ```
pub fn format_json_pointer(tokens: &[String]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.len() + 1).sum());
    for token in tokens {
        out.push('/');
        out.push_str(&escape_component(token));
    }
    out
}

/// Whether `token` addresses a list position: ASCII digits without a
/// leading zero (`"0"` itself is fine).
///
/// ```
/// use patchwork_json_pointer::is_valid_index;
///
/// assert!(is_valid_index("10"));
/// assert!(!is_valid_index("010"));
/// assert!(!is_valid_index("-"));
/// ```
pub fn is_valid_index(token: &str) -> bool {
    match token.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("Invalid path syntax: {0}")]
    InvalidSyntax(String),
    #[error("The index {index} is not within the property path (length {len})")]
    OutOfBounds { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_order() {
        assert_eq!(unescape_component("plain"), "plain");
        assert_eq!(unescape_component("~0~1"), "~/");
        assert_eq!(unescape_component("~10"), "/0");
        assert_eq!(unescape_component("~01"), "~1");
    }

    #[test]
    fn test_escape_then_unescape() {
        for raw in ["", "a", "~", "/", "a~/b", "~1", "~0/"] {
            assert_eq!(unescape_component(&escape_component(raw)), raw);
        }
        assert_eq!(escape_component("~/"), "~0~1");
    }

    #[test]
    fn test_has_valid_escapes() {
        assert!(has_valid_escapes("plain"));
        assert!(has_valid_escapes("a~0b~1c"));
        assert!(!has_valid_escapes("a~2"));
        assert!(!has_valid_escapes("a~"));
        assert!(!has_valid_escapes("~~0"));
    }

    #[test]
    fn test_format_json_pointer() {
        assert_eq!(format_json_pointer(&[]), "");
        assert_eq!(format_json_pointer(&["".to_string(), "".to_string()]), "//");
        assert_eq!(
            format_json_pointer(&["x/y".to_string(), "~".to_string()]),
            "/x~1y/~0"
        );
    }

    #[test]
    fn test_list_indices() {
        assert!(is_valid_index("0"));
        assert!(is_valid_index("907"));
        assert!(!is_valid_index(""));
        assert!(!is_valid_index("00"));
        assert!(!is_valid_index("+1"));
        assert!(!is_valid_index("2e3"));
    }
}
