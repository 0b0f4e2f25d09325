//! Parsed pointer paths.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::validate::validate_json_pointer;
use crate::{format_json_pointer, has_valid_escapes, unescape_component, PointerError};

/// Final token that asks a write to append to the target collection.
pub const APPEND_TOKEN: &str = "-";

/// An immutable, decoded JSON Pointer.
///
/// A parsed path always holds at least one token: both `""` and `"/"`
/// address the single empty token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointerPath {
    tokens: Vec<String>,
}

impl PointerPath {
    /// Parse pointer text.
    ///
    /// A leading `#` marks the fragment form: the rest is URL-decoded
    /// (`+` counts as a space) before the pointer grammar is applied.
    ///
    /// # Errors
    ///
    /// - `PointerError::InvalidSyntax` when non-empty text does not start
    ///   with `/`, a `~` is not followed by `0` or `1`, or the fragment is
    ///   not valid UTF-8 once decoded
    ///
    /// # Example
    ///
    /// ```
    /// use patchwork_json_pointer::PointerPath;
    ///
    /// assert_eq!(PointerPath::parse("").unwrap().tokens(), [""]);
    /// assert_eq!(PointerPath::parse("/a/~0b").unwrap().tokens(), ["a", "~b"]);
    /// assert!(PointerPath::parse("a/b").is_err());
    /// assert!(PointerPath::parse("/a~2").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        validate_json_pointer(text)?;

        let decoded: Cow<'_, str> = match text.strip_prefix('#') {
            Some(fragment) => {
                let spaced = fragment.replace('+', " ");
                let decoded = urlencoding::decode(&spaced).map_err(|e| {
                    PointerError::InvalidSyntax(format!("fragment \"{text}\": {e}"))
                })?;
                Cow::Owned(decoded.into_owned())
            }
            None => Cow::Borrowed(text),
        };

        if !decoded.is_empty() && !decoded.starts_with('/') {
            return Err(PointerError::InvalidSyntax(format!(
                "\"{text}\" does not start with \"/\""
            )));
        }

        let body = decoded.get(1..).unwrap_or("");
        let tokens = body
            .split('/')
            .map(|raw| {
                if has_valid_escapes(raw) {
                    Ok(unescape_component(raw))
                } else {
                    Err(PointerError::InvalidSyntax(format!(
                        "token \"{raw}\" holds a \"~\" not followed by \"0\" or \"1\""
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tokens })
    }

    /// Build a path from already unescaped tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }

    /// Token at `index`.
    ///
    /// # Errors
    ///
    /// `PointerError::OutOfBounds` when `index >= len()`.
    pub fn element(&self, index: usize) -> Result<&str, PointerError> {
        self.tokens
            .get(index)
            .map(String::as_str)
            .ok_or(PointerError::OutOfBounds {
                index,
                len: self.tokens.len(),
            })
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// True when the final token is the append marker `-`.
    pub fn is_append(&self) -> bool {
        self.last() == Some(APPEND_TOKEN)
    }

    /// The path without its last token, or `None` for paths of length 0 or 1.
    ///
    /// # Example
    ///
    /// ```
    /// use patchwork_json_pointer::PointerPath;
    ///
    /// let path = PointerPath::parse("/a/b/c").unwrap();
    /// assert_eq!(path.parent().unwrap().serialize(), "/a/b");
    /// assert!(PointerPath::parse("/a").unwrap().parent().is_none());
    /// ```
    pub fn parent(&self) -> Option<PointerPath> {
        if self.tokens.len() <= 1 {
            return None;
        }
        Some(Self {
            tokens: self.tokens[..self.tokens.len() - 1].to_vec(),
        })
    }

    /// Re-escape every token and join them with `/`.
    pub fn serialize(&self) -> String {
        format_json_pointer(&self.tokens)
    }
}

impl fmt::Display for PointerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for PointerPath {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a PointerPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
