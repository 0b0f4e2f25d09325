//! Shape check for pointer text before it is split into tokens.

use crate::PointerError;

/// Checks that `pointer` is empty, a `#` fragment or starts with `/`.
///
/// The fragment body is checked after URL-decoding by
/// [`PointerPath::parse`](crate::PointerPath::parse). Length is not limited.
///
/// # Example
///
/// ```
/// use patchwork_json_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("#/foo").unwrap();
/// validate_json_pointer("foo").unwrap_err();
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), PointerError> {
    if pointer.is_empty() || pointer.starts_with('#') || pointer.starts_with('/') {
        return Ok(());
    }
    Err(PointerError::InvalidSyntax(format!(
        "\"{pointer}\" does not start with \"/\""
    )))
}
