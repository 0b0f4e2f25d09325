/// Upper-cases the first character, leaving the rest untouched.
///
/// # Examples
///
/// ```
/// use patchwork_util::strings::ucfirst;
///
/// assert_eq!(ucfirst("fooBar"), "FooBar");
/// assert_eq!(ucfirst(""), "");
/// ```
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character, leaving the rest untouched.
pub fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Camelizes a property name.
///
/// Words are separated by `_` or spaces. Every word gets an upper-cased
/// first letter, the words are joined, and the first letter of the result is
/// lower-cased. Letters inside a word keep their case.
///
/// # Examples
///
/// ```
/// use patchwork_util::strings::camelize;
///
/// assert_eq!(camelize("foo_bar"), "fooBar");
/// assert_eq!(camelize("foo bar"), "fooBar");
/// assert_eq!(camelize("fooBar"), "fooBar");
/// ```
pub fn camelize(s: &str) -> String {
    let joined: String = s
        .split(|c| c == '_' || c == ' ')
        .map(ucfirst)
        .collect();
    lcfirst(&joined)
}
