use std::cmp::Ordering;

/// Compare two object keys for canonical ordering.
///
/// Integer keys come first, in numeric order, followed by every other key in
/// byte order. The class of a key depends on the key alone, so this is a
/// total order.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use patchwork_util::obj_key_cmp::obj_key_cmp;
///
/// assert_eq!(obj_key_cmp("9", "10"), Ordering::Less);
/// assert_eq!(obj_key_cmp("10", "1a"), Ordering::Less);
/// assert_eq!(obj_key_cmp("b", "a"), Ordering::Greater);
/// assert_eq!(obj_key_cmp("a", "a"), Ordering::Equal);
/// ```
pub fn obj_key_cmp(a: &str, b: &str) -> Ordering {
    match (int_key(a), int_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// `"1"` and `"-4"` are integer keys; `"01"`, `"+1"` and `"-0"` are text,
/// as is anything outside the `i64` range.
fn int_key(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && s != "-0";
    if canonical {
        s.parse().ok()
    } else {
        None
    }
}
