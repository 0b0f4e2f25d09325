use patchwork_json_pointer::{escape_component, PointerError, PointerPath};
use proptest::prelude::*;

#[test]
fn pointer_parse_serialize_matrix() {
    let cases = [
        ("/", vec![""]),
        ("/foo", vec!["foo"]),
        ("/foo/bar", vec!["foo", "bar"]),
        ("/a~0b/c~1d", vec!["a~b", "c/d"]),
        ("/arr/0", vec!["arr", "0"]),
        ("/arr/-", vec!["arr", "-"]),
        ("/~0/~1", vec!["~", "/"]),
    ];

    for (text, tokens) in cases {
        let path = PointerPath::parse(text).unwrap();
        assert_eq!(path.tokens(), tokens.as_slice(), "tokens of {text:?}");
        assert_eq!(path.serialize(), text);
    }
}

#[test]
fn pointer_syntax_errors() {
    for text in ["foo", "foo/bar", "/a~", "/a~b", "#foo"] {
        assert!(
            matches!(PointerPath::parse(text), Err(PointerError::InvalidSyntax(_))),
            "{text:?} should be rejected"
        );
    }
}

#[test]
fn fragment_form_matches_plain_form() {
    let plain = PointerPath::parse("/caf\u{e9}/x y").unwrap();
    let fragment = PointerPath::parse("#/caf%C3%A9/x%20y").unwrap();
    assert_eq!(plain, fragment);
}

proptest! {
    #[test]
    fn serialize_then_parse_preserves_tokens(tokens in prop::collection::vec("[a-z~/0-9 -]{0,6}", 1..6)) {
        let path = PointerPath::from_tokens(tokens.clone());
        let reparsed = PointerPath::parse(&path.serialize()).unwrap();
        prop_assert_eq!(reparsed.tokens(), tokens.as_slice());
    }

    #[test]
    fn escaped_tokens_never_fail(token in "\\PC{0,8}") {
        let text = format!("/{}", escape_component(&token));
        let path = PointerPath::parse(&text).unwrap();
        prop_assert_eq!(path.element(0).unwrap(), token.as_str());
    }
}
