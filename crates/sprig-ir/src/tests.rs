//! Tests for the form model.

use super::*;

#[test]
fn test_call_builds_symbol_headed_list() {
    let form = Form::call("inc", vec![Form::number("1")]);
    assert_eq!(
        form,
        Form::list(vec![Form::symbol("inc"), Form::number("1")])
    );
    assert_eq!(form.head(), Some("inc"));
}

#[test]
fn test_sequence() {
    assert_eq!(Form::sequence(vec![]), Form::call("do", vec![]));
    assert_eq!(Form::sequence(vec![Form::symbol("x")]), Form::symbol("x"));
    assert_eq!(
        Form::sequence(vec![Form::symbol("x"), Form::symbol("y")]),
        Form::call("do", vec![Form::symbol("x"), Form::symbol("y")])
    );
}

#[test]
fn test_defined_name() {
    let def = Form::call("def", vec![Form::symbol("x"), Form::number("1")]);
    let defn = Form::call(
        "defn",
        vec![Form::symbol("f"), Form::vector(vec![]), Form::nil()],
    );
    let other = Form::call("set!", vec![Form::symbol("x"), Form::number("1")]);

    assert_eq!(def.defined_name(), Some("x"));
    assert_eq!(defn.defined_name(), Some("f"));
    assert_eq!(other.defined_name(), None);
    assert_eq!(Form::symbol("def").defined_name(), None);
}

#[test]
fn test_accessors() {
    assert!(Form::empty().is_marker());
    assert!(Form::break_marker().is_marker());
    assert!(!Form::nil().is_marker());
    assert_eq!(Form::nil().as_symbol(), Some("nil"));
    assert_eq!(Form::keyword("a").children(), None);
    assert_eq!(
        Form::vector(vec![Form::keyword("a")]).children().map(<[Form]>::len),
        Some(1)
    );
}

#[test]
fn test_serializes_as_tagged_json() {
    let form = Form::call("js-delete", vec![Form::symbol("obj"), Form::string("x")]);
    let json = serde_json::to_value(&form).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "list",
            "children": [
                { "type": "symbol", "name": "js-delete" },
                { "type": "symbol", "name": "obj" },
                { "type": "string", "value": "x" },
            ]
        })
    );
    assert_eq!(
        serde_json::to_value(Form::empty()).unwrap(),
        serde_json::json!({ "type": "empty" })
    );
}

#[test]
fn test_generate_then_format() {
    let program = Form::program(vec![
        Form::call("def", vec![Form::symbol("a"), Form::number("1")]),
        Form::call("foo", vec![Form::symbol("a")]),
    ]);
    let raw = generate(&program).unwrap();
    assert_eq!(
        CompactFormatter.format(&raw).unwrap(),
        "(def a 1)\n\n(foo a)\n"
    );
}
