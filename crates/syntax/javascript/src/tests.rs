//! Tests for the JavaScript translator.

use super::*;
use rhizome_sprig_ir::{Form, RawFormatter};

fn assert_transform(source: &str, expected: &str) {
    let globals = GlobalSet::host_default();
    let result = transform(source, &globals).expect("transform failed");
    assert_eq!(result, format!("{expected}\n"), "source: {}", source);
}

fn transform_error(source: &str) -> TransformError {
    let globals = GlobalSet::host_default();
    match transform(source, &globals) {
        Ok(text) => panic!("expected failure for {source:?}, got {text:?}"),
        Err(err) => err,
    }
}

fn assert_unsupported(source: &str) {
    let err = transform_error(source);
    assert!(
        matches!(err, TransformError::Translate(TranslateError::Unsupported { .. })),
        "source: {source}, error: {err}"
    );
}

#[test]
fn test_literals() {
    assert_transform("42", "42");
    assert_transform("0x1f", "0x1f");
    assert_transform("\"a\\\"b\"", "\"a\\\"b\"");
    assert_transform("'it\\'s'", "\"it's\"");
    assert_transform("true", "true");
    assert_transform("null", "nil");
    assert_transform("undefined", "nil");
    assert_transform("/ab+c/gi", "#\"(?i)ab+c\"");
}

#[test]
fn test_arithmetic() {
    assert_transform("2 / 1", "(/ 2 1)");
    assert_transform("2 / 1 / 9 / 6", "(/ (/ (/ 2 1) 9) 6)");
    assert_transform("+x", "(+ x)");
    assert_transform("-345", "(- 345)");
    assert_transform("typeof x", "(typeof x)");
}

#[test]
fn test_operator_normalization() {
    assert_transform("a == b", "(= a b)");
    assert_transform("a === b", "(= a b)");
    assert_transform("a != b", "(not= a b)");
    assert_transform("a !== b", "(not= a b)");
    assert_transform("a || b", "(or a b)");
    assert_transform("a && b", "(and a b)");
    assert_transform("!a", "(not a)");
    assert_transform("f(a === b) || !(c && d)", "(or (f (= a b)) (not (and c d)))");
}

#[test]
fn test_delete() {
    assert_transform("delete obj.x", "(js-delete obj \"x\")");
    assert_transform("delete obj[key]", "(js-delete obj key)");
    assert!(matches!(
        transform_error("delete x"),
        TransformError::Translate(TranslateError::InvalidDelete { .. })
    ));
}

#[test]
fn test_getters() {
    assert_transform("x", "x");
    assert_transform("x.y", "(.-y x)");
    assert_transform("x.y.z", "(.. x -y -z)");
    assert_transform("a[b].c", "(.-c (aget a b))");
    assert_transform("Math.PI", "(.-PI js/Math)");
    assert_transform("x[\"y\"]", "(aget x \"y\")");
}

#[test]
fn test_calls() {
    assert_transform("x()", "(x)");
    assert_transform("f(1, \"a\")", "(f 1 \"a\")");
    assert_transform("setTimeout()", "(js/setTimeout)");
    assert_transform("x.y.z()", "(.z (.-y x))");
    assert_transform("global.setTimeout()", "(.setTimeout js/global)");
    assert_transform("Math.sqrt(4)", "(.sqrt js/Math 4)");
    assert_transform("x[\"y\"]()", "((aget x \"y\"))");
    assert_transform("(function () {})()", "((fn []))");
}

#[test]
fn test_call_pipelines() {
    assert_transform("a().b()", "(.b (a))");
    assert_transform("a().b().c()", "(-> (a) (.b) (.c))");
    assert_transform("a(1).b(2).c(3).d()", "(-> (a 1) (.b 2) (.c 3) (.d))");
    assert_transform(
        "fetch(url).then(r => r.json()).then(show)",
        "(-> (js/fetch url) (.then (fn [r] (.json r))) (.then show))",
    );
}

#[test]
fn test_receiver() {
    assert_transform("this.x", "(this-as this (.-x this))");
    assert_transform("this.a.b", "(this-as this (.. this -a -b))");
    assert_transform("this.x(1)", "(this-as this (.x this 1))");
    assert_transform("f(this)", "(f (this-as this this))");
}

#[test]
fn test_declarations() {
    assert_transform("var x = 1", "(def x 1)");
    assert_transform("let x", "(def x nil)");
    assert_transform("const x = x => x", "(defn x [x] x)");
    assert_transform("const f = function (a) { return a }", "(defn f [a] a)");
    assert_transform("const f = function g(a) { return a }", "(def f (fn g [a] a))");
    assert_transform("var a = 1, b = 2", "(def a 1)\n\n(def b 2)");
}

#[test]
fn test_functions() {
    assert_transform("function f(a, b) { return a }", "(defn f [a b] a)");
    assert_transform("(function (a, b) { return a })", "(fn [a b] a)");
    assert_transform("((a, b) => a)", "(fn [a b] a)");
    assert_transform("function f() {}", "(defn f [])");
    assert_transform("function f() { return; }", "(defn f [] nil)");
    assert_transform("function f(a) { g(a); return a }", "(defn f [a] (g a) a)");
}

#[test]
fn test_local_bindings() {
    assert_transform(
        "function f() { const a = 1; const b = 2; return a + b }",
        "(defn f [] (let [a 1 b 2] (+ a b)))",
    );
    assert_transform(
        "function f() { let a = 1, b; return b }",
        "(defn f [] (let [a 1 b nil] b))",
    );
    assert_transform(
        "function f() { g(); const a = 1; return a }",
        "(defn f [] (g) (let [a 1] a))",
    );
    assert_transform(
        "function f() { const g = (x) => x; return g(1) }",
        "(defn f [] (let [g (fn [x] x)] (g 1)))",
    );
}

#[test]
fn test_arrays() {
    assert_transform("[]", "#js []");
    assert_transform("[1, 2]", "#js [1 2]");
    assert_transform("[1, ...[2, 3], 4]", "(.concat #js [1] #js [2 3] 4)");
    assert_transform("[1, ...x, ...y.z]", "(.concat (.concat #js [1] x) (.-z y))");
}

#[test]
fn test_objects() {
    assert_transform("({a: 1, \"b\": 2})", "#js {:a 1 :b 2}");
    assert_transform("({a, b})", "#js {:a a :b b}");
    assert_transform("({\"a b\": 1})", "#js {\"a b\" 1}");
    assert_transform("({f(x) { return x }})", "#js {:f (fn [x] x)}");
    assert_transform(
        "({...x, a: 1})",
        "(js/Object.assign #js {} x #js {:a 1})",
    );
    assert_unsupported("({[k]: 1})");
    assert_unsupported("({get a() { return 1 }})");
}

#[test]
fn test_conditionals() {
    assert_transform("a ? b : c", "(if a b c)");
    assert_transform("if (a) { b() }", "(when a (b))");
    assert_transform("if (a) { b() } else { c() }", "(if a (b) (c))");
    assert_transform("if (a) { b(); c() } else d()", "(if a (do (b) (c)) (d))");
    assert_transform(
        "if (a) { x() } else if (b) { y() } else { e() }",
        "(cond a (x) b (y) :else (e))",
    );
    assert_transform(
        "if (a) { x() } else if (b) { y() }",
        "(cond a (x) b (y) :else nil)",
    );
    assert_transform(
        "if (a) x(); else if (b) y(); else if (c) z(); else w();",
        "(cond a (x) b (y) c (z) :else (w))",
    );
}

#[test]
fn test_switch() {
    assert_transform(
        "switch (x) { case 1: f(); break; default: g(); }",
        "(case x 1 (f) (g))",
    );
    assert_transform(
        "switch (x) { case 1: case 2: f(); break; case 3: g(); h(); break; }",
        "(case x (1 2) (f) 3 (do (g) (h)) nil)",
    );
    assert_transform(
        "switch (x) { default: g(); break; case 1: f(); }",
        "(case x 1 (f) (g))",
    );
    assert_transform(
        "function h(x) { switch (x) { case \"a\": return 1; default: return 2; } }",
        "(defn h [x] (case x \"a\" 1 2))",
    );
    assert_transform(
        "switch (x) { case 1: const y = 2; f(y); break; }",
        "(case x 1 (let [y 2] (f y)) nil)",
    );
}

#[test]
fn test_switch_braced_clauses() {
    assert_transform(
        "switch (x) { case 1: { f(); break; } default: { g(); } }",
        "(case x 1 (f) (g))",
    );
    assert_transform(
        "switch (x) { case 1: { const y = 2; f(y); break; } }",
        "(case x 1 (let [y 2] (f y)) nil)",
    );
}

#[test]
fn test_switch_without_default_yields_nil() {
    assert_transform("switch (x) { case 1: f(); }", "(case x 1 (f) nil)");
    assert_transform("switch (x) { case 1: case 2: }", "(case x (1 2) nil nil)");
}

#[test]
fn test_switch_rejects_early_break() {
    for source in [
        "switch (x) { case 1: if (y) { break; } f(); break; default: g(); }",
        "switch (x) { case 1: f(); break; g(); }",
        "switch (x) { case 1: try { f(); } catch (e) { break; } g(); break; }",
        "switch (x) { case 1: { if (y) break; f(); } }",
    ] {
        assert!(
            matches!(
                transform_error(source),
                TransformError::Translate(TranslateError::Precondition { rule: "switch", .. })
            ),
            "source: {source}"
        );
    }
    assert_transform(
        "switch (x) { case 1: switch (y) { case 2: f(); break; } break; }",
        "(case x 1 (case y 2 (f) nil) nil)",
    );
}

#[test]
fn test_switch_preconditions() {
    assert!(matches!(
        transform_error("switch (x) { case 1: f(); case 2: g(); }"),
        TransformError::Translate(TranslateError::Precondition { rule: "switch", .. })
    ));
    assert!(matches!(
        transform_error("switch (x) { case 1: f(); break; default: }"),
        TransformError::Translate(TranslateError::Precondition { rule: "switch", .. })
    ));
}

#[test]
fn test_try_throw_new() {
    assert_transform(
        "try { f() } catch (e) { g(e) } finally { h() }",
        "(try (f) (catch js/Object e (g e)) (finally (h)))",
    );
    assert_transform("try { f() } catch { g() }", "(try (f) (catch js/Object _ (g)))");
    assert_transform("try { f() } finally { h() }", "(try (f) (finally (h)))");
    assert_transform("throw new Error(\"x\")", "(throw (new js/Error \"x\"))");
    assert_transform("new Date()", "(new js/Date)");
    assert_transform("new Foo(1)", "(new Foo 1)");
}

#[test]
fn test_templates() {
    assert_transform("`a${b}c`", "(str \"a\" b \"c\")");
    assert_transform("`${a}`", "(str \"\" a \"\")");
    assert_transform("`line\\n${x.y}`", "(str \"line\\n\" (.-y x) \"\")");
}

#[test]
fn test_jsx() {
    assert_transform("<div className=\"x\">hi</div>", "[:div {:className \"x\"} \"hi\"]");
    assert_transform("<App />", "[App nil]");
    assert_transform("<input disabled />", "[:input {:disabled true}]");
    assert_transform("<ul>{items}</ul>", "[:ul nil items]");
    assert_transform(
        "<div onClick={() => f()}>x</div>",
        "[:div {:onClick (fn [] (f))} \"x\"]",
    );
    assert_transform(
        "<div>\n  <Item id={1} />\n  <span>a</span>\n</div>",
        "[:div nil [Item {:id 1}] [:span nil \"a\"]]",
    );
}

#[test]
fn test_imports() {
    assert_transform("import * as R from \"react\"", "(def R (js/require \"react\"))");
    assert_transform(
        "import { useState } from \"react\"",
        "(def useState (.-useState (js/require \"react\")))",
    );
    assert_transform(
        "import React from \"react\"",
        "(def React (.-default (js/require \"react\")))",
    );
    assert_transform("import \"./style.css\"", "(js/require \"./style.css\")");
    assert_transform(
        "import React, { useState as us } from \"react\"",
        "(def React (.-default (js/require \"react\")))\n\n(def us (.-useState (js/require \"react\")))",
    );
}

#[test]
fn test_exports() {
    assert_transform("export default x", "(set! (.-default js/exports) x)");
    assert_transform(
        "export default function f(a) { return a }",
        "(do (defn f [a] a) (set! (.-default js/exports) f))",
    );
    assert_transform(
        "export const a = 1, b = 2",
        "(do (def a 1) (def b 2) (set! (.-a js/exports) a) (set! (.-b js/exports) b))",
    );
    assert_transform(
        "export { a, b as c }",
        "(set! (.-a js/exports) a)\n\n(set! (.-c js/exports) b)",
    );
}

#[test]
fn test_assignment() {
    assert_transform("x = 1", "(set! x 1)");
    assert_transform("x.y = 1", "(set! (.-y x) 1)");
    assert_transform("a.b.c = 1", "(set! (.-c (.-b a)) 1)");
    assert_transform("x += 1", "(set! x (+ x 1))");
    assert_transform("a[k] = v", "(aset a k v)");
    assert_transform("a[k] *= 2", "(aset a k (* (aget a k) 2))");
    assert_transform("this.x = 1", "(this-as that (set! (.-x that) 1))");
    assert_transform(
        "this.a.b = this.c",
        "(this-as that (set! (.-b (.-a that)) (this-as this (.-c this))))",
    );
    assert_unsupported("x ||= 1");
}

#[test]
fn test_compound_assignment_evaluates_target_once() {
    assert_transform("this.n += 1", "(this-as that (set! (.-n that) (+ (.-n that) 1)))");
    assert_transform("a[\"k\"] -= 1", "(aset a \"k\" (- (aget a \"k\") 1))");
    for source in ["f().x += 1", "a[i()] *= 2", "a[f()].b -= 1"] {
        assert!(
            matches!(
                transform_error(source),
                TransformError::Translate(TranslateError::Precondition { rule: "assignment", .. })
            ),
            "source: {source}"
        );
    }
    assert_transform("f().x = 1", "(set! (.-x (f)) 1)");
    assert_transform("a[i()] = 2", "(aset a (i) 2)");
}

#[test]
fn test_statements() {
    assert_transform("debugger", "(js-debugger)");
    assert_transform("var a = 1; foo(a)", "(def a 1)\n\n(foo a)");
    assert_eq!(transform(";", &GlobalSet::host_default()).unwrap(), "");
}

#[test]
fn test_comments() {
    let globals = GlobalSet::host_default();
    assert_eq!(
        transform("// hello\nfoo()", &globals).unwrap(),
        ";; hello\n(foo)\n"
    );
    assert_eq!(
        transform("a();\n// note\n/* more\n * lines */\nb(); // trailing\n", &globals).unwrap(),
        "(a)\n\n;; note\n;; more\n;; lines\n(b)\n"
    );
}

#[test]
fn test_unsupported_constructs_fail() {
    assert_unsupported("class A {}");
    assert_unsupported("for (;;) {}");
    assert_unsupported("while (a) { b() }");
    assert_unsupported("a?.b");
    assert_unsupported("i++");
    assert_unsupported("f(...args)");
    assert_unsupported("let { a } = b");
    assert_unsupported("function f({ a }) { return a }");
    assert_unsupported("async function f() {}");
    assert_unsupported("function* g() {}");
    assert_unsupported("<></>");
}

#[test]
fn test_syntax_error() {
    assert!(matches!(
        transform_error("let x = ;"),
        TransformError::Parse(ParseError::Syntax { line: 1, .. })
    ));
}

#[test]
fn test_injected_globals() {
    let none = GlobalSet::empty();
    assert_eq!(transform("setTimeout()", &none).unwrap(), "(setTimeout)\n");

    let mut custom = GlobalSet::empty();
    custom.include("React");
    assert_eq!(
        transform("React.createElement(App)", &custom).unwrap(),
        "(.createElement js/React App)\n"
    );

    let prefixed = |name: &str| name.starts_with('$');
    assert_eq!(transform("$(el)", &prefixed).unwrap(), "(js/$ el)\n");
}

#[test]
fn test_globals_only_qualify_callee_positions() {
    assert_transform("f(Math)", "(f Math)");
    assert_transform("x = window", "(set! x window)");
    assert_transform("window.location", "(.-location js/window)");
}

#[test]
fn test_to_lisp_ast() {
    let form = to_lisp_ast("delete obj.x", &GlobalSet::host_default()).unwrap();
    assert_eq!(
        form,
        Form::program(vec![Form::call(
            "js-delete",
            vec![Form::symbol("obj"), Form::string("x")],
        )])
    );
}

#[test]
fn test_raw_output() {
    let text = transform_with("x.y.z()", &GlobalSet::empty(), &RawFormatter).unwrap();
    assert_eq!(text, "(.z (.-y x)\n\n)\n\n");
}

#[test]
fn test_translator_contexts() {
    let globals = GlobalSet::host_default();
    let translator = Translator::new(&globals);
    let node = Node::identifier("name");

    let forms = translator
        .next(&node, Context::naming(Naming::DotGetter))
        .unwrap();
    assert_eq!(forms, vec![Form::symbol(".-name")]);

    let node = Node::identifier("document");
    assert_eq!(
        translator.next(&node, Context::default()).unwrap(),
        vec![Form::symbol("document")]
    );
    assert_eq!(
        translator.next(&node, Context::callee()).unwrap(),
        vec![Form::symbol("js/document")]
    );
}
