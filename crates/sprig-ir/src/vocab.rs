//! ClojureScript vocabulary used by the code generators.
//!
//! Every special form, macro and interop symbol the translator emits is named
//! here so frontends never spell target-language tokens inline.

// Binding forms
pub const DEF: &str = "def";
pub const DEFN: &str = "defn";
pub const FN: &str = "fn";
pub const LET: &str = "let";

// Control flow
pub const IF: &str = "if";
pub const WHEN: &str = "when";
pub const COND: &str = "cond";
pub const CASE: &str = "case";
pub const DO: &str = "do";
pub const TRY: &str = "try";
pub const CATCH: &str = "catch";
pub const FINALLY: &str = "finally";
pub const THROW: &str = "throw";

/// Keyword value used as the default branch of `cond`.
pub const ELSE: &str = "else";

// Values
pub const NIL: &str = "nil";

// Interop
pub const THIS_AS: &str = "this-as";
pub const SET: &str = "set!";
pub const NEW: &str = "new";
pub const THREAD_FIRST: &str = "->";
pub const DOT_DOT: &str = "..";
pub const AGET: &str = "aget";
pub const ASET: &str = "aset";
pub const STR: &str = "str";
pub const CONCAT: &str = ".concat";
pub const JS_DELETE: &str = "js-delete";
pub const JS_DEBUGGER: &str = "js-debugger";

/// Reader tag for host (JavaScript) array and object literals.
pub const HOST_TAG: &str = "#js";

/// Namespace prefix for symbols resolved in the host environment.
pub const HOST_NS: &str = "js/";

pub const HOST_OBJECT: &str = "js/Object";
pub const HOST_ASSIGN: &str = "js/Object.assign";
pub const HOST_REQUIRE: &str = "js/require";
pub const HOST_EXPORTS: &str = "js/exports";

/// Receiver name bound by `this-as` around plain `this` accesses.
pub const RECEIVER: &str = "this";

/// Receiver name bound around assignments through `this`, so that a nested
/// `this-as this` cannot shadow it.
pub const ALT_RECEIVER: &str = "that";

/// Binding name for a `catch` clause without a parameter.
pub const IGNORED: &str = "_";

/// Property read by default imports.
pub const DEFAULT_EXPORT: &str = "default";

/// Qualify a name with the host namespace (`js/name`).
pub fn host(name: &str) -> String {
    format!("{HOST_NS}{name}")
}

/// Property getter symbol used as a call head (`.-name`).
pub fn dot_getter(name: &str) -> String {
    format!(".-{name}")
}

/// Property getter symbol used inside `..` chains (`-name`).
pub fn getter(name: &str) -> String {
    format!("-{name}")
}

/// Method call symbol (`.name`).
pub fn method(name: &str) -> String {
    format!(".{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interop_names() {
        assert_eq!(host("setTimeout"), "js/setTimeout");
        assert_eq!(dot_getter("x"), ".-x");
        assert_eq!(getter("x"), "-x");
        assert_eq!(method("then"), ".then");
    }
}
