//! Host-environment globals.
//!
//! Identifiers that name a host global are emitted as `js/name` in callee,
//! receiver, getter-target and constructor positions. Which names count is an
//! explicit policy: [`GlobalSet::host_default`] is a fixed snapshot of common
//! browser and Node globals, and callers add or remove names as needed.

use std::collections::BTreeSet;

/// Answers "is this name bound in the host environment".
pub trait GlobalScope {
    fn is_global(&self, name: &str) -> bool;
}

impl<F> GlobalScope for F
where
    F: Fn(&str) -> bool,
{
    fn is_global(&self, name: &str) -> bool {
        self(name)
    }
}

/// Browser and Node globals known to the default policy.
pub const HOST_GLOBALS: &[&str] = &[
    // Language
    "Array",
    "ArrayBuffer",
    "BigInt",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "EvalError",
    "Float32Array",
    "Float64Array",
    "Function",
    "Infinity",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Intl",
    "JSON",
    "Map",
    "Math",
    "NaN",
    "Number",
    "Object",
    "Promise",
    "Proxy",
    "RangeError",
    "ReferenceError",
    "Reflect",
    "RegExp",
    "Set",
    "String",
    "Symbol",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "WeakMap",
    "WeakSet",
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "eval",
    "globalThis",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    // Timers and scheduling
    "clearInterval",
    "clearTimeout",
    "queueMicrotask",
    "setInterval",
    "setTimeout",
    // Browser
    "alert",
    "cancelAnimationFrame",
    "confirm",
    "console",
    "document",
    "fetch",
    "history",
    "localStorage",
    "location",
    "navigator",
    "requestAnimationFrame",
    "sessionStorage",
    "window",
    "Blob",
    "CustomEvent",
    "Event",
    "FormData",
    "Headers",
    "Request",
    "Response",
    "URL",
    "URLSearchParams",
    "WebSocket",
    "XMLHttpRequest",
    // Node
    "Buffer",
    "__dirname",
    "__filename",
    "clearImmediate",
    "exports",
    "global",
    "module",
    "process",
    "require",
    "setImmediate",
];

/// An explicit set of global names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSet {
    names: BTreeSet<String>,
}

impl GlobalSet {
    /// A set with no globals; nothing is ever qualified.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The [`HOST_GLOBALS`] snapshot.
    pub fn host_default() -> Self {
        HOST_GLOBALS.iter().copied().collect()
    }

    pub fn include(&mut self, name: impl Into<String>) -> &mut Self {
        self.names.insert(name.into());
        self
    }

    pub fn exclude(&mut self, name: &str) -> &mut Self {
        self.names.remove(name);
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GlobalSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl GlobalScope for GlobalSet {
    fn is_global(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_default() {
        let globals = GlobalSet::host_default();
        assert!(globals.is_global("setTimeout"));
        assert!(globals.is_global("Math"));
        assert!(globals.is_global("global"));
        assert!(!globals.is_global("x"));
        assert_eq!(globals.len(), HOST_GLOBALS.len());
    }

    #[test]
    fn test_include_exclude() {
        let mut globals = GlobalSet::empty();
        globals.include("React").include("name").exclude("name");
        assert!(globals.is_global("React"));
        assert!(!globals.is_global("name"));
    }

    #[test]
    fn test_closure_scope() {
        let scope = |name: &str| name.starts_with('$');
        assert!(scope.is_global("$"));
        assert!(!scope.is_global("x"));
    }
}
