//! Form tree types.

use crate::vocab;
use serde::Serialize;

/// A node of the ClojureScript form tree.
///
/// Forms are built once by a frontend, handed to [`crate::generate`] and then
/// dropped. Use the constructors rather than the variants directly; they keep
/// call sites short and make the intent (`Form::call`, `Form::host_array`)
/// visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Form {
    /// Bare identifier or operator token.
    Symbol { name: String },
    /// Self-evaluating keyword, rendered with a leading `:`.
    Keyword { value: String },
    /// Numeric literal, kept as the source's lexical text.
    Number { raw: String },
    /// String literal (unescaped value).
    String { value: String },
    Boolean { value: bool },
    /// Regular expression literal.
    Regex { pattern: String, flags: String },
    /// Invocation or compound form: `(head args...)`.
    List { children: Vec<Form> },
    Vector { children: Vec<Form> },
    /// Associative literal; children are normally [`Form::MapEntry`] values.
    HashMap { children: Vec<Form> },
    MapEntry { key: Box<Form>, value: Box<Form> },
    /// Reader-tagged literal such as `#js [1 2]`.
    Tagged { tag: String, form: Box<Form> },
    /// Translation unit root.
    Program { children: Vec<Form> },
    Comment { text: String },
    /// Placeholder that renders as nothing.
    Empty,
    /// Early-exit placeholder that renders as nothing.
    Break,
}

impl Form {
    pub fn symbol(name: impl Into<String>) -> Self {
        Form::Symbol { name: name.into() }
    }

    pub fn keyword(value: impl Into<String>) -> Self {
        Form::Keyword {
            value: value.into(),
        }
    }

    /// Creates a numeric literal from its raw lexical text.
    pub fn number(raw: impl Into<String>) -> Self {
        Form::Number { raw: raw.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Form::String {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Form::Boolean { value }
    }

    pub fn regex(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Form::Regex {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    pub fn list(children: Vec<Form>) -> Self {
        Form::List { children }
    }

    pub fn vector(children: Vec<Form>) -> Self {
        Form::Vector { children }
    }

    pub fn hash_map(children: Vec<Form>) -> Self {
        Form::HashMap { children }
    }

    pub fn map_entry(key: Form, value: Form) -> Self {
        Form::MapEntry {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn tagged(tag: impl Into<String>, form: Form) -> Self {
        Form::Tagged {
            tag: tag.into(),
            form: Box::new(form),
        }
    }

    pub fn program(children: Vec<Form>) -> Self {
        Form::Program { children }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Form::Comment { text: text.into() }
    }

    pub fn empty() -> Self {
        Form::Empty
    }

    pub fn break_marker() -> Self {
        Form::Break
    }

    /// Creates a list headed by the symbol `head`: `(head args...)`.
    pub fn call(head: impl Into<String>, args: Vec<Form>) -> Self {
        let mut children = Vec::with_capacity(args.len() + 1);
        children.push(Form::symbol(head));
        children.extend(args);
        Form::List { children }
    }

    /// The `nil` symbol.
    pub fn nil() -> Self {
        Form::symbol(vocab::NIL)
    }

    /// Host array literal: `#js [items...]`.
    pub fn host_array(items: Vec<Form>) -> Self {
        Form::tagged(vocab::HOST_TAG, Form::vector(items))
    }

    /// Host object literal: `#js {entries...}`.
    pub fn host_object(entries: Vec<Form>) -> Self {
        Form::tagged(vocab::HOST_TAG, Form::hash_map(entries))
    }

    /// Collapses a statement sequence into one form.
    ///
    /// No forms become `(do)`, a single form is returned as is and anything
    /// longer is wrapped in `(do ...)`.
    pub fn sequence(mut forms: Vec<Form>) -> Self {
        if forms.len() == 1 {
            if let Some(form) = forms.pop() {
                return form;
            }
        }
        Form::call(vocab::DO, forms)
    }

    /// Returns the symbol name if this is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Form::Symbol { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the children of a list, vector, hash-map or program.
    pub fn children(&self) -> Option<&[Form]> {
        match self {
            Form::List { children }
            | Form::Vector { children }
            | Form::HashMap { children }
            | Form::Program { children } => Some(children),
            _ => None,
        }
    }

    /// Returns the head symbol if this is a list starting with a symbol.
    pub fn head(&self) -> Option<&str> {
        match self {
            Form::List { children } => children.first().and_then(Form::as_symbol),
            _ => None,
        }
    }

    /// Returns true for the placeholders that render as nothing.
    pub fn is_marker(&self) -> bool {
        matches!(self, Form::Empty | Form::Break)
    }

    /// Returns the name bound by a `(def name ...)` or `(defn name ...)` form.
    pub fn defined_name(&self) -> Option<&str> {
        match self.head() {
            Some(vocab::DEF) | Some(vocab::DEFN) => {
                self.children().and_then(|c| c.get(1)).and_then(Form::as_symbol)
            }
            _ => None,
        }
    }
}
