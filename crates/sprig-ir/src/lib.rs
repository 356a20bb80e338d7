//! ClojureScript form tree for Sprig.
//!
//! This crate defines the intermediate representation produced by syntax
//! frontends (JavaScript, etc.) and the code generator that renders it as
//! ClojureScript source text.
//!
//! # Form tree
//!
//! A [`Form`] is either an atom (symbol, keyword, literal), a collection
//! (list, vector, hash-map), a reader-tagged literal (`#js [...]`) or one of
//! the structural nodes (program root, comment, empty/break markers).
//!
//! Example:
//! ```
//! use rhizome_sprig_ir::{Form, generate};
//!
//! let form = Form::call("defn", vec![
//!     Form::symbol("inc"),
//!     Form::vector(vec![Form::symbol("x")]),
//!     Form::call("+", vec![Form::symbol("x"), Form::number("1")]),
//! ]);
//! assert_eq!(generate(&form).unwrap(), "(defn inc [x] (+ x 1)\n\n)\n\n");
//! ```

mod form;
pub mod codegen;
pub mod format;
pub mod vocab;

pub use codegen::{generate, GenerateError};
pub use form::Form;
pub use format::{CompactFormatter, FormatError, Formatter, RawFormatter};

#[cfg(test)]
mod tests;
