//! JavaScript to ClojureScript translator.
//!
//! Uses tree-sitter for parsing JavaScript (including JSX), lowers the
//! syntax tree into [`Node`], then translates it into Sprig forms.
//!
//! ```
//! use rhizome_sprig_syntax_javascript::{transform, GlobalSet};
//!
//! let globals = GlobalSet::host_default();
//! let text = transform("setTimeout(() => done(), 10)", &globals).unwrap();
//! assert_eq!(text, "(js/setTimeout (fn [] (done)) 10)\n");
//! ```

pub mod ast;
pub mod config;
mod context;
mod globals;
pub mod heuristics;
mod parser;
mod pipeline;
mod translator;

pub use ast::Node;
pub use config::{Config, ConfigError};
pub use context::{Context, Naming};
pub use globals::{GlobalScope, GlobalSet, HOST_GLOBALS};
pub use parser::{parse, ParseError};
pub use pipeline::{to_lisp_ast, transform, transform_with, TransformError};
pub use translator::{TranslateError, Translator};

#[cfg(test)]
mod tests;
