//! Source text to ClojureScript text.

use rhizome_sprig_ir::{generate, CompactFormatter, Form, FormatError, Formatter, GenerateError};
use thiserror::Error;
use tracing::debug;

use crate::config::ConfigError;
use crate::globals::GlobalScope;
use crate::parser::{parse, ParseError};
use crate::translator::{TranslateError, Translator};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parse and translate `source` into its form tree.
pub fn to_lisp_ast(source: &str, globals: &dyn GlobalScope) -> Result<Form, TransformError> {
    let program = parse(source)?;
    let form = Translator::new(globals).translate(&program)?;
    Ok(form)
}

/// Translate `source` and lay it out with [`CompactFormatter`].
pub fn transform(source: &str, globals: &dyn GlobalScope) -> Result<String, TransformError> {
    transform_with(source, globals, &CompactFormatter)
}

/// Translate `source` and lay it out with `formatter`.
pub fn transform_with(
    source: &str,
    globals: &dyn GlobalScope,
    formatter: &dyn Formatter,
) -> Result<String, TransformError> {
    let form = to_lisp_ast(source, globals)?;
    let raw = generate(&form)?;
    debug!(bytes = raw.len(), "generated ClojureScript");
    Ok(formatter.format(&raw)?)
}
