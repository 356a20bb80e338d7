//! Form tree to ClojureScript text.
//!
//! Rendering is purely structural. Lists are followed by a blank line so that
//! every top-level form stands on its own; the formatter (see
//! [`crate::format`]) normalizes the whitespace afterwards.

use crate::Form;
use thiserror::Error;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("program form can only appear at the root")]
    NestedProgram,

    #[error("string literal encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Regex flags with a ClojureScript (embedded flag group) equivalent.
const REGEX_FLAGS: &[char] = &['i', 'm', 'u'];

/// Render a form tree to ClojureScript source text.
pub fn generate(form: &Form) -> Result<String, GenerateError> {
    match form {
        Form::Program { children } => {
            let mut out = String::new();
            for child in children {
                if let Some(text) = emit(child)? {
                    out.push_str(&text);
                    if !text.ends_with('\n') {
                        out.push_str("\n\n");
                    }
                }
            }
            Ok(out)
        }
        other => Ok(emit(other)?.unwrap_or_default()),
    }
}

/// Render one form. Markers render as `None` and are skipped by every join.
fn emit(form: &Form) -> Result<Option<String>, GenerateError> {
    let text = match form {
        Form::Program { .. } => return Err(GenerateError::NestedProgram),
        Form::Empty | Form::Break => return Ok(None),

        Form::Symbol { name } => name.clone(),
        Form::Keyword { value } => format!(":{value}"),
        Form::Number { raw } => raw.clone(),
        Form::String { value } => serde_json::to_string(value)?,
        Form::Boolean { value } => value.to_string(),
        Form::Regex { pattern, flags } => regex_literal(pattern, flags),

        Form::List { children } => format!("({})\n\n", join(children)?),
        Form::Vector { children } => format!("[{}]", join(children)?),
        Form::HashMap { children } => format!("{{{}}}", join(children)?),
        Form::MapEntry { key, value } => join([key.as_ref(), value.as_ref()])?,
        Form::Tagged { tag, form } => match emit(form)? {
            Some(inner) => format!("{tag} {inner}"),
            None => tag.clone(),
        },
        Form::Comment { text } => format!(";; {text}\n"),
    };
    Ok(Some(text))
}

fn join<'a>(children: impl IntoIterator<Item = &'a Form>) -> Result<String, GenerateError> {
    let mut parts = Vec::new();
    for child in children {
        if let Some(text) = emit(child)? {
            parts.push(text);
        }
    }
    Ok(parts.join(" "))
}

fn regex_literal(pattern: &str, flags: &str) -> String {
    let kept: String = flags.chars().filter(|f| REGEX_FLAGS.contains(f)).collect();
    let mut out = String::from("#\"");
    if !kept.is_empty() {
        out.push_str("(?");
        out.push_str(&kept);
        out.push(')');
    }
    let mut escaped = false;
    for c in pattern.chars() {
        if c == '"' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out.push('"');
    out
}
