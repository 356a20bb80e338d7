//! Layout of generated ClojureScript text.
//!
//! The code generator emits structurally correct but loosely spaced text.
//! A [`Formatter`] turns that into the final layout. Real pretty-printers
//! (zprint, cljfmt) can sit behind this trait; [`CompactFormatter`] is the
//! built-in layout used by the CLI and the tests.

use thiserror::Error;

/// Errors that can occur while formatting generated text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unbalanced delimiter at byte {offset}")]
    Unbalanced { offset: usize },

    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },
}

/// Lays out generated ClojureScript text.
pub trait Formatter: Send + Sync {
    fn format(&self, raw: &str) -> Result<String, FormatError>;
}

/// Passes the generated text through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFormatter;

impl Formatter for RawFormatter {
    fn format(&self, raw: &str) -> Result<String, FormatError> {
        Ok(raw.to_string())
    }
}

/// One form per top-level item, single spaces inside forms.
///
/// ```
/// use rhizome_sprig_ir::{CompactFormatter, Formatter};
///
/// let text = CompactFormatter.format("(this-as this (.-x this)\n\n)\n\n").unwrap();
/// assert_eq!(text, "(this-as this (.-x this))\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open(char),
    Close(char),
    Atom(&'a str),
    Comment(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Nothing,
    Form,
    Comment,
}

impl Formatter for CompactFormatter {
    fn format(&self, raw: &str) -> Result<String, FormatError> {
        let tokens = tokenize(raw)?;

        let mut out = String::with_capacity(raw.len());
        let mut stack: Vec<(char, usize)> = Vec::new();
        let mut last = Last::Nothing;
        let mut needs_space = false;
        let mut glued = false;

        for (offset, token) in tokens {
            let top_level = stack.is_empty();
            if let Token::Close(_) = token {
            } else if top_level {
                if glued {
                    out.push(' ');
                } else if last == Last::Form {
                    out.push_str("\n\n");
                }
            } else if needs_space {
                out.push(' ');
            }
            glued = false;

            match token {
                Token::Open(c) => {
                    out.push(c);
                    stack.push((c, offset));
                    needs_space = false;
                }
                Token::Close(c) => {
                    match stack.pop() {
                        Some((open, _)) if closing(open) == c => {}
                        _ => return Err(FormatError::Unbalanced { offset }),
                    }
                    out.push(c);
                    needs_space = true;
                    if stack.is_empty() {
                        last = Last::Form;
                    }
                }
                Token::Atom(text) => {
                    out.push_str(text);
                    needs_space = true;
                    if top_level {
                        if is_reader_tag(text) {
                            glued = true;
                        } else {
                            last = Last::Form;
                        }
                    }
                }
                Token::Comment(text) => {
                    out.push_str(text);
                    out.push('\n');
                    needs_space = false;
                    if top_level {
                        last = Last::Comment;
                    }
                }
            }
        }

        if let Some((_, offset)) = stack.pop() {
            return Err(FormatError::Unbalanced { offset });
        }
        if last == Last::Form {
            out.push('\n');
        }
        Ok(out)
    }
}

fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_reader_tag(atom: &str) -> bool {
    atom.len() > 1 && atom.starts_with('#') && !atom.starts_with("#\"")
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';') || c.is_whitespace()
}

fn tokenize(raw: &str) -> Result<Vec<(usize, Token<'_>)>, FormatError> {
    let bytes = raw.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < raw.len() {
        let Some(c) = raw[pos..].chars().next() else {
            break;
        };
        match c {
            c if c.is_whitespace() => pos += c.len_utf8(),
            '(' | '[' | '{' => {
                tokens.push((pos, Token::Open(c)));
                pos += 1;
            }
            ')' | ']' | '}' => {
                tokens.push((pos, Token::Close(c)));
                pos += 1;
            }
            ';' => {
                let end = raw[pos..].find('\n').map_or(raw.len(), |i| pos + i);
                tokens.push((pos, Token::Comment(raw[pos..end].trim_end())));
                pos = end;
            }
            '"' => {
                let end = string_end(bytes, pos + 1)
                    .ok_or(FormatError::UnterminatedString { offset: pos })?;
                tokens.push((pos, Token::Atom(&raw[pos..end])));
                pos = end;
            }
            '#' if bytes.get(pos + 1) == Some(&b'"') => {
                let end = string_end(bytes, pos + 2)
                    .ok_or(FormatError::UnterminatedString { offset: pos })?;
                tokens.push((pos, Token::Atom(&raw[pos..end])));
                pos = end;
            }
            _ => {
                let end = raw[pos..]
                    .char_indices()
                    .find(|&(_, ch)| is_delimiter(ch))
                    .map_or(raw.len(), |(i, _)| pos + i);
                tokens.push((pos, Token::Atom(&raw[pos..end])));
                pos = end;
            }
        }
    }

    Ok(tokens)
}

/// Byte offset just past the closing quote of a string whose body starts at
/// `start`.
fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
