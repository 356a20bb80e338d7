//! Tree-sitter frontend: JavaScript (with JSX) source to [`Node`].

use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter::{Node as SyntaxNode, Parser};

use crate::ast::{DeclarationKind, MethodKind, Node};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load JavaScript grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    Failed,

    #[error("syntax error at {line}:{column}: {snippet}")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("malformed {kind} at {line}:{column}: missing {field}")]
    MissingField {
        kind: String,
        field: &'static str,
        line: usize,
        column: usize,
    },
}

/// Parse JavaScript source into a [`Node::Program`].
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_javascript::LANGUAGE.into())?;

    let tree = parser.parse(source, None).ok_or(ParseError::Failed)?;
    let root = tree.root_node();

    if root.has_error() {
        let node = first_error(root).unwrap_or(root);
        let position = node.start_position();
        let snippet = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            let text = node.utf8_text(source.as_bytes()).unwrap_or("");
            let line = text.lines().next().unwrap_or_default();
            format!("unexpected `{}`", line.chars().take(40).collect::<String>())
        };
        return Err(ParseError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
            snippet,
        });
    }

    let program = Lowering { source }.program(root)?;
    debug!(bytes = source.len(), "parsed source");
    Ok(program)
}

fn first_error<'t>(node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

/// Named children, without comments.
fn named_children<'t>(node: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Whether `node` has an anonymous token child spelled `token`.
fn has_token(node: SyntaxNode<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

struct Lowering<'a> {
    source: &'a str,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: SyntaxNode<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field<'t>(
        &self,
        node: SyntaxNode<'t>,
        field: &'static str,
    ) -> Result<SyntaxNode<'t>, ParseError> {
        node.child_by_field_name(field).ok_or_else(|| {
            let position = node.start_position();
            ParseError::MissingField {
                kind: node.kind().to_string(),
                field,
                line: position.row + 1,
                column: position.column + 1,
            }
        })
    }

    fn first_named<'t>(
        &self,
        node: SyntaxNode<'t>,
        what: &'static str,
    ) -> Result<SyntaxNode<'t>, ParseError> {
        named_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| {
                let position = node.start_position();
                ParseError::MissingField {
                    kind: node.kind().to_string(),
                    field: what,
                    line: position.row + 1,
                    column: position.column + 1,
                }
            })
    }

    fn unsupported(&self, node: SyntaxNode<'_>) -> Node {
        Node::Unsupported {
            kind: node.kind().to_string(),
            text: self.text(node).to_string(),
        }
    }

    fn boxed(&self, node: SyntaxNode<'_>) -> Result<Box<Node>, ParseError> {
        self.lower(node).map(Box::new)
    }

    fn lower_all(&self, nodes: Vec<SyntaxNode<'_>>) -> Result<Vec<Node>, ParseError> {
        nodes.into_iter().map(|node| self.lower(node)).collect()
    }

    fn program(&self, root: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let mut body = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        let mut last_row = None;

        let mut cursor = root.walk();
        let children: Vec<_> = root.named_children(&mut cursor).collect();

        for child in children {
            match child.kind() {
                "comment" => {
                    if last_row == Some(child.start_position().row) {
                        debug!("dropping trailing comment on line {}", child.start_position().row + 1);
                        continue;
                    }
                    pending.extend(comment_lines(self.text(child)));
                }
                "hash_bang_line" => {}
                _ => {
                    let comments = std::mem::take(&mut pending);
                    let node = match self.lower(child)? {
                        Node::ExpressionStatement { expression, .. } => {
                            Node::ExpressionStatement {
                                expression,
                                comments,
                            }
                        }
                        other => {
                            if !comments.is_empty() {
                                warn!(
                                    "dropping comment above {} on line {}",
                                    other.kind(),
                                    child.start_position().row + 1
                                );
                            }
                            other
                        }
                    };
                    last_row = Some(child.end_position().row);
                    body.push(node);
                }
            }
        }

        Ok(Node::Program { body })
    }

    fn lower(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        match node.kind() {
            // Statements
            "expression_statement" => Ok(Node::ExpressionStatement {
                expression: self.boxed(self.first_named(node, "expression")?)?,
                comments: Vec::new(),
            }),
            "statement_block" => Ok(Node::BlockStatement {
                body: self.lower_all(named_children(node))?,
            }),
            "empty_statement" => Ok(Node::EmptyStatement),
            "debugger_statement" => Ok(Node::DebuggerStatement),
            "return_statement" => Ok(Node::ReturnStatement {
                argument: match named_children(node).into_iter().next() {
                    Some(argument) => Some(self.boxed(argument)?),
                    None => None,
                },
            }),
            "throw_statement" => Ok(Node::ThrowStatement {
                argument: self.boxed(self.first_named(node, "argument")?)?,
            }),
            "break_statement" => {
                if node.child_by_field_name("label").is_some() {
                    Ok(self.unsupported(node))
                } else {
                    Ok(Node::BreakStatement)
                }
            }
            "if_statement" => self.if_statement(node),
            "switch_statement" => self.switch_statement(node),
            "try_statement" => self.try_statement(node),
            "lexical_declaration" | "variable_declaration" => self.declaration(node),
            "function_declaration" => {
                if has_token(node, "async") {
                    return Ok(self.unsupported(node));
                }
                Ok(Node::FunctionDeclaration {
                    id: Box::new(Node::identifier(self.text(self.field(node, "name")?))),
                    params: self.params(self.field(node, "parameters")?)?,
                    body: self.boxed(self.field(node, "body")?)?,
                })
            }
            "import_statement" => self.import_statement(node),
            "export_statement" => self.export_statement(node),

            // Expressions
            "parenthesized_expression" => self.lower(self.first_named(node, "expression")?),
            "identifier" | "property_identifier" | "shorthand_property_identifier" => {
                Ok(Node::identifier(self.text(node)))
            }
            "this" => Ok(Node::ThisExpression),
            "null" | "undefined" => Ok(Node::NullLiteral),
            "true" => Ok(Node::BooleanLiteral { value: true }),
            "false" => Ok(Node::BooleanLiteral { value: false }),
            "number" => Ok(Node::NumericLiteral {
                raw: self.text(node).to_string(),
            }),
            "string" => Ok(Node::StringLiteral {
                value: unescape(strip_quotes(self.text(node))),
            }),
            "regex" => Ok(Node::RegExpLiteral {
                pattern: self.text(self.field(node, "pattern")?).to_string(),
                flags: node
                    .child_by_field_name("flags")
                    .map(|flags| self.text(flags).to_string())
                    .unwrap_or_default(),
            }),
            "template_string" => self.template(node),
            "array" => Ok(Node::ArrayExpression {
                elements: self.lower_all(named_children(node))?,
            }),
            "object" => self.object(node),
            "spread_element" => Ok(Node::SpreadElement {
                argument: self.boxed(self.first_named(node, "argument")?)?,
            }),
            "function_expression" | "function" => {
                if has_token(node, "async") {
                    return Ok(self.unsupported(node));
                }
                Ok(Node::FunctionExpression {
                    id: node
                        .child_by_field_name("name")
                        .map(|name| Box::new(Node::identifier(self.text(name)))),
                    params: self.params(self.field(node, "parameters")?)?,
                    body: self.boxed(self.field(node, "body")?)?,
                })
            }
            "arrow_function" => {
                if has_token(node, "async") {
                    return Ok(self.unsupported(node));
                }
                let params = match node.child_by_field_name("parameter") {
                    Some(param) => vec![self.param(param)],
                    None => self.params(self.field(node, "parameters")?)?,
                };
                Ok(Node::ArrowFunctionExpression {
                    params,
                    body: self.boxed(self.field(node, "body")?)?,
                })
            }
            "unary_expression" => Ok(Node::UnaryExpression {
                operator: self.text(self.field(node, "operator")?).to_string(),
                argument: self.boxed(self.field(node, "argument")?)?,
            }),
            "binary_expression" => {
                let operator = self.text(self.field(node, "operator")?).to_string();
                let left = self.boxed(self.field(node, "left")?)?;
                let right = self.boxed(self.field(node, "right")?)?;
                if matches!(operator.as_str(), "&&" | "||" | "??") {
                    Ok(Node::LogicalExpression {
                        operator,
                        left,
                        right,
                    })
                } else {
                    Ok(Node::BinaryExpression {
                        operator,
                        left,
                        right,
                    })
                }
            }
            "assignment_expression" => Ok(Node::AssignmentExpression {
                operator: "=".to_string(),
                left: self.boxed(self.field(node, "left")?)?,
                right: self.boxed(self.field(node, "right")?)?,
            }),
            "augmented_assignment_expression" => Ok(Node::AssignmentExpression {
                operator: self.text(self.field(node, "operator")?).to_string(),
                left: self.boxed(self.field(node, "left")?)?,
                right: self.boxed(self.field(node, "right")?)?,
            }),
            "ternary_expression" => Ok(Node::ConditionalExpression {
                test: self.boxed(self.field(node, "condition")?)?,
                consequent: self.boxed(self.field(node, "consequence")?)?,
                alternate: self.boxed(self.field(node, "alternative")?)?,
            }),
            "call_expression" => {
                let arguments = self.field(node, "arguments")?;
                if node.child_by_field_name("optional_chain").is_some()
                    || arguments.kind() != "arguments"
                {
                    return Ok(self.unsupported(node));
                }
                Ok(Node::CallExpression {
                    callee: self.boxed(self.field(node, "function")?)?,
                    arguments: self.lower_all(named_children(arguments))?,
                })
            }
            "new_expression" => Ok(Node::NewExpression {
                callee: self.boxed(self.field(node, "constructor")?)?,
                arguments: match node.child_by_field_name("arguments") {
                    Some(arguments) => self.lower_all(named_children(arguments))?,
                    None => Vec::new(),
                },
            }),
            "member_expression" => {
                let property = self.field(node, "property")?;
                if node.child_by_field_name("optional_chain").is_some()
                    || property.kind() == "private_property_identifier"
                {
                    return Ok(self.unsupported(node));
                }
                Ok(Node::MemberExpression {
                    object: self.boxed(self.field(node, "object")?)?,
                    property: Box::new(Node::identifier(self.text(property))),
                    computed: false,
                })
            }
            "subscript_expression" => {
                if node.child_by_field_name("optional_chain").is_some() {
                    return Ok(self.unsupported(node));
                }
                Ok(Node::MemberExpression {
                    object: self.boxed(self.field(node, "object")?)?,
                    property: self.boxed(self.field(node, "index")?)?,
                    computed: true,
                })
            }

            // JSX
            "jsx_element" => {
                let open = self.field(node, "open_tag")?;
                if open.child_by_field_name("name").is_none() {
                    return Ok(self.unsupported(node));
                }
                let close = node.child_by_field_name("close_tag").map(|n| n.id());
                let children = named_children(node)
                    .into_iter()
                    .filter(|child| child.id() != open.id() && Some(child.id()) != close)
                    .collect();
                Ok(Node::JsxElement {
                    opening_element: Box::new(self.jsx_opening(open, false)?),
                    children: self.lower_all(children)?,
                })
            }
            "jsx_self_closing_element" => Ok(Node::JsxElement {
                opening_element: Box::new(self.jsx_opening(node, true)?),
                children: Vec::new(),
            }),
            "jsx_attribute" => {
                let mut parts = named_children(node).into_iter();
                let name = parts.next().ok_or_else(|| ParseError::MissingField {
                    kind: node.kind().to_string(),
                    field: "name",
                    line: node.start_position().row + 1,
                    column: node.start_position().column + 1,
                })?;
                if name.kind() != "property_identifier" && name.kind() != "identifier" {
                    return Ok(self.unsupported(node));
                }
                let value = match parts.next() {
                    // Attribute strings are not escape-processed.
                    Some(value) if value.kind() == "string" => Some(Box::new(Node::StringLiteral {
                        value: strip_quotes(self.text(value)).to_string(),
                    })),
                    Some(value) => Some(self.boxed(value)?),
                    None => None,
                };
                Ok(Node::JsxAttribute {
                    name: Box::new(Node::JsxIdentifier {
                        name: self.text(name).to_string(),
                    }),
                    value,
                })
            }
            "jsx_expression" => Ok(Node::JsxExpressionContainer {
                expression: match named_children(node).into_iter().next() {
                    Some(expression) => Some(self.boxed(expression)?),
                    None => None,
                },
            }),
            "jsx_text" => Ok(Node::JsxText {
                value: self.text(node).to_string(),
            }),

            _ => Ok(self.unsupported(node)),
        }
    }

    fn declaration(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let kind = match node.child_by_field_name("kind").map(|k| self.text(k)) {
            Some("let") => DeclarationKind::Let,
            Some("const") => DeclarationKind::Const,
            _ => DeclarationKind::Var,
        };

        let mut declarations = Vec::new();
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            declarations.push(Node::VariableDeclarator {
                id: self.boxed(self.field(declarator, "name")?)?,
                init: match declarator.child_by_field_name("value") {
                    Some(value) => Some(self.boxed(value)?),
                    None => None,
                },
            });
        }

        Ok(Node::VariableDeclaration { kind, declarations })
    }

    fn param(&self, node: SyntaxNode<'_>) -> Node {
        match node.kind() {
            "identifier" => Node::identifier(self.text(node)),
            _ => self.unsupported(node),
        }
    }

    fn params(&self, node: SyntaxNode<'_>) -> Result<Vec<Node>, ParseError> {
        Ok(named_children(node)
            .into_iter()
            .map(|param| self.param(param))
            .collect())
    }

    fn if_statement(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let alternate = match node.child_by_field_name("alternative") {
            Some(clause) => Some(self.boxed(self.first_named(clause, "statement")?)?),
            None => None,
        };
        Ok(Node::IfStatement {
            test: self.boxed(self.field(node, "condition")?)?,
            consequent: self.boxed(self.field(node, "consequence")?)?,
            alternate,
        })
    }

    fn switch_statement(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let body = self.field(node, "body")?;
        let mut cases = Vec::new();

        for case in named_children(body) {
            let test = match case.kind() {
                "switch_case" => Some(self.boxed(self.field(case, "value")?)?),
                "switch_default" => None,
                _ => continue,
            };
            let mut cursor = case.walk();
            let statements: Vec<_> = case.children_by_field_name("body", &mut cursor).collect();
            cases.push(Node::SwitchCase {
                test,
                consequent: self.lower_all(statements)?,
            });
        }

        Ok(Node::SwitchStatement {
            discriminant: self.boxed(self.field(node, "value")?)?,
            cases,
        })
    }

    fn try_statement(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let handler = match node.child_by_field_name("handler") {
            Some(clause) => Some(Box::new(Node::CatchClause {
                param: clause
                    .child_by_field_name("parameter")
                    .map(|param| Box::new(self.param(param))),
                body: self.boxed(self.field(clause, "body")?)?,
            })),
            None => None,
        };
        let finalizer = match node.child_by_field_name("finalizer") {
            Some(clause) => Some(self.boxed(self.field(clause, "body")?)?),
            None => None,
        };
        Ok(Node::TryStatement {
            block: self.boxed(self.field(node, "body")?)?,
            handler,
            finalizer,
        })
    }

    fn import_statement(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let source = unescape(strip_quotes(self.text(self.field(node, "source")?)));
        let mut specifiers = Vec::new();

        let clause = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "import_clause");
        for part in clause.map(named_children).unwrap_or_default() {
            match part.kind() {
                "identifier" => specifiers.push(Node::ImportDefaultSpecifier {
                    local: self.text(part).to_string(),
                }),
                "namespace_import" => specifiers.push(Node::ImportNamespaceSpecifier {
                    local: self.text(self.first_named(part, "identifier")?).to_string(),
                }),
                "named_imports" => {
                    for specifier in named_children(part) {
                        let imported = self.export_name(self.field(specifier, "name")?);
                        let local = specifier
                            .child_by_field_name("alias")
                            .map(|alias| self.text(alias).to_string())
                            .unwrap_or_else(|| imported.clone());
                        specifiers.push(Node::ImportSpecifier { imported, local });
                    }
                }
                _ => return Ok(self.unsupported(node)),
            }
        }

        Ok(Node::ImportDeclaration { specifiers, source })
    }

    fn export_statement(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        if node.child_by_field_name("source").is_some() {
            return Ok(self.unsupported(node));
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let declaration = self.boxed(declaration)?;
            return Ok(if has_token(node, "default") {
                Node::ExportDefaultDeclaration { declaration }
            } else {
                Node::ExportNamedDeclaration {
                    declaration: Some(declaration),
                    specifiers: Vec::new(),
                }
            });
        }

        if let Some(value) = node.child_by_field_name("value") {
            return Ok(Node::ExportDefaultDeclaration {
                declaration: self.boxed(value)?,
            });
        }

        let Some(clause) = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "export_clause")
        else {
            return Ok(self.unsupported(node));
        };

        let mut specifiers = Vec::new();
        for specifier in named_children(clause) {
            let local = self.export_name(self.field(specifier, "name")?);
            let exported = specifier
                .child_by_field_name("alias")
                .map(|alias| self.export_name(alias))
                .unwrap_or_else(|| local.clone());
            specifiers.push(Node::ExportSpecifier { local, exported });
        }

        Ok(Node::ExportNamedDeclaration {
            declaration: None,
            specifiers,
        })
    }

    /// Module export names may be written as string literals.
    fn export_name(&self, node: SyntaxNode<'_>) -> String {
        match node.kind() {
            "string" => unescape(strip_quotes(self.text(node))),
            _ => self.text(node).to_string(),
        }
    }

    fn template(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let end = node.end_byte().saturating_sub(1);
        let mut offset = node.start_byte() + 1;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        for child in named_children(node) {
            if child.kind() != "template_substitution" {
                continue;
            }
            let raw = self.source.get(offset..child.start_byte()).unwrap_or_default();
            quasis.push(unescape(raw));
            expressions.push(self.lower(self.first_named(child, "expression")?)?);
            offset = child.end_byte();
        }
        quasis.push(unescape(self.source.get(offset..end).unwrap_or_default()));

        Ok(Node::TemplateLiteral {
            quasis,
            expressions,
        })
    }

    fn object(&self, node: SyntaxNode<'_>) -> Result<Node, ParseError> {
        let mut properties = Vec::new();

        for member in named_children(node) {
            let property = match member.kind() {
                "pair" => {
                    let (key, computed) = self.property_key(self.field(member, "key")?)?;
                    Node::ObjectProperty {
                        key: Box::new(key),
                        value: self.boxed(self.field(member, "value")?)?,
                        computed,
                        shorthand: false,
                    }
                }
                "shorthand_property_identifier" => {
                    let name = self.text(member);
                    Node::ObjectProperty {
                        key: Box::new(Node::identifier(name)),
                        value: Box::new(Node::identifier(name)),
                        computed: false,
                        shorthand: true,
                    }
                }
                "method_definition" => {
                    if has_token(member, "async") || has_token(member, "*") {
                        self.unsupported(member)
                    } else {
                        let kind = if has_token(member, "get") {
                            MethodKind::Get
                        } else if has_token(member, "set") {
                            MethodKind::Set
                        } else {
                            MethodKind::Method
                        };
                        let (key, computed) = self.property_key(self.field(member, "name")?)?;
                        Node::ObjectMethod {
                            kind,
                            key: Box::new(key),
                            params: self.params(self.field(member, "parameters")?)?,
                            body: self.boxed(self.field(member, "body")?)?,
                            computed,
                        }
                    }
                }
                "spread_element" => self.lower(member)?,
                _ => self.unsupported(member),
            };
            properties.push(property);
        }

        Ok(Node::ObjectExpression { properties })
    }

    fn property_key(&self, node: SyntaxNode<'_>) -> Result<(Node, bool), ParseError> {
        Ok(match node.kind() {
            "property_identifier" | "identifier" => (Node::identifier(self.text(node)), false),
            "string" | "number" => (self.lower(node)?, false),
            "computed_property_name" => (self.lower(self.first_named(node, "expression")?)?, true),
            _ => (self.unsupported(node), false),
        })
    }

    fn jsx_opening(&self, node: SyntaxNode<'_>, self_closing: bool) -> Result<Node, ParseError> {
        let name = self.field(node, "name")?;
        let name = match name.kind() {
            "identifier" | "jsx_identifier" => Node::JsxIdentifier {
                name: self.text(name).to_string(),
            },
            _ => self.unsupported(name),
        };

        let mut cursor = node.walk();
        let attributes: Vec<_> = node.children_by_field_name("attribute", &mut cursor).collect();
        let attributes = attributes
            .into_iter()
            .map(|attribute| match attribute.kind() {
                "jsx_attribute" => self.lower(attribute),
                _ => Ok(self.unsupported(attribute)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node::JsxOpeningElement {
            name: Box::new(name),
            attributes,
            self_closing,
        })
    }
}

/// Comment text without delimiters, one entry per non-blank line.
fn comment_lines(text: &str) -> Vec<String> {
    if let Some(line) = text.strip_prefix("//") {
        return vec![line.trim().to_string()];
    }
    let body = text.strip_prefix("/*").unwrap_or(text);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').unwrap_or(line).trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn strip_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some('"'), Some('"')) | (Some('\''), Some('\'')) => chars.as_str(),
        _ => text,
    }
}

/// Resolve JavaScript escape sequences.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &digits, "\\x");
            }
            Some('u') => {
                let digits: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&d| d != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                let Ok(unit) = u32::from_str_radix(&digits, 16) else {
                    out.push_str("\\u");
                    out.push_str(&digits);
                    continue;
                };
                if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate; combine with a following `\uXXXX` low half.
                    let rest = chars.clone().collect::<String>();
                    if let Some(low) = rest
                        .strip_prefix("\\u")
                        .and_then(|r| r.get(..4))
                        .and_then(|d| u32::from_str_radix(d, 16).ok())
                        .filter(|low| (0xDC00..0xE000).contains(low))
                    {
                        let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        if let Some(ch) = char::from_u32(combined) {
                            out.push(ch);
                            chars.nth(5);
                            continue;
                        }
                    }
                }
                out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

fn push_code_point(out: &mut String, digits: &str, prefix: &str) {
    match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => {
            out.push_str(prefix);
            out.push_str(digits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(source: &str) -> Node {
        match parse(source).expect("parse failed") {
            Node::Program { mut body } => body.remove(0),
            other => panic!("expected program, got {other:?}"),
        }
    }

    fn expression(source: &str) -> Node {
        match statement(source) {
            Node::ExpressionStatement { expression, .. } => *expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r"\x41B\u{43}"), "ABC");
        assert_eq!(unescape(r"\uD83D\uDE00!"), "\u{1F600}!");
        assert_eq!(unescape(r#"\'\"\\"#), "'\"\\");
        assert_eq!(unescape("a\\\nb"), "ab");
    }

    #[test]
    fn test_comment_lines() {
        assert_eq!(comment_lines("// hello "), vec!["hello"]);
        assert_eq!(
            comment_lines("/**\n * one\n * two\n */"),
            vec!["one", "two"]
        );
    }

    #[test]
    fn test_member_and_subscript() {
        assert_eq!(
            expression("a.b"),
            Node::member(Node::identifier("a"), "b")
        );
        assert_eq!(
            expression("a[0]"),
            Node::MemberExpression {
                object: Box::new(Node::identifier("a")),
                property: Box::new(Node::NumericLiteral { raw: "0".into() }),
                computed: true,
            }
        );
    }

    #[test]
    fn test_logical_and_binary_are_distinguished() {
        assert!(matches!(expression("a && b"), Node::LogicalExpression { .. }));
        assert!(matches!(expression("a + b"), Node::BinaryExpression { .. }));
    }

    #[test]
    fn test_template_quasis() {
        assert_eq!(
            expression("`a${b}c${d}`"),
            Node::TemplateLiteral {
                quasis: vec!["a".into(), "c".into(), "".into()],
                expressions: vec![Node::identifier("b"), Node::identifier("d")],
            }
        );
    }

    #[test]
    fn test_leading_comments_attach_to_expression_statements() {
        let program = parse("// hello\nfoo();\nbar(); // trailing\n// lost\nlet x;").unwrap();
        let Node::Program { body } = program else {
            panic!("expected program");
        };
        assert!(matches!(
            &body[0],
            Node::ExpressionStatement { comments, .. } if comments == &vec!["hello".to_string()]
        ));
        assert!(matches!(
            &body[1],
            Node::ExpressionStatement { comments, .. } if comments.is_empty()
        ));
        assert!(matches!(&body[2], Node::VariableDeclaration { .. }));
    }

    #[test]
    fn test_unsupported_constructs_are_preserved() {
        assert!(matches!(
            statement("class A {}"),
            Node::Unsupported { kind, .. } if kind == "class_declaration"
        ));
        assert!(matches!(
            expression("a?.b"),
            Node::Unsupported { .. }
        ));
        assert!(matches!(
            statement("async function f() {}"),
            Node::Unsupported { .. }
        ));
    }

    #[test]
    fn test_jsx() {
        let Node::JsxElement {
            opening_element,
            children,
        } = expression("<div id=\"x\" hidden>hi</div>")
        else {
            panic!("expected element");
        };
        assert_eq!(children, vec![Node::JsxText { value: "hi".into() }]);
        let Node::JsxOpeningElement { name, attributes, .. } = *opening_element else {
            panic!("expected opening element");
        };
        assert_eq!(*name, Node::JsxIdentifier { name: "div".into() });
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_syntax_error_position() {
        match parse("let x = ;\n") {
            Err(ParseError::Syntax { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
