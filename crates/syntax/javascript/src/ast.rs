//! JavaScript syntax tree consumed by the translator.
//!
//! Variant names follow the ESTree/Babel kind names. Only the fields the
//! translator reads are kept; position metadata is dropped after lowering.
//! Constructs the translator has no rule for lower to [`Node::Unsupported`]
//! so that the failure surfaces as a translation error with the offending
//! source text.

use serde::Serialize;

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

/// Kind of an object literal method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Node {
    Program {
        body: Vec<Node>,
    },
    /// Expression in statement position. `comments` holds the comment lines
    /// written directly above a top-level statement.
    ExpressionStatement {
        expression: Box<Node>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        comments: Vec<String>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    BreakStatement,
    ThrowStatement {
        argument: Box<Node>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    /// A `case` clause, or `default` when `test` is `None`.
    SwitchCase {
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    FunctionDeclaration {
        id: Box<Node>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    ImportDeclaration {
        specifiers: Vec<Node>,
        source: String,
    },
    ImportSpecifier {
        imported: String,
        local: String,
    },
    ImportDefaultSpecifier {
        local: String,
    },
    ImportNamespaceSpecifier {
        local: String,
    },
    ExportDefaultDeclaration {
        declaration: Box<Node>,
    },
    ExportNamedDeclaration {
        declaration: Option<Box<Node>>,
        specifiers: Vec<Node>,
    },
    ExportSpecifier {
        local: String,
        exported: String,
    },

    Identifier {
        name: String,
    },
    ThisExpression,
    NullLiteral,
    BooleanLiteral {
        value: bool,
    },
    /// Numeric literal kept as written (`0x1f`, `.5`, `1e3`).
    NumericLiteral {
        raw: String,
    },
    /// String literal with escape sequences resolved.
    StringLiteral {
        value: String,
    },
    RegExpLiteral {
        pattern: String,
        flags: String,
    },
    /// Template literal. `quasis` always has one more entry than
    /// `expressions`.
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: Vec<Node>,
    },
    ArrayExpression {
        elements: Vec<Node>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    ObjectProperty {
        key: Box<Node>,
        value: Box<Node>,
        computed: bool,
        shorthand: bool,
    },
    ObjectMethod {
        kind: MethodKind,
        key: Box<Node>,
        params: Vec<Node>,
        body: Box<Node>,
        computed: bool,
    },
    SpreadElement {
        argument: Box<Node>,
    },
    FunctionExpression {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    /// Arrow function; `body` is either a block or a single expression.
    ArrowFunctionExpression {
        params: Vec<Node>,
        body: Box<Node>,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `&&`, `||` and `??`.
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    /// `object.property` or, when `computed`, `object[property]`.
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },

    #[serde(rename = "JSXElement")]
    JsxElement {
        opening_element: Box<Node>,
        children: Vec<Node>,
    },
    #[serde(rename = "JSXOpeningElement")]
    JsxOpeningElement {
        name: Box<Node>,
        attributes: Vec<Node>,
        self_closing: bool,
    },
    #[serde(rename = "JSXAttribute")]
    JsxAttribute {
        name: Box<Node>,
        value: Option<Box<Node>>,
    },
    #[serde(rename = "JSXIdentifier")]
    JsxIdentifier {
        name: String,
    },
    #[serde(rename = "JSXExpressionContainer")]
    JsxExpressionContainer {
        expression: Option<Box<Node>>,
    },
    #[serde(rename = "JSXText")]
    JsxText {
        value: String,
    },

    /// A construct recognised by the parser but not handled by the
    /// translator. `kind` is the parser's node kind.
    Unsupported {
        kind: String,
        text: String,
    },
}

impl Node {
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier { name: name.into() }
    }

    /// Non-computed member access `object.name`.
    pub fn member(object: Node, name: impl Into<String>) -> Self {
        Node::MemberExpression {
            object: Box::new(object),
            property: Box::new(Node::identifier(name)),
            computed: false,
        }
    }

    /// The ESTree kind name of this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::Program { .. } => "Program",
            Node::ExpressionStatement { .. } => "ExpressionStatement",
            Node::BlockStatement { .. } => "BlockStatement",
            Node::EmptyStatement => "EmptyStatement",
            Node::DebuggerStatement => "DebuggerStatement",
            Node::ReturnStatement { .. } => "ReturnStatement",
            Node::BreakStatement => "BreakStatement",
            Node::ThrowStatement { .. } => "ThrowStatement",
            Node::IfStatement { .. } => "IfStatement",
            Node::SwitchStatement { .. } => "SwitchStatement",
            Node::SwitchCase { .. } => "SwitchCase",
            Node::TryStatement { .. } => "TryStatement",
            Node::CatchClause { .. } => "CatchClause",
            Node::VariableDeclaration { .. } => "VariableDeclaration",
            Node::VariableDeclarator { .. } => "VariableDeclarator",
            Node::FunctionDeclaration { .. } => "FunctionDeclaration",
            Node::ImportDeclaration { .. } => "ImportDeclaration",
            Node::ImportSpecifier { .. } => "ImportSpecifier",
            Node::ImportDefaultSpecifier { .. } => "ImportDefaultSpecifier",
            Node::ImportNamespaceSpecifier { .. } => "ImportNamespaceSpecifier",
            Node::ExportDefaultDeclaration { .. } => "ExportDefaultDeclaration",
            Node::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            Node::ExportSpecifier { .. } => "ExportSpecifier",
            Node::Identifier { .. } => "Identifier",
            Node::ThisExpression => "ThisExpression",
            Node::NullLiteral => "NullLiteral",
            Node::BooleanLiteral { .. } => "BooleanLiteral",
            Node::NumericLiteral { .. } => "NumericLiteral",
            Node::StringLiteral { .. } => "StringLiteral",
            Node::RegExpLiteral { .. } => "RegExpLiteral",
            Node::TemplateLiteral { .. } => "TemplateLiteral",
            Node::ArrayExpression { .. } => "ArrayExpression",
            Node::ObjectExpression { .. } => "ObjectExpression",
            Node::ObjectProperty { .. } => "ObjectProperty",
            Node::ObjectMethod { .. } => "ObjectMethod",
            Node::SpreadElement { .. } => "SpreadElement",
            Node::FunctionExpression { .. } => "FunctionExpression",
            Node::ArrowFunctionExpression { .. } => "ArrowFunctionExpression",
            Node::UnaryExpression { .. } => "UnaryExpression",
            Node::BinaryExpression { .. } => "BinaryExpression",
            Node::LogicalExpression { .. } => "LogicalExpression",
            Node::AssignmentExpression { .. } => "AssignmentExpression",
            Node::ConditionalExpression { .. } => "ConditionalExpression",
            Node::CallExpression { .. } => "CallExpression",
            Node::NewExpression { .. } => "NewExpression",
            Node::MemberExpression { .. } => "MemberExpression",
            Node::JsxElement { .. } => "JSXElement",
            Node::JsxOpeningElement { .. } => "JSXOpeningElement",
            Node::JsxAttribute { .. } => "JSXAttribute",
            Node::JsxIdentifier { .. } => "JSXIdentifier",
            Node::JsxExpressionContainer { .. } => "JSXExpressionContainer",
            Node::JsxText { .. } => "JSXText",
            Node::Unsupported { kind, .. } => kind,
        }
    }

    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        const MAX: usize = 60;
        match self {
            Node::Unsupported { text, .. } => {
                let line = text.lines().next().unwrap_or_default();
                if line.chars().count() > MAX || text.contains('\n') {
                    let head: String = line.chars().take(MAX).collect();
                    format!("`{head}…`")
                } else {
                    format!("`{line}`")
                }
            }
            Node::Identifier { name } | Node::JsxIdentifier { name } => {
                format!("{} `{name}`", self.kind())
            }
            Node::NumericLiteral { raw } => format!("NumericLiteral `{raw}`"),
            Node::StringLiteral { value } => format!("StringLiteral {value:?}"),
            Node::MemberExpression { property, .. } => match property.as_ref() {
                Node::Identifier { name } => format!("MemberExpression `.{name}`"),
                _ => "MemberExpression".to_string(),
            },
            other => other.kind().to_string(),
        }
    }

    /// The identifier name, if this is an identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Node::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, Node::VariableDeclaration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_describe() {
        let node = Node::Unsupported {
            kind: "class_declaration".into(),
            text: "class A {\n}".into(),
        };
        assert_eq!(node.kind(), "class_declaration");
        assert_eq!(node.describe(), "`class A {…`");

        assert_eq!(Node::identifier("x").describe(), "Identifier `x`");
        assert_eq!(
            Node::member(Node::ThisExpression, "y").describe(),
            "MemberExpression `.y`"
        );
    }

    #[test]
    fn test_serializes_with_estree_names() {
        let node = Node::JsxText { value: "hi".into() };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({ "type": "JSXText", "value": "hi" })
        );

        let node = Node::ExpressionStatement {
            expression: Box::new(Node::ThisExpression),
            comments: vec![],
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({
                "type": "ExpressionStatement",
                "expression": { "type": "ThisExpression" }
            })
        );
    }
}
