//! Pure helpers the translator uses to pick a target shape.

use crate::ast::Node;

/// Map a source operator to its ClojureScript symbol.
///
/// Equality and logical operators are renamed; everything else passes
/// through unchanged.
pub fn normalize_operator(operator: &str) -> &str {
    match operator {
        "==" | "===" => "=",
        "!=" | "!==" => "not=",
        "||" => "or",
        "&&" => "and",
        "!" => "not",
        other => other,
    }
}

/// Capitalized JSX tag names refer to user components.
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Flatten `a.b.c.d` into `(a, [b, c, d])`.
///
/// Only non-computed links are followed, so `a[i].b` yields `(a[i], [b])`.
/// Returns the innermost target and the property nodes in source order.
pub fn dot_chain(node: &Node) -> (&Node, Vec<&Node>) {
    let mut properties = Vec::new();
    let mut current = node;
    while let Node::MemberExpression {
        object,
        property,
        computed: false,
    } = current
    {
        properties.push(property.as_ref());
        current = object.as_ref();
    }
    properties.reverse();
    (current, properties)
}

/// One link of a call chain: the callee and its arguments.
pub type ChainLink<'a> = (&'a Node, &'a [Node]);

/// Collect the calls of `a().b().c()` innermost first.
///
/// The chain continues through a callee that is a non-computed member access
/// whose object is itself a call. Anything else ends it, and that call's
/// callee becomes the first link.
pub fn call_chain(node: &Node) -> Vec<ChainLink<'_>> {
    let mut links = Vec::new();
    let mut current = node;
    while let Node::CallExpression { callee, arguments } = current {
        links.push((callee.as_ref(), arguments.as_slice()));
        match callee.as_ref() {
            Node::MemberExpression {
                object,
                computed: false,
                ..
            } if matches!(object.as_ref(), Node::CallExpression { .. }) => current = object.as_ref(),
            _ => break,
        }
    }
    links.reverse();
    links
}

/// Chains of more than two calls read better threaded with `->`.
pub fn is_pipeline(chain: &[ChainLink<'_>]) -> bool {
    chain.len() > 2
}

/// Whether a member access chain bottoms out at `this`.
pub fn is_receiver_rooted(node: &Node) -> bool {
    let mut current = node;
    while let Node::MemberExpression { object, .. } = current {
        current = object.as_ref();
    }
    matches!(current, Node::ThisExpression) && !std::ptr::eq(current, node)
}

/// Copy of a member access chain with its root `this` replaced by the
/// identifier `name`. Computed keys and any other subtree are untouched.
pub fn rebind_receiver(node: &Node, name: &str) -> Node {
    match node {
        Node::ThisExpression => Node::identifier(name),
        Node::MemberExpression {
            object,
            property,
            computed,
        } => Node::MemberExpression {
            object: Box::new(rebind_receiver(object, name)),
            property: property.clone(),
            computed: *computed,
        },
        other => other.clone(),
    }
}

/// Expressions that can be evaluated twice with the same result: names,
/// `this`, literals and dotted reads of those.
pub fn is_repeatable(node: &Node) -> bool {
    match node {
        Node::Identifier { .. }
        | Node::ThisExpression
        | Node::NullLiteral
        | Node::BooleanLiteral { .. }
        | Node::NumericLiteral { .. }
        | Node::StringLiteral { .. } => true,
        Node::MemberExpression {
            object,
            computed: false,
            ..
        } => is_repeatable(object),
        _ => false,
    }
}

/// Split a statement list into its leading run of variable declarations and
/// the rest.
pub fn split_leading_declarations(body: &[Node]) -> (&[Node], &[Node]) {
    let count = body.iter().take_while(|node| node.is_declaration()).count();
    body.split_at(count)
}

/// One branch of a flattened if/else chain. `test` is `None` for the final
/// `else`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch<'a> {
    pub test: Option<&'a Node>,
    pub body: &'a Node,
}

/// Flatten `if (a) .. else if (b) .. else ..` into its branches in order.
pub fn cond_chain(node: &Node) -> Vec<Branch<'_>> {
    let mut branches = Vec::new();
    let mut current = node;
    loop {
        match current {
            Node::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                branches.push(Branch {
                    test: Some(test.as_ref()),
                    body: consequent.as_ref(),
                });
                match alternate {
                    Some(next) => current = next.as_ref(),
                    None => break,
                }
            }
            other => {
                branches.push(Branch {
                    test: None,
                    body: other,
                });
                break;
            }
        }
    }
    branches
}

/// Whether a statement list ends in `break`, `return` or `throw`, looking
/// into a trailing block.
pub fn ends_with_exit(body: &[Node]) -> bool {
    match body.last() {
        Some(Node::BreakStatement | Node::ReturnStatement { .. } | Node::ThrowStatement { .. }) => {
            true
        }
        Some(Node::BlockStatement { body }) => ends_with_exit(body),
        _ => false,
    }
}

/// Statements of a switch clause with a trailing block spliced in and the
/// final `break` removed.
pub fn case_statements(consequent: &[Node]) -> Vec<Node> {
    let mut statements = consequent.to_vec();
    while let Some(Node::BlockStatement { .. }) = statements.last() {
        if let Some(Node::BlockStatement { body }) = statements.pop() {
            statements.extend(body);
        }
    }
    if let Some(Node::BreakStatement) = statements.last() {
        statements.pop();
    }
    statements
}

/// Whether a `break` that targets the enclosing switch appears anywhere in
/// `body`. Nested switches and functions own their breaks.
pub fn contains_break(body: &[Node]) -> bool {
    body.iter().any(breaks_out)
}

fn breaks_out(node: &Node) -> bool {
    match node {
        Node::BreakStatement => true,
        Node::BlockStatement { body } => contains_break(body),
        Node::IfStatement {
            consequent,
            alternate,
            ..
        } => breaks_out(consequent) || alternate.as_deref().is_some_and(breaks_out),
        Node::TryStatement {
            block,
            handler,
            finalizer,
        } => {
            breaks_out(block)
                || handler.as_deref().is_some_and(breaks_out)
                || finalizer.as_deref().is_some_and(breaks_out)
        }
        Node::CatchClause { body, .. } => breaks_out(body),
        _ => false,
    }
}
