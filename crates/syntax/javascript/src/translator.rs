//! Syntax-directed translation from [`Node`] to [`Form`].
//!
//! Every rule produces zero or more forms. The caller decides how to use
//! them: splice them into an enclosing form, or collapse them with
//! [`Form::sequence`]. Each rule builds the [`Context`] for every child it
//! visits; nothing is inherited.

use std::mem;

use rhizome_sprig_ir::{vocab, Form};
use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{MethodKind, Node};
use crate::context::{Context, Naming};
use crate::globals::GlobalScope;
use crate::heuristics::{
    call_chain, case_statements, cond_chain, contains_break, dot_chain, ends_with_exit,
    is_component_name, is_pipeline, is_receiver_rooted, is_repeatable, normalize_operator,
    rebind_receiver, split_leading_declarations, Branch,
};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("unsupported syntax ({kind}): {node}")]
    Unsupported { kind: String, node: String },

    #[error("cannot delete {node}: only property accesses can be deleted")]
    InvalidDelete { node: String },

    #[error("{rule}: {message}")]
    Precondition {
        rule: &'static str,
        message: String,
    },
}

fn unsupported(node: &Node) -> TranslateError {
    TranslateError::Unsupported {
        kind: node.kind().to_string(),
        node: node.describe(),
    }
}

/// Translates a JavaScript syntax tree into a ClojureScript form tree.
pub struct Translator<'g> {
    globals: &'g dyn GlobalScope,
}

impl<'g> Translator<'g> {
    pub fn new(globals: &'g dyn GlobalScope) -> Self {
        Self { globals }
    }

    /// Translate a whole program. The result is always a [`Form::Program`].
    pub fn translate(&self, node: &Node) -> Result<Form, TranslateError> {
        match node {
            Node::Program { body } => self.program(body),
            other => Ok(Form::program(self.next(other, Context::default())?)),
        }
    }

    /// Translate one node in the given context.
    pub fn next(&self, node: &Node, ctx: Context) -> Result<Vec<Form>, TranslateError> {
        let form = match node {
            Node::Program { body } => self.program(body)?,

            // Statements
            Node::ExpressionStatement { expression, .. } => {
                return self.next(expression, Context::default());
            }
            Node::BlockStatement { body } => {
                let forms = self.statements(body)?;
                return Ok(if ctx.implicit_do {
                    forms
                } else {
                    vec![Form::sequence(forms)]
                });
            }
            Node::EmptyStatement => Form::empty(),
            Node::DebuggerStatement => Form::call(vocab::JS_DEBUGGER, vec![]),
            Node::ReturnStatement { argument } => match argument {
                Some(argument) => return self.next(argument, Context::default()),
                None => Form::nil(),
            },
            Node::BreakStatement => Form::break_marker(),
            Node::ThrowStatement { argument } => {
                Form::call(vocab::THROW, vec![self.one(argument, Context::default())?])
            }
            Node::IfStatement { .. } => self.if_statement(node)?,
            Node::SwitchStatement {
                discriminant,
                cases,
            } => self.switch(discriminant, cases)?,
            Node::TryStatement {
                block,
                handler,
                finalizer,
            } => self.try_statement(block, handler.as_deref(), finalizer.as_deref())?,
            Node::VariableDeclaration { declarations, .. } => {
                return declarations
                    .iter()
                    .map(|declarator| self.declarator(declarator))
                    .collect();
            }
            Node::VariableDeclarator { .. } => self.declarator(node)?,
            Node::FunctionDeclaration { id, params, body } => {
                self.function(vocab::DEFN, Some(self.binding_name(id)?), params, body)?
            }
            Node::ImportDeclaration { specifiers, source } => {
                return self.import(specifiers, source);
            }
            Node::ExportDefaultDeclaration { declaration } => self.export_default(declaration)?,
            Node::ExportNamedDeclaration {
                declaration,
                specifiers,
            } => return self.export_named(declaration.as_deref(), specifiers),

            // Expressions
            Node::Identifier { name } => self.identifier(name, ctx),
            Node::ThisExpression => Form::call(
                vocab::THIS_AS,
                vec![Form::symbol(vocab::RECEIVER), Form::symbol(vocab::RECEIVER)],
            ),
            Node::NullLiteral => Form::nil(),
            Node::BooleanLiteral { value } => Form::boolean(*value),
            Node::NumericLiteral { raw } => Form::number(raw.as_str()),
            Node::StringLiteral { value } => Form::string(value.as_str()),
            Node::RegExpLiteral { pattern, flags } => Form::regex(pattern.as_str(), flags.as_str()),
            Node::TemplateLiteral {
                quasis,
                expressions,
            } => self.template(quasis, expressions)?,
            Node::ArrayExpression { elements } => self.array(elements)?,
            Node::ObjectExpression { properties } => self.object(properties)?,
            Node::FunctionExpression { id, params, body } => {
                let name = match id.as_deref() {
                    Some(id) => Some(self.binding_name(id)?),
                    None => None,
                };
                self.function(vocab::FN, name, params, body)?
            }
            Node::ArrowFunctionExpression { params, body } => {
                self.function(vocab::FN, None, params, body)?
            }
            Node::UnaryExpression { operator, argument } => self.unary(operator, argument)?,
            Node::BinaryExpression {
                operator,
                left,
                right,
            }
            | Node::LogicalExpression {
                operator,
                left,
                right,
            } => Form::call(
                normalize_operator(operator),
                vec![
                    self.one(left, Context::default())?,
                    self.one(right, Context::default())?,
                ],
            ),
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => self.assignment(operator, left, right)?,
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => Form::call(
                vocab::IF,
                vec![
                    self.one(test, Context::default())?,
                    self.one(consequent, Context::default())?,
                    self.one(alternate, Context::default())?,
                ],
            ),
            Node::CallExpression { .. } => self.call_expression(node)?,
            Node::NewExpression { callee, arguments } => {
                let mut children = vec![self.one(callee, Context::callee())?];
                children.extend(self.arguments(arguments)?);
                Form::call(vocab::NEW, children)
            }
            Node::MemberExpression { .. } => self.member(node)?,

            // JSX
            Node::JsxElement {
                opening_element,
                children,
            } => self.jsx_element(opening_element, children)?,
            Node::JsxIdentifier { name } => {
                if ctx.component && is_component_name(name) {
                    Form::symbol(name.as_str())
                } else {
                    Form::keyword(name.as_str())
                }
            }
            Node::JsxExpressionContainer { expression } => match expression {
                Some(expression) => return self.next(expression, Context::default()),
                None => Form::empty(),
            },
            Node::JsxText { value } => {
                if value.trim().is_empty() {
                    Form::empty()
                } else {
                    Form::string(value.as_str())
                }
            }

            // Only meaningful inside their parent rule.
            Node::SwitchCase { .. }
            | Node::CatchClause { .. }
            | Node::ImportSpecifier { .. }
            | Node::ImportDefaultSpecifier { .. }
            | Node::ImportNamespaceSpecifier { .. }
            | Node::ExportSpecifier { .. }
            | Node::ObjectProperty { .. }
            | Node::ObjectMethod { .. }
            | Node::SpreadElement { .. }
            | Node::JsxOpeningElement { .. }
            | Node::JsxAttribute { .. } => {
                return Err(TranslateError::Precondition {
                    rule: "structure",
                    message: format!("{} cannot appear here", node.kind()),
                });
            }

            Node::Unsupported { .. } => return Err(unsupported(node)),
        };
        Ok(vec![form])
    }

    /// Translate a node that must yield a single form.
    fn one(&self, node: &Node, ctx: Context) -> Result<Form, TranslateError> {
        Ok(Form::sequence(self.next(node, ctx)?))
    }

    /// Statements of a branch or body, spliced, without markers.
    fn block(&self, node: &Node) -> Result<Vec<Form>, TranslateError> {
        let mut forms = self.next(node, Context::implicit_do())?;
        forms.retain(|form| !form.is_marker());
        Ok(forms)
    }

    fn program(&self, body: &[Node]) -> Result<Form, TranslateError> {
        let mut children = Vec::new();
        for statement in body {
            if let Node::ExpressionStatement { comments, .. } = statement {
                children.extend(comments.iter().map(|text| Form::comment(text.as_str())));
            }
            children.extend(self.next(statement, Context::default())?);
        }
        debug!(
            statements = body.len(),
            forms = children.len(),
            "translated program"
        );
        Ok(Form::program(children))
    }

    /// A statement list. A run of declarations opens a `let` that wraps
    /// everything after it.
    fn statements(&self, body: &[Node]) -> Result<Vec<Form>, TranslateError> {
        let (declarations, rest) = split_leading_declarations(body);
        if !declarations.is_empty() {
            return Ok(vec![self.let_block(declarations, rest)?]);
        }

        let mut forms = Vec::new();
        for (index, statement) in body.iter().enumerate() {
            if statement.is_declaration() {
                forms.extend(self.statements(&body[index..])?);
                break;
            }
            forms.extend(self.next(statement, Context::default())?);
        }
        forms.retain(|form| !form.is_marker());
        Ok(forms)
    }

    fn let_block(&self, declarations: &[Node], rest: &[Node]) -> Result<Form, TranslateError> {
        let mut bindings = Vec::new();
        for declaration in declarations {
            let Node::VariableDeclaration { declarations, .. } = declaration else {
                return Err(unsupported(declaration));
            };
            for declarator in declarations {
                let Node::VariableDeclarator { id, init } = declarator else {
                    return Err(unsupported(declarator));
                };
                bindings.push(self.binding_name(id)?);
                bindings.push(match init {
                    Some(init) => self.one(init, Context::default())?,
                    None => Form::nil(),
                });
            }
        }

        let mut children = vec![Form::vector(bindings)];
        children.extend(self.statements(rest)?);
        Ok(Form::call(vocab::LET, children))
    }

    fn binding_name(&self, node: &Node) -> Result<Form, TranslateError> {
        match node {
            Node::Identifier { name } => Ok(Form::symbol(name.as_str())),
            other => Err(unsupported(other)),
        }
    }

    fn identifier(&self, name: &str, ctx: Context) -> Form {
        match ctx.naming {
            Naming::Plain if ctx.check_global && self.globals.is_global(name) => {
                Form::symbol(vocab::host(name))
            }
            Naming::Plain => Form::symbol(name),
            Naming::Getter => Form::symbol(vocab::getter(name)),
            Naming::DotGetter => Form::symbol(vocab::dot_getter(name)),
            Naming::Method => Form::symbol(vocab::method(name)),
        }
    }

    /// Top-level binding: `(def name value)`, or `(defn name ...)` for an
    /// anonymous function initializer.
    fn declarator(&self, node: &Node) -> Result<Form, TranslateError> {
        let Node::VariableDeclarator { id, init } = node else {
            return Err(unsupported(node));
        };
        let name = self.binding_name(id)?;
        match init.as_deref() {
            Some(Node::ArrowFunctionExpression { params, body })
            | Some(Node::FunctionExpression {
                id: None,
                params,
                body,
            }) => self.function(vocab::DEFN, Some(name), params, body),
            Some(init) => Ok(Form::call(
                vocab::DEF,
                vec![name, self.one(init, Context::default())?],
            )),
            None => Ok(Form::call(vocab::DEF, vec![name, Form::nil()])),
        }
    }

    fn function(
        &self,
        head: &str,
        name: Option<Form>,
        params: &[Node],
        body: &Node,
    ) -> Result<Form, TranslateError> {
        let mut children = Vec::new();
        children.extend(name);
        children.push(Form::vector(
            params
                .iter()
                .map(|param| self.binding_name(param))
                .collect::<Result<_, _>>()?,
        ));
        children.extend(self.block(body)?);
        Ok(Form::call(head, children))
    }

    fn if_statement(&self, node: &Node) -> Result<Form, TranslateError> {
        let branches = cond_chain(node);
        match branches.as_slice() {
            [only] => {
                let mut children = vec![self.branch_test(only)?];
                children.extend(self.block(only.body)?);
                Ok(Form::call(vocab::WHEN, children))
            }
            [first, last] if last.test.is_none() => Ok(Form::call(
                vocab::IF,
                vec![
                    self.branch_test(first)?,
                    Form::sequence(self.block(first.body)?),
                    Form::sequence(self.block(last.body)?),
                ],
            )),
            _ => {
                let mut children = Vec::new();
                for branch in &branches {
                    children.push(self.branch_test(branch)?);
                    children.push(Form::sequence(self.block(branch.body)?));
                }
                if branches.last().is_some_and(|branch| branch.test.is_some()) {
                    children.push(Form::keyword(vocab::ELSE));
                    children.push(Form::nil());
                }
                Ok(Form::call(vocab::COND, children))
            }
        }
    }

    fn branch_test(&self, branch: &Branch<'_>) -> Result<Form, TranslateError> {
        match branch.test {
            Some(test) => self.one(test, Context::default()),
            None => Ok(Form::keyword(vocab::ELSE)),
        }
    }

    fn switch(&self, discriminant: &Node, cases: &[Node]) -> Result<Form, TranslateError> {
        let mut children = vec![self.one(discriminant, Context::default())?];
        let mut tests = Vec::new();
        let mut default = None;
        let last = cases.len().saturating_sub(1);

        for (index, case) in cases.iter().enumerate() {
            let Node::SwitchCase { test, consequent } = case else {
                return Err(unsupported(case));
            };

            if consequent.is_empty() {
                match test {
                    Some(test) => tests.push(self.one(test, Context::default())?),
                    None => {
                        return Err(TranslateError::Precondition {
                            rule: "switch",
                            message: "empty default clause".to_string(),
                        });
                    }
                }
                continue;
            }

            if index != last && !ends_with_exit(consequent) {
                return Err(TranslateError::Precondition {
                    rule: "switch",
                    message: format!(
                        "clause {} falls through to the next clause",
                        index + 1
                    ),
                });
            }

            let body = case_statements(consequent);
            if contains_break(&body) {
                return Err(TranslateError::Precondition {
                    rule: "switch",
                    message: format!("clause {} breaks before its end", index + 1),
                });
            }
            let forms = self.statements(&body)?;
            let body = if forms.is_empty() {
                Form::nil()
            } else {
                Form::sequence(forms)
            };

            match test {
                Some(test) => {
                    tests.push(self.one(test, Context::default())?);
                    children.push(case_test(mem::take(&mut tests)));
                    children.push(body);
                }
                None => {
                    tests.clear();
                    default = Some(body);
                }
            }
        }

        if !tests.is_empty() {
            children.push(case_test(tests));
            children.push(Form::nil());
        }
        // Unmatched values fall through to nil instead of throwing.
        children.push(default.unwrap_or_else(Form::nil));
        Ok(Form::call(vocab::CASE, children))
    }

    fn try_statement(
        &self,
        block: &Node,
        handler: Option<&Node>,
        finalizer: Option<&Node>,
    ) -> Result<Form, TranslateError> {
        let mut children = self.block(block)?;

        if let Some(handler) = handler {
            let Node::CatchClause { param, body } = handler else {
                return Err(unsupported(handler));
            };
            let name = match param.as_deref() {
                Some(param) => self.binding_name(param)?,
                None => Form::symbol(vocab::IGNORED),
            };
            let mut clause = vec![Form::symbol(vocab::HOST_OBJECT), name];
            clause.extend(self.block(body)?);
            children.push(Form::call(vocab::CATCH, clause));
        }

        if let Some(finalizer) = finalizer {
            children.push(Form::call(vocab::FINALLY, self.block(finalizer)?));
        }

        Ok(Form::call(vocab::TRY, children))
    }

    fn template(&self, quasis: &[String], expressions: &[Node]) -> Result<Form, TranslateError> {
        let mut children = Vec::new();
        for (index, quasi) in quasis.iter().enumerate() {
            children.push(Form::string(quasi.as_str()));
            if let Some(expression) = expressions.get(index) {
                children.push(self.one(expression, Context::default())?);
            }
        }
        Ok(Form::call(vocab::STR, children))
    }

    /// `#js [...]`; spreads fold into `.concat` calls.
    fn array(&self, elements: &[Node]) -> Result<Form, TranslateError> {
        let mut args = Vec::new();
        let mut concat = false;

        for element in elements {
            match element {
                Node::SpreadElement { argument } => {
                    let spread = self.one(argument, Context::default())?;
                    let base = if concat {
                        Form::call(vocab::CONCAT, mem::take(&mut args))
                    } else {
                        Form::host_array(mem::take(&mut args))
                    };
                    args = vec![base, spread];
                    concat = true;
                }
                other => args.push(self.one(other, Context::default())?),
            }
        }

        Ok(if concat {
            Form::call(vocab::CONCAT, args)
        } else {
            Form::host_array(args)
        })
    }

    /// `#js {...}`; spreads merge through `js/Object.assign`.
    fn object(&self, properties: &[Node]) -> Result<Form, TranslateError> {
        let mut sources = Vec::new();
        let mut entries = Vec::new();
        let mut spread = false;

        for property in properties {
            match property {
                Node::SpreadElement { argument } => {
                    if !entries.is_empty() {
                        sources.push(Form::host_object(mem::take(&mut entries)));
                    }
                    sources.push(self.one(argument, Context::default())?);
                    spread = true;
                }
                Node::ObjectProperty {
                    key,
                    value,
                    computed,
                    ..
                } => {
                    if *computed {
                        return Err(TranslateError::Unsupported {
                            kind: "ComputedPropertyKey".to_string(),
                            node: key.describe(),
                        });
                    }
                    entries.push(Form::map_entry(
                        self.property_key(key)?,
                        self.one(value, Context::default())?,
                    ));
                }
                Node::ObjectMethod {
                    kind,
                    key,
                    params,
                    body,
                    computed,
                } => {
                    if *computed || *kind != MethodKind::Method {
                        return Err(TranslateError::Unsupported {
                            kind: "ObjectMethod".to_string(),
                            node: format!("{kind:?} accessor {}", key.describe()),
                        });
                    }
                    entries.push(Form::map_entry(
                        self.property_key(key)?,
                        self.function(vocab::FN, None, params, body)?,
                    ));
                }
                other => return Err(unsupported(other)),
            }
        }

        if !spread {
            return Ok(Form::host_object(entries));
        }
        if !entries.is_empty() {
            sources.push(Form::host_object(entries));
        }
        let mut children = vec![Form::host_object(vec![])];
        children.extend(sources);
        Ok(Form::call(vocab::HOST_ASSIGN, children))
    }

    fn property_key(&self, key: &Node) -> Result<Form, TranslateError> {
        match key {
            Node::Identifier { name } => Ok(Form::keyword(name.as_str())),
            Node::StringLiteral { value } if is_keyword_safe(value) => {
                Ok(Form::keyword(value.as_str()))
            }
            Node::StringLiteral { value } => Ok(Form::string(value.as_str())),
            Node::NumericLiteral { raw } => Ok(Form::keyword(raw.as_str())),
            other => Err(unsupported(other)),
        }
    }

    fn unary(&self, operator: &str, argument: &Node) -> Result<Form, TranslateError> {
        if operator != "delete" {
            return Ok(Form::call(
                normalize_operator(operator),
                vec![self.one(argument, Context::default())?],
            ));
        }

        let Node::MemberExpression {
            object,
            property,
            computed,
        } = argument
        else {
            return Err(TranslateError::InvalidDelete {
                node: argument.describe(),
            });
        };
        let key = match property.as_identifier() {
            Some(name) if !*computed => Form::string(name),
            _ => self.one(property, Context::default())?,
        };
        Ok(Form::call(
            vocab::JS_DELETE,
            vec![self.one(object, Context::callee())?, key],
        ))
    }

    fn assignment(&self, operator: &str, left: &Node, right: &Node) -> Result<Form, TranslateError> {
        let receiver = is_receiver_rooted(left);
        let rebound;
        let target = if receiver {
            rebound = rebind_receiver(left, vocab::ALT_RECEIVER);
            &rebound
        } else {
            left
        };
        if operator != "=" && !is_repeatable_place(target) {
            return Err(TranslateError::Precondition {
                rule: "assignment",
                message: format!("`{operator}` would evaluate {} twice", left.describe()),
            });
        }
        let value = self.one(right, Context::default())?;

        let form = match target {
            Node::Identifier { .. } => {
                let place = self.one(target, Context::default())?;
                let value = compound(operator, place.clone(), value)?;
                Form::call(vocab::SET, vec![place, value])
            }
            Node::MemberExpression {
                object,
                property,
                computed: false,
            } => {
                let place = self.getter(object, property)?;
                let value = compound(operator, place.clone(), value)?;
                Form::call(vocab::SET, vec![place, value])
            }
            Node::MemberExpression {
                object,
                property,
                computed: true,
            } => {
                let object = self.one(object, Context::callee())?;
                let key = self.one(property, Context::default())?;
                let current = Form::call(vocab::AGET, vec![object.clone(), key.clone()]);
                let value = compound(operator, current, value)?;
                Form::call(vocab::ASET, vec![object, key, value])
            }
            other => return Err(unsupported(other)),
        };

        Ok(if receiver {
            Form::call(
                vocab::THIS_AS,
                vec![Form::symbol(vocab::ALT_RECEIVER), form],
            )
        } else {
            form
        })
    }

    /// `(.-property object)`
    fn getter(&self, object: &Node, property: &Node) -> Result<Form, TranslateError> {
        Ok(Form::list(vec![
            self.one(property, Context::naming(Naming::DotGetter))?,
            self.one(object, Context::callee())?,
        ]))
    }

    /// Member access outside callee position.
    fn member(&self, node: &Node) -> Result<Form, TranslateError> {
        if is_receiver_rooted(node) {
            let rebound = rebind_receiver(node, vocab::RECEIVER);
            return Ok(Form::call(
                vocab::THIS_AS,
                vec![Form::symbol(vocab::RECEIVER), self.member(&rebound)?],
            ));
        }

        let Node::MemberExpression {
            object,
            property,
            computed,
        } = node
        else {
            return Err(unsupported(node));
        };

        if *computed {
            return Ok(Form::call(
                vocab::AGET,
                vec![
                    self.one(object, Context::callee())?,
                    self.one(property, Context::default())?,
                ],
            ));
        }

        let (target, properties) = dot_chain(node);
        match properties.as_slice() {
            [property] => self.getter(target, property),
            _ => {
                let mut children = vec![self.one(target, Context::callee())?];
                for property in properties {
                    children.push(self.one(property, Context::naming(Naming::Getter))?);
                }
                Ok(Form::call(vocab::DOT_DOT, children))
            }
        }
    }

    fn call_expression(&self, node: &Node) -> Result<Form, TranslateError> {
        let chain = call_chain(node);
        if !is_pipeline(&chain) {
            let Node::CallExpression { callee, arguments } = node else {
                return Err(unsupported(node));
            };
            return self.call(callee, arguments);
        }

        trace!(stages = chain.len(), "threading call chain");
        let mut links = chain.into_iter();
        let mut children = Vec::new();
        if let Some((callee, arguments)) = links.next() {
            children.push(self.call(callee, arguments)?);
        }
        for (callee, arguments) in links {
            let Node::MemberExpression { property, .. } = callee else {
                return Err(unsupported(callee));
            };
            let mut stage = vec![self.one(property, Context::naming(Naming::Method))?];
            stage.extend(self.arguments(arguments)?);
            children.push(Form::list(stage));
        }
        Ok(Form::call(vocab::THREAD_FIRST, children))
    }

    fn call(&self, callee: &Node, arguments: &[Node]) -> Result<Form, TranslateError> {
        if is_receiver_rooted(callee) {
            let rebound = rebind_receiver(callee, vocab::RECEIVER);
            return Ok(Form::call(
                vocab::THIS_AS,
                vec![Form::symbol(vocab::RECEIVER), self.call(&rebound, arguments)?],
            ));
        }

        let mut children = match callee {
            Node::MemberExpression {
                object,
                property,
                computed: false,
            } => vec![
                self.one(property, Context::naming(Naming::Method))?,
                self.one(object, Context::callee())?,
            ],
            Node::MemberExpression { computed: true, .. } => vec![self.member(callee)?],
            _ => vec![self.one(callee, Context::callee())?],
        };
        children.extend(self.arguments(arguments)?);
        Ok(Form::list(children))
    }

    fn arguments(&self, arguments: &[Node]) -> Result<Vec<Form>, TranslateError> {
        arguments
            .iter()
            .map(|argument| match argument {
                Node::SpreadElement { argument } => Err(TranslateError::Unsupported {
                    kind: "SpreadElement".to_string(),
                    node: format!("spread argument {}", argument.describe()),
                }),
                other => self.one(other, Context::default()),
            })
            .collect()
    }

    fn jsx_element(&self, opening: &Node, children: &[Node]) -> Result<Form, TranslateError> {
        let Node::JsxOpeningElement {
            name, attributes, ..
        } = opening
        else {
            return Err(unsupported(opening));
        };

        let mut items = vec![self.one(name, Context::component())?];

        if attributes.is_empty() {
            items.push(Form::nil());
        } else {
            let mut entries = Vec::new();
            for attribute in attributes {
                let Node::JsxAttribute { name, value } = attribute else {
                    return Err(unsupported(attribute));
                };
                let value = match value.as_deref() {
                    Some(value) => {
                        let form = self.one(value, Context::default())?;
                        if form.is_marker() { Form::nil() } else { form }
                    }
                    None => Form::boolean(true),
                };
                entries.push(Form::map_entry(self.one(name, Context::default())?, value));
            }
            items.push(Form::hash_map(entries));
        }

        for child in children {
            items.extend(self.next(child, Context::default())?);
        }
        Ok(Form::vector(items))
    }

    fn import(&self, specifiers: &[Node], source: &str) -> Result<Vec<Form>, TranslateError> {
        let require = || Form::call(vocab::HOST_REQUIRE, vec![Form::string(source)]);
        if specifiers.is_empty() {
            return Ok(vec![require()]);
        }

        specifiers
            .iter()
            .map(|specifier| {
                let (local, value) = match specifier {
                    Node::ImportNamespaceSpecifier { local } => (local, require()),
                    Node::ImportDefaultSpecifier { local } => (
                        local,
                        Form::call(vocab::dot_getter(vocab::DEFAULT_EXPORT), vec![require()]),
                    ),
                    Node::ImportSpecifier { imported, local } => {
                        (local, Form::call(vocab::dot_getter(imported), vec![require()]))
                    }
                    other => return Err(unsupported(other)),
                };
                Ok(Form::call(
                    vocab::DEF,
                    vec![Form::symbol(local.as_str()), value],
                ))
            })
            .collect()
    }

    /// `(set! (.-name js/exports) value)`
    fn export(&self, name: &str, value: Form) -> Form {
        Form::call(
            vocab::SET,
            vec![
                Form::call(vocab::dot_getter(name), vec![Form::symbol(vocab::HOST_EXPORTS)]),
                value,
            ],
        )
    }

    fn export_default(&self, declaration: &Node) -> Result<Form, TranslateError> {
        match declaration {
            Node::FunctionDeclaration { id, .. } => {
                let name = self.binding_name(id)?;
                let definition = self.one(declaration, Context::default())?;
                Ok(Form::call(
                    vocab::DO,
                    vec![definition, self.export(vocab::DEFAULT_EXPORT, name)],
                ))
            }
            other => Ok(self.export(
                vocab::DEFAULT_EXPORT,
                self.one(other, Context::default())?,
            )),
        }
    }

    fn export_named(
        &self,
        declaration: Option<&Node>,
        specifiers: &[Node],
    ) -> Result<Vec<Form>, TranslateError> {
        if let Some(declaration) = declaration {
            let definitions = self.next(declaration, Context::default())?;
            let exports: Vec<Form> = definitions
                .iter()
                .filter_map(Form::defined_name)
                .map(|name| self.export(name, Form::symbol(name)))
                .collect();
            let mut children = definitions;
            children.extend(exports);
            return Ok(vec![Form::call(vocab::DO, children)]);
        }

        specifiers
            .iter()
            .map(|specifier| match specifier {
                Node::ExportSpecifier { local, exported } => {
                    Ok(self.export(exported, Form::symbol(local.as_str())))
                }
                other => Err(unsupported(other)),
            })
            .collect()
    }
}

/// Value stored by an assignment: `value` for `=`, `(op current value)` for
/// arithmetic compound operators.
fn compound(operator: &str, current: Form, value: Form) -> Result<Form, TranslateError> {
    match operator {
        "=" => Ok(value),
        "&&=" | "||=" | "??=" => Err(TranslateError::Unsupported {
            kind: "LogicalAssignment".to_string(),
            node: format!("`{operator}`"),
        }),
        _ => {
            let operator = operator.strip_suffix('=').unwrap_or(operator);
            Ok(Form::call(operator, vec![current, value]))
        }
    }
}

/// Whether a compound assignment may read and write `target` by repeating
/// its object and key.
fn is_repeatable_place(target: &Node) -> bool {
    match target {
        Node::MemberExpression {
            object,
            property,
            computed,
        } => is_repeatable(object) && (!*computed || is_repeatable(property)),
        _ => true,
    }
}

/// Test of a `case` clause; grouped tests become a list.
fn case_test(mut tests: Vec<Form>) -> Form {
    if tests.len() == 1 {
        if let Some(test) = tests.pop() {
            return test;
        }
    }
    Form::list(tests)
}

/// Strings that read back as the same keyword.
fn is_keyword_safe(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with(|c: char| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || "-_*+!?<>=$".contains(c))
}
