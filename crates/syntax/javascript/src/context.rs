//! Per-call translation flags.

/// How an identifier is spelled when it names a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Naming {
    /// `name`
    #[default]
    Plain,
    /// `-name`, a step inside a `..` chain.
    Getter,
    /// `.-name`, a property read in head position.
    DotGetter,
    /// `.name`, a method call head.
    Method,
}

/// Flags a rule sets for one specific child.
///
/// A context is never inherited: every rule builds the context for each
/// child it recurses into, starting from [`Context::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    pub naming: Naming,
    /// Qualify the identifier with `js/` when it names a host global.
    pub check_global: bool,
    /// Splice a statement list into the enclosing form instead of wrapping
    /// it in `(do ...)`.
    pub implicit_do: bool,
    /// The identifier is a JSX tag name.
    pub component: bool,
}

impl Context {
    pub fn naming(naming: Naming) -> Self {
        Self {
            naming,
            ..Self::default()
        }
    }

    /// Callee, method receiver, getter target or constructor.
    pub fn callee() -> Self {
        Self {
            check_global: true,
            ..Self::default()
        }
    }

    pub fn implicit_do() -> Self {
        Self {
            implicit_do: true,
            ..Self::default()
        }
    }

    pub fn component() -> Self {
        Self {
            component: true,
            ..Self::default()
        }
    }
}
