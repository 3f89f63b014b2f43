//! Nodes of the stylesheet tree.

/// A single `property: value` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, as written (custom properties keep their `--` prefix).
    pub name: String,
    /// Raw value text, trimmed. May contain `!important` and comments.
    pub value: String,
    /// Whether this declaration was generated by a previous run.
    ///
    /// Derived from the trailing fallback marker at parse time and printed
    /// back as the marker. Declarations with `generated == false` are
    /// authored.
    pub generated: bool,
}

impl Declaration {
    /// Create an authored declaration.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            generated: false,
        }
    }

    /// Create a generated fallback declaration.
    pub fn fallback(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            generated: true,
        }
    }

    /// Check if this declares a custom property (`--name`).
    pub fn is_custom_property(&self) -> bool {
        self.name.starts_with("--")
    }
}

/// A selector or at-rule prelude followed by a `{ ... }` block.
///
/// Style rules hold declarations; at-rule blocks such as `@media` hold
/// nested rules. Both use the same child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Raw prelude text, trimmed (`a:hover`, `@media (min-width: 600px)`).
    pub prelude: String,
    /// Child nodes in source order.
    pub children: Vec<Node>,
}

impl Rule {
    /// Create an empty rule.
    pub fn new(prelude: impl Into<String>) -> Self {
        Self {
            prelude: prelude.into(),
            children: vec![],
        }
    }

    /// Append a declaration, builder style.
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.children.push(Node::Declaration(declaration));
        self
    }

    /// Append a nested rule, builder style.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.children.push(Node::Rule(rule));
        self
    }

    /// Iterate over the declarations directly inside this rule.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.children.iter().filter_map(|node| match node {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// Check if this is an at-rule block (`@media`, `@supports`, ...).
    pub fn is_at_rule(&self) -> bool {
        self.prelude.starts_with('@')
    }
}

/// An entry in a stylesheet or in a rule's block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A rule with a block.
    Rule(Rule),
    /// A declaration.
    Declaration(Declaration),
    /// A standalone comment; holds the text between `/*` and `*/`.
    Comment(String),
    /// A block-less at-rule such as `@import url(base.css)`, without the `;`.
    AtStatement(String),
}

impl Node {
    /// Get the declaration, if this node is one.
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Check if this node is a generated declaration.
    pub fn is_generated(&self) -> bool {
        matches!(self, Node::Declaration(decl) if decl.generated)
    }
}
