//! Stylesheet container and file loading.

use std::path::{Path, PathBuf};

use crate::stylesheet::{Declaration, Node, Rule};
use crate::{Error, Result};

/// A parsed stylesheet.
///
/// The tree keeps everything needed to print the file back: rules,
/// declarations, comments and block-less at-rules, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level nodes.
    pub nodes: Vec<Node>,
    /// Source file path, if loaded from disk.
    pub source_path: Option<PathBuf>,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stylesheet from a CSS file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut sheet = Self::from_css(&content)?;
        sheet.source_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Parse a stylesheet from CSS text.
    pub fn from_css(css: &str) -> Result<Self> {
        let nodes = crate::parser::parse_css(css)?;
        Ok(Self {
            nodes,
            source_path: None,
        })
    }

    /// Print the stylesheet in canonical form.
    pub fn to_css(&self) -> String {
        crate::parser::print_css(&self.nodes)
    }

    /// Add a top-level rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.nodes.push(Node::Rule(rule));
    }

    /// Get the number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the stylesheet is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over top-level rules.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Rule(rule) => Some(rule),
            _ => None,
        })
    }

    /// Collect every declaration at every depth, in document order.
    pub fn declarations(&self) -> Vec<&Declaration> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Declaration>) {
            for node in nodes {
                match node {
                    Node::Declaration(decl) => out.push(decl),
                    Node::Rule(rule) => collect(&rule.children, out),
                    Node::Comment(_) | Node::AtStatement(_) => {}
                }
            }
        }

        let mut out = vec![];
        collect(&self.nodes, &mut out);
        out
    }

    /// Call `f` on the top-level node list and on every rule's child list.
    ///
    /// A list is visited before the rules it contains, so `f` may insert or
    /// remove nodes and the nested rules that remain are still visited.
    pub fn visit_blocks_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Vec<Node>),
    {
        fn walk<F: FnMut(&mut Vec<Node>)>(nodes: &mut Vec<Node>, f: &mut F) {
            f(nodes);
            for node in nodes.iter_mut() {
                if let Node::Rule(rule) = node {
                    walk(&mut rule.children, f);
                }
            }
        }

        walk(&mut self.nodes, &mut f);
    }
}
