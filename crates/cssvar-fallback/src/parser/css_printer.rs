//! Canonical CSS printer.
//!
//! Output layout: one node per line, two spaces of indentation per block
//! level, a blank line between top-level nodes. Raw text (preludes, values,
//! comments) is emitted as parsed, so printing a parsed stylesheet and
//! parsing it again yields the same tree.

use std::fmt::Write;

use crate::marker::FALLBACK_COMMENT;
use crate::stylesheet::{Declaration, Node};

const INDENT: &str = "  ";

/// Print nodes as CSS text.
///
/// Generated declarations get the trailing fallback marker so that the next
/// parse recognizes them.
pub fn print_css(nodes: &[Node]) -> String {
    let mut out = String::new();

    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        print_node(node, 0, &mut out);
    }

    out
}

fn print_node(node: &Node, depth: usize, out: &mut String) {
    push_indent(depth, out);

    match node {
        Node::Rule(rule) => {
            out.push_str(&rule.prelude);
            if rule.children.is_empty() {
                out.push_str(" {}\n");
                return;
            }

            out.push_str(" {\n");
            for child in &rule.children {
                print_node(child, depth + 1, out);
            }
            push_indent(depth, out);
            out.push_str("}\n");
        }
        Node::Declaration(decl) => {
            print_declaration(decl, out);
            out.push('\n');
        }
        Node::Comment(text) => {
            let _ = writeln!(out, "/*{}*/", text);
        }
        Node::AtStatement(text) => {
            let _ = writeln!(out, "{};", text);
        }
    }
}

fn print_declaration(decl: &Declaration, out: &mut String) {
    out.push_str(&decl.name);
    out.push(':');
    if !decl.value.is_empty() {
        out.push(' ');
        out.push_str(&decl.value);
    }
    if decl.generated {
        out.push(' ');
        out.push_str(FALLBACK_COMMENT);
    }
    out.push(';');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
