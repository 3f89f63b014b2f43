//! Injection of literal fallback declarations.

use crate::resolve::{Resolution, ResolveError, ValueResolver};
use crate::stylesheet::{Declaration, Node, Stylesheet};
use crate::variables::VariableTable;

/// A declaration that kept no fallback because its value did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDeclaration {
    /// Property name.
    pub property: String,
    /// Authored value.
    pub value: String,
    /// Why resolution failed.
    pub error: ResolveError,
}

/// Result of one injection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Number of fallback declarations inserted.
    pub inserted: usize,
    /// Declarations left without a fallback.
    pub unresolved: Vec<UnresolvedDeclaration>,
}

/// Insert a generated literal declaration before every declaration whose
/// value references a variable.
///
/// Each declaration is handled on its own: two declarations of the same
/// property each get their own fallback. Custom property declarations are
/// skipped, since an engine without `var()` support ignores them anyway. When a value cannot be resolved
/// nothing is inserted and the declaration is left as it is. Generated
/// declarations are never used as input, so this is meant to run after
/// [`remove_fallbacks`](super::remove_fallbacks).
pub fn inject_fallbacks(sheet: &mut Stylesheet, table: &VariableTable) -> InjectionReport {
    let resolver = ValueResolver::new(table);
    let mut report = InjectionReport::default();

    sheet.visit_blocks_mut(|nodes| {
        if !nodes.iter().any(|node| matches!(node, Node::Declaration(_))) {
            return;
        }

        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes.drain(..) {
            if let Node::Declaration(decl) = &node {
                if let Some(fallback) = fallback_for(decl, &resolver, &mut report) {
                    out.push(Node::Declaration(fallback));
                }
            }
            out.push(node);
        }
        *nodes = out;
    });

    report
}

fn fallback_for(
    decl: &Declaration,
    resolver: &ValueResolver<'_>,
    report: &mut InjectionReport,
) -> Option<Declaration> {
    if decl.generated || decl.is_custom_property() {
        return None;
    }

    match resolver.resolve(&decl.value) {
        Ok(Resolution::NoReferences) => None,
        Ok(Resolution::Literal(literal)) => {
            report.inserted += 1;
            Some(Declaration::fallback(decl.name.clone(), literal))
        }
        Err(error) => {
            tracing::info!(
                "No fallback for '{}: {}': {}",
                decl.name,
                decl.value,
                error
            );
            report.unresolved.push(UnresolvedDeclaration {
                property: decl.name.clone(),
                value: decl.value.clone(),
                error,
            });
            None
        }
    }
}
