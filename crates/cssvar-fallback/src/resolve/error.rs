//! Variable resolution failures.

/// Why a value could not be resolved to a literal.
///
/// These are expected conditions (a variable may be defined by a consumer of
/// the stylesheet), so they are reported but never abort processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A referenced variable is not in the table and has no fallback.
    #[error("variable '--{name}' is not defined and has no fallback")]
    Undefined { name: String },

    /// Variables reference each other in a loop.
    #[error("variable reference cycle: {}", format_chain(.chain))]
    Cycle { chain: Vec<String> },

    /// A `var()` occurrence could not be parsed.
    #[error("malformed var() reference in '{value}'")]
    Malformed { value: String },

    /// The value resolved to nothing but whitespace.
    #[error("value resolves to an empty literal")]
    Empty,
}

fn format_chain(chain: &[String]) -> String {
    chain
        .iter()
        .map(|name| format!("--{}", name))
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_chain() {
        let err = ResolveError::Cycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "variable reference cycle: --a -> --b -> --a");
    }

    #[test]
    fn undefined_message_names_variable() {
        let err = ResolveError::Undefined {
            name: "missing".into(),
        };
        assert!(err.to_string().contains("'--missing'"));
    }
}
