//! CSS variables (custom properties) table.

use std::collections::HashMap;

use crate::stylesheet::Stylesheet;

/// Selector of the rule that declares global variables.
pub const DEFAULT_ROOT_SELECTOR: &str = ":root";

/// Global custom properties, keyed by name without the `--` sigil.
///
/// Values are stored as written (trimmed, `!important` removed); references
/// inside them are resolved later by the
/// [`ValueResolver`](crate::resolve::ValueResolver).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    variables: HashMap<String, String>,
}

impl VariableTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the root-scope rules of a stylesheet.
    ///
    /// Only top-level rules whose prelude is exactly `root_selector` are
    /// scanned; selector lists, compound selectors and rules nested in
    /// at-rule blocks do not count. Within the scanned rules, authored
    /// declarations of custom properties are recorded and a later
    /// declaration of the same name replaces an earlier one. A stylesheet
    /// without a root scope yields an empty table.
    pub fn from_root_scope(sheet: &Stylesheet, root_selector: &str) -> Self {
        let root_selector = root_selector.trim();
        let mut table = Self::new();
        let mut scopes = 0;

        for rule in sheet.rules().filter(|rule| rule.prelude == root_selector) {
            scopes += 1;
            for decl in rule.declarations() {
                if decl.generated || !decl.is_custom_property() {
                    continue;
                }
                if let Some(previous) = table.get(&decl.name) {
                    tracing::debug!(
                        "Variable {} redeclared ('{}' replaces '{}')",
                        decl.name,
                        decl.value,
                        previous
                    );
                }
                table.set(&decl.name, strip_important(&decl.value));
            }
        }

        tracing::debug!(
            "Built variable table with {} entries from {} '{}' rule(s)",
            table.len(),
            scopes,
            root_selector
        );

        table
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        // Remove leading "--" if present
        let name = name.strip_prefix("--").unwrap_or(&name).to_string();
        self.variables.insert(name, value.into());
    }

    /// Get a variable value.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.strip_prefix("--").unwrap_or(name);
        self.variables.get(name).map(|s| s.as_str())
    }

    /// Check if a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.strip_prefix("--").unwrap_or(name);
        self.variables.contains_key(name)
    }

    /// Get the number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all variables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.set(name, value);
        }
        table
    }
}

/// Remove a trailing `!important` flag, which is not part of the value.
fn strip_important(value: &str) -> &str {
    let trimmed = value.trim_end();
    let Some(bang) = trimmed.rfind('!') else {
        return trimmed;
    };

    if trimmed[bang + 1..].trim_start().eq_ignore_ascii_case("important") {
        trimmed[..bang].trim_end()
    } else {
        trimmed
    }
}
