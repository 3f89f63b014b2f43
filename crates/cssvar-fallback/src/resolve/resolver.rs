//! Recursive `var()` substitution.
//!
//! Values are tokenized with `cssparser`. Tokens outside `var()` are copied
//! back from the source slice untouched, so only the references themselves
//! change: `1px solid var(--border)` becomes `1px solid black`. References
//! nested in other functions (`rgba(var(--rgb), .5)`) are found as well.

use cssparser::{ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token};

use super::ResolveError;
use crate::variables::VariableTable;

type SubstituteResult<'i, T> = std::result::Result<T, CssParseError<'i, ResolveError>>;

/// A parsed `var(--name, fallback)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// Variable name without the `--` sigil.
    pub name: String,
    /// Raw fallback text after the first comma, trimmed. May be empty or
    /// contain further references.
    pub fallback: Option<String>,
}

/// Outcome of resolving a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The value contains no `var()` reference; there is nothing to do.
    NoReferences,
    /// Every reference was replaced; the value is fully literal.
    Literal(String),
}

/// Resolves values against a [`VariableTable`].
///
/// A defined variable always wins over the reference's own fallback; the
/// fallback is only used for names missing from the table. Variable values
/// are resolved recursively. A name that is re-entered while it is still
/// being resolved is a cycle, which bounds the recursion depth by the table
/// size.
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    table: &'a VariableTable,
}

impl<'a> ValueResolver<'a> {
    /// Create a resolver over a table.
    pub fn new(table: &'a VariableTable) -> Self {
        Self { table }
    }

    /// Resolve every reference in `value`.
    ///
    /// # Errors
    ///
    /// Fails when any reference is undefined without a fallback, part of a
    /// cycle or malformed, or when the result is empty.
    pub fn resolve(&self, value: &str) -> Result<Resolution, ResolveError> {
        let mut stack = vec![];
        let (literal, references) = self.resolve_str(value, &mut stack)?;

        if references == 0 {
            return Ok(Resolution::NoReferences);
        }

        let literal = literal.trim();
        if literal.is_empty() {
            return Err(ResolveError::Empty);
        }

        Ok(Resolution::Literal(literal.to_string()))
    }

    /// Substitute all references in a string, returning the text and the
    /// number of references found at this level.
    fn resolve_str(
        &self,
        value: &str,
        stack: &mut Vec<String>,
    ) -> Result<(String, usize), ResolveError> {
        let mut input = ParserInput::new(value);
        let mut parser = Parser::new(&mut input);
        let mut out = String::with_capacity(value.len());

        let references = parser
            .parse_entirely(|p| self.substitute(p, stack, &mut out))
            .map_err(|err| match err.kind {
                ParseErrorKind::Custom(error) => error,
                ParseErrorKind::Basic(_) => ResolveError::Malformed {
                    value: value.to_string(),
                },
            })?;

        Ok((out, references))
    }

    fn substitute<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
        stack: &mut Vec<String>,
        out: &mut String,
    ) -> SubstituteResult<'i, usize> {
        let mut references = 0;

        loop {
            let start = parser.position();
            let token = match parser.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            match &token {
                Token::Function(name) if name.eq_ignore_ascii_case("var") => {
                    let reference = parser.parse_nested_block(|p| parse_reference(p))?;
                    let literal = self
                        .resolve_reference(&reference, stack)
                        .map_err(|e| parser.new_custom_error(e))?;
                    out.push_str(&literal);
                    references += 1;
                }
                Token::Function(_)
                | Token::ParenthesisBlock
                | Token::SquareBracketBlock
                | Token::CurlyBracketBlock => {
                    out.push_str(parser.slice_from(start));
                    references += parser.parse_nested_block(|p| self.substitute(p, stack, out))?;
                    let closing = closing_delimiter(&token);
                    if parser.slice_from(start).ends_with(closing) {
                        out.push(closing);
                    }
                }
                _ => out.push_str(parser.slice_from(start)),
            }
        }

        Ok(references)
    }

    fn resolve_reference(
        &self,
        reference: &VariableReference,
        stack: &mut Vec<String>,
    ) -> Result<String, ResolveError> {
        if let Some(value) = self.table.get(&reference.name) {
            if stack.contains(&reference.name) {
                let mut chain = stack.clone();
                chain.push(reference.name.clone());
                return Err(ResolveError::Cycle { chain });
            }

            stack.push(reference.name.clone());
            let resolved = self.resolve_str(value, stack);
            stack.pop();
            return resolved.map(|(literal, _)| literal.trim().to_string());
        }

        match &reference.fallback {
            Some(fallback) => self
                .resolve_str(fallback, stack)
                .map(|(literal, _)| literal.trim().to_string()),
            None => Err(ResolveError::Undefined {
                name: reference.name.clone(),
            }),
        }
    }
}

/// Parse the inside of `var( ... )`.
fn parse_reference<'i>(parser: &mut Parser<'i, '_>) -> SubstituteResult<'i, VariableReference> {
    let start = parser.position();
    let ident = parser.expect_ident()?.clone();

    let Some(name) = ident.strip_prefix("--") else {
        while parser.next_including_whitespace_and_comments().is_ok() {}
        let value = format!("var({})", parser.slice_from(start).trim());
        return Err(parser.new_custom_error(ResolveError::Malformed { value }));
    };
    let name = name.to_string();

    if parser.is_exhausted() {
        return Ok(VariableReference {
            name,
            fallback: None,
        });
    }

    parser.expect_comma()?;
    let fallback_start = parser.position();
    while parser.next_including_whitespace_and_comments().is_ok() {}

    Ok(VariableReference {
        name,
        fallback: Some(parser.slice_from(fallback_start).trim().to_string()),
    })
}

fn closing_delimiter(token: &Token<'_>) -> char {
    match token {
        Token::SquareBracketBlock => ']',
        Token::CurlyBracketBlock => '}',
        _ => ')',
    }
}
