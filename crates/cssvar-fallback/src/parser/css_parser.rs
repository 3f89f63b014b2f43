//! CSS syntax parser using the `cssparser` crate.
//!
//! Unlike a style engine, the fallback pipeline has to write every file back,
//! so this parser does not interpret selectors or values. It walks the token
//! stream only far enough to find item boundaries (`;` and `{ ... }` blocks)
//! and keeps the raw source slices for preludes, values, comments and
//! block-less at-rules.

use crate::marker::is_fallback_marker;
use crate::stylesheet::{Declaration, Node, Rule};
use crate::{Error, Result};
use cssparser::{
    ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, SourceLocation,
    SourcePosition, Token,
};

type ItemResult<'i, T> = std::result::Result<T, CssParseError<'i, Error>>;

/// Parse a CSS stylesheet string into its top-level nodes.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the line and column of the offending item
/// when the text cannot be split into rules and declarations: a stray `}`,
/// an unterminated string or `url(`, a declaration without `:` or without a
/// property name, or a selector with no block. There is no recovery; a file
/// that fails to parse must not be rewritten.
///
/// # Example
///
/// ```ignore
/// let nodes = parse_css("a { color: red /* fallback */; color: var(--c); }")?;
/// assert_eq!(nodes.len(), 1);
/// ```
pub fn parse_css(css: &str) -> Result<Vec<Node>> {
    let css = css.strip_prefix('\u{feff}').unwrap_or(css);
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    parser
        .parse_entirely(|p| parse_block_contents(p))
        .map_err(into_error)
}

/// Parse the items of a block (or of the whole stylesheet) until exhausted.
fn parse_block_contents<'i>(parser: &mut Parser<'i, '_>) -> ItemResult<'i, Vec<Node>> {
    let mut nodes = vec![];

    loop {
        let state = parser.state();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) | Token::Semicolon | Token::CDO | Token::CDC => {}
            Token::Comment(text) => nodes.push(Node::Comment(text.to_string())),
            _ => {
                parser.reset(&state);
                nodes.push(parse_item(parser)?);
            }
        }
    }

    Ok(nodes)
}

/// Parse one item: a rule, a declaration, or a block-less at-rule.
///
/// The item ends at the first top-level `;`, at the end of the enclosing
/// block, or right after a `{ ... }` block (which makes it a rule).
fn parse_item<'i>(parser: &mut Parser<'i, '_>) -> ItemResult<'i, Node> {
    let location = parser.current_source_location();
    let start = parser.position();

    let mut is_at_rule = false;
    let mut first = true;
    // Positions just before and just after the first top-level ':'.
    let mut colon: Option<(SourcePosition, SourcePosition)> = None;
    // Position before a comment that so far ends the value, and whether it is the marker.
    let mut trailing_comment: Option<(SourcePosition, bool)> = None;

    let end = loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => Some(token.clone()),
            Err(_) => None,
        };
        let Some(token) = token else {
            break parser.position();
        };

        if first {
            is_at_rule = matches!(token, Token::AtKeyword(_));
            first = false;
        }

        match token {
            Token::Semicolon => break before,
            Token::CurlyBracketBlock => {
                let prelude = parser.slice(start..before).trim().to_string();
                if prelude.is_empty() {
                    return Err(item_error(parser, location, "Expected selector before '{'"));
                }
                let children = parser.parse_nested_block(|p| parse_block_contents(p))?;
                return Ok(Node::Rule(Rule { prelude, children }));
            }
            Token::Colon if colon.is_none() => colon = Some((before, parser.position())),
            Token::Comment(text) => {
                if colon.is_some() {
                    trailing_comment = Some((before, is_fallback_marker(&text)));
                }
            }
            Token::WhiteSpace(_) => {}
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                skip_block(parser)?;
                trailing_comment = None;
            }
            Token::CloseCurlyBracket => {
                return Err(item_error(parser, location, "Unexpected '}'"));
            }
            Token::BadString(_) => {
                return Err(item_error(parser, location, "Unterminated string"));
            }
            Token::BadUrl(_) => {
                return Err(item_error(parser, location, "Malformed url()"));
            }
            _ => trailing_comment = None,
        }
    };

    if is_at_rule {
        let text = parser.slice(start..end).trim();
        return Ok(Node::AtStatement(text.to_string()));
    }

    let Some((colon_before, colon_after)) = colon else {
        return Err(item_error(parser, location, "Expected ':' in declaration"));
    };

    let name = parser.slice(start..colon_before).trim();
    if name.is_empty() {
        return Err(item_error(parser, location, "Expected property name before ':'"));
    }

    let declaration = match trailing_comment {
        Some((marker_start, true)) => {
            Declaration::fallback(name, parser.slice(colon_after..marker_start).trim())
        }
        _ => Declaration::new(name, parser.slice(colon_after..end).trim()),
    };

    Ok(Node::Declaration(declaration))
}

/// Consume the rest of a block whose opening token was just returned, so
/// that `parser.position()` is past its closing delimiter.
fn skip_block<'i>(parser: &mut Parser<'i, '_>) -> ItemResult<'i, ()> {
    parser.parse_nested_block(|p| {
        while p.next_including_whitespace_and_comments().is_ok() {}
        Ok(())
    })
}

fn item_error<'i>(
    parser: &Parser<'i, '_>,
    location: SourceLocation,
    message: &str,
) -> CssParseError<'i, Error> {
    parser.new_custom_error(Error::parse(message, location.line + 1, location.column))
}

fn into_error(err: CssParseError<'_, Error>) -> Error {
    match err.kind {
        ParseErrorKind::Custom(error) => error,
        ParseErrorKind::Basic(kind) => Error::parse(
            format!("{:?}", kind),
            err.location.line + 1,
            err.location.column,
        ),
    }
}
