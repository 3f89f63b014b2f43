//! The fallback marker convention.
//!
//! A generated declaration is printed with a trailing `/* fallback */`
//! comment. The comment is the only thing that survives between runs: the
//! parser turns it into [`Declaration::generated`](crate::stylesheet::Declaration)
//! and the printer turns the flag back into the comment. Nothing else in the
//! pipeline looks at comment text.

/// Text of the marker comment, without the comment delimiters.
pub const FALLBACK_MARKER: &str = "fallback";

/// The marker as it appears in printed CSS.
pub const FALLBACK_COMMENT: &str = "/* fallback */";

/// Check whether the inner text of a comment is the fallback marker.
///
/// Surrounding whitespace is ignored, so `/*fallback*/` and
/// `/*  fallback  */` are both recognized.
pub fn is_fallback_marker(comment_text: &str) -> bool {
    comment_text.trim() == FALLBACK_MARKER
}
