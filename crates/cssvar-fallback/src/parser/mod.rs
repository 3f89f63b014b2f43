//! CSS parsing and printing.

mod css_parser;
mod css_printer;

pub use css_parser::parse_css;
pub use css_printer::print_css;
