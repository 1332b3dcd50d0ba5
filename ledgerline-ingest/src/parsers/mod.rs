//! Statement text parsers.

pub mod extract;
pub mod merge;
pub mod statement;

pub use statement::{TRAILING_ROW_WARNING, parse_statement_text, parse_statement_text_with};
