//! ledgerline-ingest: heuristic extraction of transactions from bank-statement text.
//!
//! The entry point is [`parse_statement_text`]: noisy extracted text in,
//! ordered transactions plus warnings, a confidence score, and debug counters out.

pub mod amounts;
pub mod classify;
pub mod confidence;
pub mod dates;
pub mod document;
pub mod error;
pub mod normalize;
pub mod parsers;
pub mod types;

pub use amounts::parse_amount;
pub use classify::{LineClass, classify_line};
pub use dates::{detect_date_order, parse_date, parse_date_with_year};
pub use document::{DocumentKind, parse_statement_bytes, statement_text};
pub use error::{Error, Result};
pub use parsers::{parse_statement_text, parse_statement_text_with};
pub use types::{ColumnLayout, DateOrder, ParseDebug, ParseOptions, ParseResult, Transaction};
