//! Error types for the document adapters around the parser.
//!
//! The parser itself never fails; these cover getting text out of a document.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Statement text is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("Unsupported document: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, Error>;
