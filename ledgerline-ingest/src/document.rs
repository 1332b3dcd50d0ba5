//! Document adapters: raw document bytes into statement text.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::parsers::parse_statement_text_with;
use crate::types::{ParseOptions, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    /// Guess the kind from a file extension; anything but `.pdf` is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => DocumentKind::Pdf,
            _ => DocumentKind::Text,
        }
    }
}

/// Decode UTF-8 statement text, dropping a leading byte-order mark.
pub fn read_statement_text(bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Extract the text layer of a PDF statement.
#[cfg(feature = "pdf")]
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| Error::Pdf(e.to_string()))?;
    if text.trim().is_empty() {
        // Scanned statements have no text layer
        return Err(Error::Pdf("document has no extractable text".to_string()));
    }
    Ok(text)
}

/// Turn document bytes into statement text according to `kind`.
pub fn statement_text(bytes: Vec<u8>, kind: DocumentKind) -> Result<String> {
    debug!(?kind, len = bytes.len(), "reading statement document");
    match kind {
        DocumentKind::Text => read_statement_text(bytes),
        #[cfg(feature = "pdf")]
        DocumentKind::Pdf => extract_pdf_text(&bytes),
        #[cfg(not(feature = "pdf"))]
        DocumentKind::Pdf => Err(Error::Unsupported(
            "PDF input requires the `pdf` feature".to_string(),
        )),
    }
}

/// Read a document and parse it. Errors only when no text can be obtained.
pub fn parse_statement_bytes(bytes: Vec<u8>, kind: DocumentKind, options: &ParseOptions) -> Result<ParseResult> {
    let text = statement_text(bytes, kind)?;
    Ok(parse_statement_text_with(&text, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("march.PDF")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("march.txt")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("march")), DocumentKind::Text);
    }

    #[test]
    fn test_bom_is_stripped() {
        let text = read_statement_text("\u{feff}2026-01-02 Coffee 3.00".as_bytes().to_vec()).unwrap();
        assert!(text.starts_with("2026"));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = read_statement_text(vec![0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, Error::InvalidText(_)));
    }

    #[test]
    fn test_parse_bytes() {
        let res = parse_statement_bytes(
            b"2026-01-02 Coffee 3.00 97.00".to_vec(),
            DocumentKind::Text,
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(res.transactions.len(), 1);
        assert_eq!(res.transactions[0].balance, Some(97.0));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_pdf_needs_feature() {
        let err = statement_text(b"%PDF-1.4".to_vec(), DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }
}
