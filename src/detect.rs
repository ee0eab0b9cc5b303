//! Document format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Source formats the cleaners understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Html,
    Markdown,
}

impl DocumentFormat {
    /// Format for a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "html" | "htm" => Some(Self::Html),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Format for a path, from its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Extensions mapped to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Html => &["html", "htm"],
            Self::Markdown => &["md", "markdown"],
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
        };
        f.write_str(name)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Whether the bytes start with the PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Verify that a file starts with the PDF header.
///
/// A missing file is `NotFound`; a file without the header is a `Parse`
/// error.
pub fn verify_pdf<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let mut header = [0u8; 5];
    let mut file = File::open(path)?;
    let mut read = 0;
    while read < header.len() {
        let n = file.read(&mut header[read..])?;
        if n == 0 {
            break;
        }
        read += n;
    }

    if is_pdf_bytes(&header[..read]) {
        Ok(())
    } else {
        Err(Error::Parse(format!(
            "{} does not start with a PDF header",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("HTM"), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_extension("Markdown"), Some(DocumentFormat::Markdown));
        assert_eq!(DocumentFormat::from_extension("docx"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path("a/b/report.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_path("notes"), None);
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"<!DOCTYPE html>"));
        assert!(!is_pdf_bytes(b"%PDF"));
    }

    #[test]
    fn test_verify_pdf() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.pdf");
        std::fs::write(&good, b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert!(verify_pdf(&good).is_ok());

        let bad = dir.path().join("bad.pdf");
        let mut file = File::create(&bad).unwrap();
        file.write_all(b"hello").unwrap();
        assert!(matches!(verify_pdf(&bad), Err(Error::Parse(_))));

        let missing = dir.path().join("missing.pdf");
        assert!(matches!(verify_pdf(&missing), Err(Error::NotFound(_))));
    }
}
