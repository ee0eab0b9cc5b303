//! Markdown pass-through cleaner.

use std::path::Path;

use super::html::decode_utf8_dropping_invalid;
use super::{ensure_exists, Cleaner};
use crate::error::Result;
use crate::normalize::{finalize, strip_bom};

/// Keeps Markdown as written; only BOMs are removed and the text is
/// normalized and trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCleaner;

impl MarkdownCleaner {
    pub fn new() -> Self {
        Self
    }

    pub fn clean_str(&self, text: &str) -> String {
        finalize(&strip_bom(text))
    }
}

impl Cleaner for MarkdownCleaner {
    fn name(&self) -> &str {
        "markdown"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn clean(&self, path: &Path) -> Result<String> {
        ensure_exists(path)?;
        let bytes = std::fs::read(path)?;
        Ok(self.clean_str(&decode_utf8_dropping_invalid(&bytes)))
    }
}
