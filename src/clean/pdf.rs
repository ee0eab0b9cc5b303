//! PDF cleaner.

use std::path::Path;

use rayon::prelude::*;

use super::{ensure_exists, Cleaner};
use crate::detect::verify_pdf;
use crate::error::Result;
use crate::layout::PageLayout;
use crate::normalize::finalize;
use crate::options::PdfOptions;
use crate::parser::{LopdfBackend, PdfBackend};

/// Separator between page texts.
const PAGE_SEPARATOR: &str = "\n\n";

/// Reconstructs reading order, headings and paragraphs from PDF pages.
///
/// Pages are laid out independently (in parallel unless disabled) and
/// joined in page order.
pub struct PdfCleaner {
    layout: PageLayout,
}

impl PdfCleaner {
    pub fn new(options: PdfOptions) -> Self {
        Self {
            layout: PageLayout::new(options),
        }
    }

    pub fn options(&self) -> &PdfOptions {
        self.layout.options()
    }

    /// Clean a document provided by any backend.
    pub fn clean_with_backend<B: PdfBackend>(&self, backend: &B) -> Result<String> {
        let numbers = backend.page_numbers();
        log::debug!("Laying out {} page(s)", numbers.len());

        let laid_out: Vec<Result<Option<String>>> = if self.options().parallel {
            numbers
                .par_iter()
                .map(|&number| self.layout_page(backend, number))
                .collect()
        } else {
            numbers
                .iter()
                .map(|&number| self.layout_page(backend, number))
                .collect()
        };

        let mut pages: Vec<String> = Vec::with_capacity(numbers.len());
        for (&number, outcome) in numbers.iter().zip(laid_out) {
            let text = match outcome.map_err(|e| {
                log::error!("Page {number} content could not be decoded: {e}");
                e
            })? {
                Some(text) => text,
                None => {
                    log::debug!("Page {number} yielded no words after filtering, using text fallback");
                    backend.page_text(number)?
                }
            };
            let text = text.trim();
            if !text.is_empty() {
                pages.push(text.to_string());
            }
        }

        Ok(finalize(&pages.join(PAGE_SEPARATOR)))
    }

    fn layout_page<B: PdfBackend>(&self, backend: &B, number: u32) -> Result<Option<String>> {
        let page = backend.page_words(number)?;
        Ok(self.layout.layout(page.words, page.width, page.height))
    }
}

impl Default for PdfCleaner {
    fn default() -> Self {
        Self::new(PdfOptions::default())
    }
}

impl Cleaner for PdfCleaner {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn clean(&self, path: &Path) -> Result<String> {
        ensure_exists(path)?;
        let backend = verify_pdf(path)
            .and_then(|()| LopdfBackend::load_file(path))
            .map_err(|e| {
                log::error!("Failed to open PDF {}: {}", path.display(), e);
                e
            })?;
        self.clean_with_backend(&backend)
    }
}
