//! HTML cleaner.

use std::path::Path;

use super::{ensure_exists, Cleaner};
use crate::error::Result;
use crate::html::{DomTree, HeadingInferencer, MarkdownRenderer, NoiseStripper, SimpleTree};
use crate::normalize::{compact_lines, finalize, strip_bom};
use crate::options::HtmlOptions;

#[cfg(feature = "full-html")]
use crate::html::ScraperTree;
#[cfg(feature = "full-html")]
use crate::options::HtmlBackend;

/// Renders HTML documents as Markdown.
pub struct HtmlCleaner {
    options: HtmlOptions,
    renderer: MarkdownRenderer,
}

impl HtmlCleaner {
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Convert an HTML string to normalized Markdown.
    pub fn clean_str(&self, html: &str) -> String {
        #[cfg(feature = "full-html")]
        if self.options.backend.resolve() == HtmlBackend::Full {
            let mut tree = ScraperTree::parse(html);
            return self.render(&mut tree);
        }

        let mut tree = SimpleTree::parse(html);
        self.render(&mut tree)
    }

    /// Strip noise, render from `<body>` (or the root) and add a top heading.
    pub fn render<T: DomTree>(&self, tree: &mut T) -> String {
        NoiseStripper.strip(tree);

        let start = tree.body().unwrap_or_else(|| tree.root());
        let lines = compact_lines(self.renderer.render(tree, &start));
        let lines = HeadingInferencer.ensure(&self.renderer, tree, lines);

        strip_bom(&finalize(&lines.join("\n")))
    }
}

impl Default for HtmlCleaner {
    fn default() -> Self {
        Self::new(HtmlOptions::default())
    }
}

impl Cleaner for HtmlCleaner {
    fn name(&self) -> &str {
        "html"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn clean(&self, path: &Path) -> Result<String> {
        ensure_exists(path)?;
        let bytes = std::fs::read(path)?;
        Ok(self.clean_str(&decode_utf8_dropping_invalid(&bytes)))
    }
}

/// Decode UTF-8, silently dropping invalid byte sequences.
pub(crate) fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => rest = &after[len..],
                    None => return out,
                }
            }
        }
    }
}
