//! # docmark
//!
//! Normalizes PDF and HTML documents into Markdown text suitable for
//! chunking and retrieval.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> docmark::Result<()> {
//!     let markdown = docmark::clean_file("report.pdf")?;
//!     println!("{}", markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## What it does
//!
//! - **PDF**: drops running headers and footers, restores two-column
//!   reading order, marks headings by font size or weight, merges wrapped
//!   sentence fragments and filters page-number noise.
//! - **HTML**: strips scripts, navigation and comments, renders headings,
//!   lists, tables and links as Markdown and infers a top-level heading.
//! - **Output**: NFKC-normalized, trimmed, without byte order marks.

pub mod clean;
pub mod detect;
pub mod error;
pub mod html;
pub mod layout;
pub mod normalize;
pub mod options;
pub mod parser;

pub use clean::{Cleaner, CleanerRegistry, HtmlCleaner, MarkdownCleaner, PdfCleaner};
pub use detect::DocumentFormat;
pub use error::{Error, ErrorKind, Result};
pub use options::{CleanOptions, HtmlBackend, HtmlOptions, PdfOptions};
pub use parser::{LopdfBackend, PageWords, PdfBackend};

use std::path::Path;

/// Clean a file with default options, dispatching on its extension.
///
/// # Errors
///
/// `NotFound` for a missing input, `UnsupportedFormat` for an unknown
/// extension, `Parse` or `Io` when the document cannot be read.
pub fn clean_file<P: AsRef<Path>>(path: P) -> Result<String> {
    clean_file_with_options(path, &CleanOptions::default())
}

/// Clean a file with custom options.
///
/// # Example
///
/// ```no_run
/// use docmark::{clean_file_with_options, CleanOptions, PdfOptions};
///
/// let options = CleanOptions::new().with_pdf(PdfOptions::new().sequential());
/// let text = clean_file_with_options("report.pdf", &options).unwrap();
/// ```
pub fn clean_file_with_options<P: AsRef<Path>>(path: P, options: &CleanOptions) -> Result<String> {
    CleanerRegistry::with_options(options).clean(path.as_ref())
}

/// Convert an HTML string to Markdown.
///
/// ```
/// use docmark::{html_to_markdown, HtmlOptions};
///
/// let md = html_to_markdown("<h2>Steps</h2><ul><li>Run</li></ul>", &HtmlOptions::default());
/// assert_eq!(md, "## Steps\n\n- Run");
/// ```
pub fn html_to_markdown(html: &str, options: &HtmlOptions) -> String {
    HtmlCleaner::new(options.clone()).clean_str(html)
}
