//! Cleaners turn a source document into normalized Markdown text.
//!
//! Each format has a [`Cleaner`]; [`CleanerRegistry`] dispatches on the file
//! extension.
//!
//! # Example
//!
//! ```no_run
//! use docmark::clean::CleanerRegistry;
//! use std::path::Path;
//!
//! fn main() -> docmark::Result<()> {
//!     let registry = CleanerRegistry::with_defaults();
//!     let text = registry.clean(Path::new("report.pdf"))?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod html;
mod markdown;
mod pdf;

pub use html::HtmlCleaner;
pub use markdown::MarkdownCleaner;
pub use pdf::PdfCleaner;

use crate::error::{Error, Result};
use crate::options::CleanOptions;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Converts one document format to normalized Markdown.
pub trait Cleaner: Send + Sync {
    /// Short lowercase name, e.g. `"pdf"`.
    fn name(&self) -> &str;

    /// Lowercase extensions without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Clean the file at `path`.
    ///
    /// The result is NFKC-normalized, trimmed and free of byte order marks.
    fn clean(&self, path: &Path) -> Result<String>;

    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Extension to cleaner dispatch.
pub struct CleanerRegistry {
    cleaners: HashMap<String, Arc<dyn Cleaner>>,
    by_name: HashMap<String, Arc<dyn Cleaner>>,
}

impl CleanerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            cleaners: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry with the PDF, HTML and Markdown cleaners.
    pub fn with_defaults() -> Self {
        Self::with_options(&CleanOptions::default())
    }

    /// Registry with the default cleaners configured from `options`.
    pub fn with_options(options: &CleanOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfCleaner::new(options.pdf.clone())));
        registry.register(Arc::new(HtmlCleaner::new(options.html.clone())));
        registry.register(Arc::new(MarkdownCleaner::new()));
        registry
    }

    /// Register a cleaner for all its extensions, replacing earlier ones.
    pub fn register(&mut self, cleaner: Arc<dyn Cleaner>) {
        for ext in cleaner.supported_extensions() {
            self.cleaners.insert(ext.to_lowercase(), cleaner.clone());
        }
        self.by_name.insert(cleaner.name().to_lowercase(), cleaner);
    }

    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Cleaner>> {
        self.cleaners.get(&ext.to_lowercase()).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Cleaner>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    pub fn supports(&self, ext: &str) -> bool {
        self.cleaners.contains_key(&ext.to_lowercase())
    }

    /// Registered extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.cleaners.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    /// Clean a file with the cleaner registered for its extension.
    pub fn clean(&self, path: &Path) -> Result<String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let Some(cleaner) = self.get_by_extension(&ext) else {
            log::error!("No cleaner registered for {}", path.display());
            let shown = if ext.is_empty() { "(none)".to_string() } else { format!(".{ext}") };
            return Err(Error::UnsupportedFormat(shown));
        };

        log::info!("Cleaning {} with the {} cleaner", path.display(), cleaner.name());
        cleaner.clean(path)
    }
}

impl Default for CleanerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Error for a missing input, logged before it is returned.
pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        log::error!("File not found: {}", path.display());
        Err(Error::NotFound(path.to_path_buf()))
    }
}
