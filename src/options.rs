//! Cleaning options and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Thresholds for PDF layout reconstruction.
///
/// Ratios are relative to the page size, gaps are in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    /// Words whose top lies above `height * header_ratio` are dropped
    pub header_ratio: f64,

    /// Words whose bottom lies below `height * footer_ratio` are dropped
    pub footer_ratio: f64,

    /// Font size ratio against the page baseline that marks a heading
    pub heading_size_multiplier: f64,

    /// Multiplier of the baseline size for the intra-line split gap
    pub column_gap_multiplier: f64,

    /// Lower bound for the intra-line split gap
    pub min_column_gap: f64,

    /// Page width ratio for the column boundary gap
    pub column_split_ratio: f64,

    /// Lower bound for the column boundary gap
    pub min_column_split_gap: f64,

    /// Page width ratio for the intra-line split gap
    pub column_segment_ratio: f64,

    /// Upper bound for the width-derived intra-line split gap
    pub max_column_segment_threshold: f64,

    /// Multiplier of the median word height that marks a paragraph break
    pub paragraph_gap_multiplier: f64,

    /// Paragraph break threshold used when no word height is known
    pub fallback_line_gap: f64,

    /// Lay out pages in parallel
    pub parallel: bool,
}

impl PdfOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header and footer band ratios.
    pub fn with_bands(mut self, header_ratio: f64, footer_ratio: f64) -> Self {
        self.header_ratio = header_ratio;
        self.footer_ratio = footer_ratio;
        self
    }

    /// Set the heading size multiplier.
    pub fn with_heading_multiplier(mut self, multiplier: f64) -> Self {
        self.heading_size_multiplier = multiplier;
        self
    }

    /// Enable or disable parallel page layout.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page layout.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            header_ratio: 0.1,
            footer_ratio: 0.9,
            heading_size_multiplier: 1.2,
            column_gap_multiplier: 4.0,
            min_column_gap: 40.0,
            column_split_ratio: 0.18,
            min_column_split_gap: 120.0,
            column_segment_ratio: 0.12,
            max_column_segment_threshold: 110.0,
            paragraph_gap_multiplier: 2.0,
            fallback_line_gap: 12.0,
            parallel: true,
        }
    }
}

/// Which DOM implementation parses HTML input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlBackend {
    /// html5ever-backed tree (requires the `full-html` feature)
    #[default]
    Full,
    /// Built-in minimal parser
    Minimal,
}

impl HtmlBackend {
    /// Resolve to a backend compiled into this build.
    pub fn resolve(self) -> Self {
        if cfg!(feature = "full-html") {
            self
        } else {
            HtmlBackend::Minimal
        }
    }
}

/// Options for HTML cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// DOM backend
    pub backend: HtmlBackend,
}

impl HtmlOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the DOM backend.
    pub fn with_backend(mut self, backend: HtmlBackend) -> Self {
        self.backend = backend;
        self
    }
}

/// Options for every cleaner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// PDF layout options
    pub pdf: PdfOptions,

    /// HTML options
    pub html: HtmlOptions,
}

impl CleanOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set PDF options.
    pub fn with_pdf(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    /// Set HTML options.
    pub fn with_html(mut self, html: HtmlOptions) -> Self {
        self.html = html;
        self
    }

    /// Decode options from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
