//! Positioned word tokens and header/footer band filtering.

use crate::options::PdfOptions;

/// A positioned text token with font metadata.
///
/// Coordinates are in PDF points with the origin at the top-left corner of
/// the page, so `top < bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Token text, without surrounding whitespace
    pub text: String,
    /// Distance from the page top to the glyph top
    pub top: f64,
    /// Distance from the page top to the glyph bottom
    pub bottom: f64,
    /// Left edge
    pub x0: f64,
    /// Right edge
    pub x1: f64,
    /// Font size in points
    pub font_size: f64,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl Word {
    /// Create a new word. The text is trimmed.
    pub fn new(
        text: impl Into<String>,
        top: f64,
        bottom: f64,
        x0: f64,
        x1: f64,
        font_size: f64,
        font_name: impl Into<String>,
    ) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim().to_string(),
            top,
            bottom,
            x0,
            x1,
            font_size,
            font_name: font_name.into(),
        }
    }

    /// Horizontal midpoint.
    pub fn mid_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Glyph box height, or `None` for inverted boxes.
    pub fn height(&self) -> Option<f64> {
        (self.bottom >= self.top).then(|| self.bottom - self.top)
    }

    /// Whether the font name carries a bold marker.
    pub fn is_bold(&self) -> bool {
        self.font_name.to_lowercase().contains("bold")
    }

    /// Whether this word marks its line as a heading.
    pub fn is_heading_candidate(&self, baseline_size: f64, size_multiplier: f64) -> bool {
        if self.text.is_empty() {
            return false;
        }
        let larger_font = baseline_size > 0.0 && self.font_size >= baseline_size * size_multiplier;
        larger_font || self.is_bold()
    }
}

/// Drop empty words and words inside the header or footer band.
pub fn filter_words(words: Vec<Word>, page_height: f64, options: &PdfOptions) -> Vec<Word> {
    let header_cutoff = page_height * options.header_ratio;
    let footer_cutoff = page_height * options.footer_ratio;

    words
        .into_iter()
        .filter(|w| !w.text.is_empty())
        .filter(|w| w.top >= header_cutoff && w.bottom <= footer_cutoff)
        .collect()
}
