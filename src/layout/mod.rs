//! PDF layout reconstruction.
//!
//! Turns one page's positioned words into ordered, heading-annotated,
//! column-aware Markdown text. Every stage is a pure function over word and
//! line lists, so the thresholds can be exercised without a PDF fixture:
//!
//! 1. [`filter_words`] drops the header and footer bands.
//! 2. [`group_lines`] clusters words by vertical position.
//! 3. [`split_line_segments`] and [`order_columns`] restore column order.
//! 4. [`HeadingClassifier`] marks headings.
//! 5. [`LineMerger`] joins wrapped fragments and removes noise.

mod column;
mod heading;
mod line;
mod merge;
mod word;

pub use column::{detect_column_boundary, order_columns, segment_gap_threshold, split_line_segments, Column};
pub use heading::{HeadingClassifier, HEADING_PREFIX};
pub use line::{baseline_font_size, group_lines, median, paragraph_gap, Line};
pub use merge::LineMerger;
pub use word::{filter_words, Word};

use crate::options::PdfOptions;

/// Page layout pipeline with fixed options.
///
/// Holds no per-page state, so one instance can lay out pages from several
/// threads.
pub struct PageLayout {
    options: PdfOptions,
    merger: LineMerger,
}

impl PageLayout {
    pub fn new(options: PdfOptions) -> Self {
        Self {
            options,
            merger: LineMerger::new(),
        }
    }

    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    /// Lay out one page.
    ///
    /// Returns `None` when no word survives band filtering, so the caller
    /// can fall back to the page's plain text.
    pub fn layout(&self, words: Vec<Word>, page_width: f64, page_height: f64) -> Option<String> {
        let words = filter_words(words, page_height, &self.options);
        if words.is_empty() {
            return None;
        }

        let baseline = baseline_font_size(&words);
        let gap = paragraph_gap(&words, &self.options);
        let lines = group_lines(words);
        let lines = split_line_segments(lines, baseline, page_width, &self.options);
        let columns = order_columns(lines, page_width, &self.options);
        log::debug!(
            "Page laid out in {} column(s), baseline size {:.1}",
            columns.len(),
            baseline
        );

        let classifier = HeadingClassifier::new(baseline, self.options.heading_size_multiplier);
        Some(self.merger.assemble_page(&columns, &classifier, gap))
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new(PdfOptions::default())
    }
}
