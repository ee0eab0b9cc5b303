//! Heading detection from font size and weight.

use super::line::Line;

/// Prefix written in front of detected heading lines.
pub const HEADING_PREFIX: &str = "## ";

/// Flags lines as headings relative to the page baseline font size.
#[derive(Debug, Clone, Copy)]
pub struct HeadingClassifier {
    baseline_size: f64,
    size_multiplier: f64,
}

impl HeadingClassifier {
    pub fn new(baseline_size: f64, size_multiplier: f64) -> Self {
        Self {
            baseline_size,
            size_multiplier,
        }
    }

    /// A line is a heading when any of its words is a heading candidate.
    pub fn is_heading(&self, line: &Line) -> bool {
        line.words
            .iter()
            .any(|w| w.is_heading_candidate(self.baseline_size, self.size_multiplier))
    }

    /// Render a line's text, prefixing headings with `## `.
    ///
    /// Any `#` or space characters already leading a heading are replaced by
    /// the prefix.
    pub fn render(&self, line: &Line) -> String {
        let text = line.text();
        if text.is_empty() {
            return text;
        }
        if self.is_heading(line) {
            let stripped = text.trim_start_matches(['#', ' ']);
            return format!("{HEADING_PREFIX}{stripped}").trim().to_string();
        }
        text
    }
}
