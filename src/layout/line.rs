//! Line assembly and page-level font statistics.

use std::collections::BTreeMap;

use super::word::Word;
use crate::options::PdfOptions;

/// Words sharing a vertical position, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Vertical position (rounded word top)
    pub top: f64,
    /// Words sorted by `x0`
    pub words: Vec<Word>,
}

impl Line {
    /// Create a line, sorting the words by their left edge.
    pub fn new(top: f64, mut words: Vec<Word>) -> Self {
        words.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        Self { top, words }
    }

    /// Left edge of the first word.
    pub fn leading_x0(&self) -> f64 {
        self.words.first().map(|w| w.x0).unwrap_or(0.0)
    }

    /// Median of the word midpoints.
    pub fn centroid(&self) -> f64 {
        median(self.words.iter().map(Word::mid_x)).unwrap_or(0.0)
    }

    /// Space-joined word text.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Median of the values, averaging the two middle values for even counts.
pub fn median<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Body text font size: the median of all positive word sizes, 0 if none.
pub fn baseline_font_size(words: &[Word]) -> f64 {
    median(words.iter().map(|w| w.font_size).filter(|s| *s > 0.0)).unwrap_or(0.0)
}

/// Vertical gap above which consecutive lines start a new paragraph.
pub fn paragraph_gap(words: &[Word], options: &PdfOptions) -> f64 {
    match median(words.iter().filter_map(Word::height)) {
        Some(height) => height * options.paragraph_gap_multiplier,
        None => options.fallback_line_gap,
    }
}

/// Group words into lines by their top rounded to 0.1pt, ordered top-down.
pub fn group_lines(words: Vec<Word>) -> Vec<Line> {
    let mut buckets: BTreeMap<i64, Vec<Word>> = BTreeMap::new();
    for word in words {
        let key = (word.top * 10.0).round() as i64;
        buckets.entry(key).or_default().push(word);
    }

    buckets
        .into_iter()
        .map(|(key, words)| Line::new(key as f64 / 10.0, words))
        .collect()
}
