//! Column detection and reading-order recovery.
//!
//! Two passes run over the assembled lines. The first splits a line whose
//! words are separated by a gutter-sized gap, since two column fragments
//! often share a vertical position. The second groups whole lines into a
//! left and a right column using the widest gap between line centroids.
//! The partition is binary: pages with three or more columns are ordered as
//! if the widest gutter were the only one.

use super::line::Line;
use crate::options::PdfOptions;

/// Lines sharing a horizontal region of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Average line centroid
    pub centroid: f64,
    /// Lines ordered by top, then leading `x0`
    pub lines: Vec<Line>,
}

/// Horizontal gap between consecutive words that splits a line.
pub fn segment_gap_threshold(baseline_size: f64, page_width: f64, options: &PdfOptions) -> f64 {
    let gap_threshold = (baseline_size * options.column_gap_multiplier).max(options.min_column_gap);
    let width_threshold =
        (page_width * options.column_segment_ratio).min(options.max_column_segment_threshold);
    gap_threshold.max(width_threshold)
}

/// Split lines at gutter-sized word gaps.
///
/// The resulting segments keep the line's vertical position and are
/// ordered by top, then leading `x0`.
pub fn split_line_segments(
    lines: Vec<Line>,
    baseline_size: f64,
    page_width: f64,
    options: &PdfOptions,
) -> Vec<Line> {
    let threshold = segment_gap_threshold(baseline_size, page_width, options);
    let mut segments: Vec<Line> = Vec::new();

    for line in lines {
        let top = line.top;
        let mut words = line.words.into_iter();
        let Some(first) = words.next() else {
            continue;
        };

        let mut previous_x1 = first.x1;
        let mut current = vec![first];
        for word in words {
            let gap = word.x0 - previous_x1;
            previous_x1 = word.x1;
            if gap > threshold {
                segments.push(Line::new(top, std::mem::take(&mut current)));
            }
            current.push(word);
        }
        segments.push(Line::new(top, current));
    }

    sort_reading_order(&mut segments);
    segments
}

/// Boundary between the left and right column, if the page has two.
///
/// The boundary is the midpoint of the widest gap between distinct line
/// centroids, provided that gap exceeds the split threshold.
pub fn detect_column_boundary(centroids: &[f64], page_width: f64, options: &PdfOptions) -> Option<f64> {
    let mut unique: Vec<f64> = centroids.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup();
    if unique.len() < 2 {
        return None;
    }

    let mut max_gap = 0.0;
    let mut boundary = None;
    for pair in unique.windows(2) {
        let gap = pair[1] - pair[0];
        if gap > max_gap {
            max_gap = gap;
            boundary = Some((pair[0] + pair[1]) / 2.0);
        }
    }

    let min_required = options
        .min_column_split_gap
        .max(page_width * options.column_split_ratio);
    if max_gap > min_required {
        boundary
    } else {
        None
    }
}

/// Group lines into reading-order columns, left to right.
pub fn order_columns(lines: Vec<Line>, page_width: f64, options: &PdfOptions) -> Vec<Column> {
    if lines.is_empty() {
        return Vec::new();
    }

    let centroids: Vec<f64> = lines.iter().map(Line::centroid).collect();
    let Some(boundary) = detect_column_boundary(&centroids, page_width, options) else {
        let mut lines = lines;
        lines.sort_by(|a, b| a.top.total_cmp(&b.top));
        let centroid = mean(&centroids);
        return vec![Column { centroid, lines }];
    };

    log::debug!("Column boundary at x={:.1}", boundary);

    let mut left = (Vec::new(), Vec::new());
    let mut right = (Vec::new(), Vec::new());
    for (line, centroid) in lines.into_iter().zip(centroids) {
        let side = if centroid <= boundary { &mut left } else { &mut right };
        side.0.push(line);
        side.1.push(centroid);
    }

    let mut columns: Vec<Column> = [left, right]
        .into_iter()
        .filter(|(lines, _)| !lines.is_empty())
        .map(|(mut lines, centroids)| {
            sort_reading_order(&mut lines);
            Column {
                centroid: mean(&centroids),
                lines,
            }
        })
        .collect();
    columns.sort_by(|a, b| a.centroid.total_cmp(&b.centroid));
    columns
}

fn sort_reading_order(lines: &mut [Line]) {
    lines.sort_by(|a, b| {
        a.top
            .total_cmp(&b.top)
            .then_with(|| a.leading_x0().total_cmp(&b.leading_x0()))
    });
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::word::Word;

    fn word(text: &str, top: f64, x0: f64, x1: f64) -> Word {
        Word::new(text, top, top + 10.0, x0, x1, 10.0, "Helvetica")
    }

    #[test]
    fn test_segment_threshold() {
        let opts = PdfOptions::default();
        // max(40, min(612 * 0.12, 110)) = 73.44
        assert!((segment_gap_threshold(10.0, 612.0, &opts) - 73.44).abs() < 1e-9);
        // Large baseline dominates
        assert_eq!(segment_gap_threshold(30.0, 612.0, &opts), 120.0);
        // Wide page is capped at 110
        assert_eq!(segment_gap_threshold(10.0, 2000.0, &opts), 110.0);
    }

    #[test]
    fn test_split_line_at_gutter() {
        let line = Line::new(
            100.0,
            vec![
                word("left", 100.0, 50.0, 80.0),
                word("side", 100.0, 85.0, 110.0),
                word("right", 100.0, 350.0, 380.0),
            ],
        );
        let segments = split_line_segments(vec![line], 10.0, 612.0, &PdfOptions::default());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text(), "left side");
        assert_eq!(segments[1].text(), "right");
        assert_eq!(segments[1].top, 100.0);
    }

    #[test]
    fn test_no_split_for_normal_spacing() {
        let line = Line::new(
            100.0,
            vec![word("a", 100.0, 50.0, 60.0), word("b", 100.0, 65.0, 75.0)],
        );
        let segments = split_line_segments(vec![line], 10.0, 612.0, &PdfOptions::default());
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_boundary_requires_wide_gap() {
        let opts = PdfOptions::default();
        assert_eq!(detect_column_boundary(&[100.0, 100.0], 612.0, &opts), None);
        assert_eq!(detect_column_boundary(&[100.0, 200.0], 612.0, &opts), None);
        assert_eq!(
            detect_column_boundary(&[100.0, 110.0, 400.0, 420.0], 612.0, &opts),
            Some(255.0)
        );
    }

    #[test]
    fn test_boundary_scales_with_page_width() {
        let opts = PdfOptions::default();
        // 1000 * 0.18 = 180 > 150
        assert_eq!(detect_column_boundary(&[100.0, 250.0], 1000.0, &opts), None);
    }

    #[test]
    fn test_order_two_columns() {
        let lines = vec![
            Line::new(100.0, vec![word("L1", 100.0, 50.0, 150.0)]),
            Line::new(100.0, vec![word("R1", 100.0, 350.0, 450.0)]),
            Line::new(120.0, vec![word("L2", 120.0, 50.0, 150.0)]),
            Line::new(120.0, vec![word("R2", 120.0, 350.0, 450.0)]),
        ];
        let columns = order_columns(lines, 600.0, &PdfOptions::default());
        assert_eq!(columns.len(), 2);
        let left: Vec<String> = columns[0].lines.iter().map(Line::text).collect();
        let right: Vec<String> = columns[1].lines.iter().map(Line::text).collect();
        assert_eq!(left, vec!["L1", "L2"]);
        assert_eq!(right, vec!["R1", "R2"]);
        assert!(columns[0].centroid < columns[1].centroid);
    }

    #[test]
    fn test_single_column_sorted_by_top() {
        let lines = vec![
            Line::new(200.0, vec![word("b", 200.0, 50.0, 150.0)]),
            Line::new(100.0, vec![word("a", 100.0, 60.0, 160.0)]),
        ];
        let columns = order_columns(lines, 600.0, &PdfOptions::default());
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].lines[0].text(), "a");
    }

    #[test]
    fn test_ordering_is_stable() {
        let build = || {
            vec![
                Line::new(100.0, vec![word("x", 100.0, 50.0, 150.0)]),
                Line::new(100.0, vec![word("y", 100.0, 50.0, 150.0)]),
                Line::new(100.0, vec![word("z", 100.0, 400.0, 500.0)]),
            ]
        };
        let first = order_columns(build(), 600.0, &PdfOptions::default());
        let second = order_columns(build(), 600.0, &PdfOptions::default());
        assert_eq!(first, second);
        assert_eq!(first[0].lines[0].text(), "x");
        assert_eq!(first[0].lines[1].text(), "y");
    }
}
