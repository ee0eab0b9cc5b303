//! Top-level heading inference for rendered HTML.

use super::dom::DomTree;
use super::render::MarkdownRenderer;
use crate::normalize::strip_bom;

/// Separators between a page title and a site name.
const TITLE_DELIMITERS: &[char] = &['|', '｜'];

/// Characters trimmed from each title segment.
const SEGMENT_TRIM: &[char] = &[' ', '-', '—'];

/// Ensures output starts with a `#` heading taken from `<h1>` or `<title>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingInferencer;

impl HeadingInferencer {
    /// Heading text for the document: the first non-empty `<h1>`, else the
    /// first non-empty `<title>`, with any site-name suffix removed.
    pub fn heading_text<T: DomTree>(&self, renderer: &MarkdownRenderer, tree: &T) -> Option<String> {
        let root = tree.root();
        let first_text = |tag: &str| {
            tree.find_all(&root, &[tag], true)
                .iter()
                .map(|node| strip_bom(&renderer.inline_text(tree, node)))
                .find(|text| !text.is_empty())
        };

        let text = first_text("h1").or_else(|| first_text("title"))?;
        let text = trim_site_suffix(&text);
        (!text.is_empty()).then_some(text)
    }

    /// Apply the heading to compacted lines.
    ///
    /// Lines already starting with a heading are returned unchanged. A first
    /// line equal to the heading text is promoted in place; otherwise a new
    /// heading is inserted on top. A blank line always follows the heading.
    pub fn apply(&self, mut lines: Vec<String>, heading: &str) -> Vec<String> {
        let Some(first_index) = lines.iter().position(|l| !l.trim().is_empty()) else {
            return lines;
        };
        if lines[first_index].trim_start().starts_with('#') {
            return lines;
        }

        let first_line = strip_bom(lines[first_index].trim());
        let heading_index = if first_line == heading {
            lines[first_index] = format!("# {heading}");
            first_index
        } else {
            lines.insert(0, format!("# {heading}"));
            0
        };

        let next = heading_index + 1;
        if lines.get(next).map_or(true, |l| !l.is_empty()) {
            lines.insert(next, String::new());
        }
        lines
    }

    /// Infer and apply the heading in one step.
    pub fn ensure<T: DomTree>(&self, renderer: &MarkdownRenderer, tree: &T, lines: Vec<String>) -> Vec<String> {
        let first = lines.iter().find(|l| !l.trim().is_empty());
        if first.map_or(true, |l| l.trim_start().starts_with('#')) {
            return lines;
        }
        match self.heading_text(renderer, tree) {
            Some(heading) => self.apply(lines, &heading),
            None => lines,
        }
    }
}

/// Keep only the last non-empty segment of a delimited title.
///
/// `"Guide | Docs"` becomes `"Docs"`.
pub fn trim_site_suffix(text: &str) -> String {
    let mut heading = text.to_string();
    for delimiter in TITLE_DELIMITERS {
        if heading.contains(*delimiter) {
            let last = heading
                .split(*delimiter)
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.trim_matches(SEGMENT_TRIM))
                .last();
            if let Some(last) = last {
                heading = last.to_string();
            }
        }
    }
    heading
}
