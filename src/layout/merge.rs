//! Sentence-fragment merging, paragraph breaks and noise suppression.
//!
//! Terminator and bullet sets are tuned for mixed Chinese/English prose.

use regex::Regex;

use super::column::Column;
use super::heading::{HeadingClassifier, HEADING_PREFIX};
use crate::normalize::push_blank;

/// Characters that end a sentence; a line ending in one is never continued.
const TERMINATORS: &[char] = &['。', '！', '?', '？', '!', '；', ';', '：', ':', '.', '…'];

/// Characters that open a bullet item.
const BULLET_PREFIXES: &[char] = &['-', '*', '•', '●', '·'];

/// Line-level noise detection and merge decisions.
pub struct LineMerger {
    numeric_noise: Regex,
    stray_letter: Regex,
    list_prefix: Regex,
}

impl LineMerger {
    pub fn new() -> Self {
        Self {
            numeric_noise: Regex::new(r"^[0-9\s]+$").expect("valid numeric noise pattern"),
            stray_letter: Regex::new(r"^[A-Z]\.?$").expect("valid stray letter pattern"),
            list_prefix: Regex::new(r"(?i)^(?:\d+[).]|[ivxlcdm]+\.)").expect("valid list pattern"),
        }
    }

    /// Whether a line carries no content: blank, page numbers, or a stray
    /// capital letter left over from running headers.
    pub fn is_noise(&self, text: &str) -> bool {
        let stripped = text.trim();
        stripped.is_empty()
            || self.numeric_noise.is_match(stripped)
            || self.stray_letter.is_match(stripped)
    }

    /// Whether the text opens a bullet or numbered list item.
    pub fn starts_with_bullet(&self, text: &str) -> bool {
        let stripped = text.trim_start();
        if stripped.is_empty() {
            return false;
        }
        stripped.starts_with(BULLET_PREFIXES) || self.list_prefix.is_match(stripped)
    }

    /// Whether `current` continues the sentence of `previous`.
    pub fn should_merge(&self, previous: &str, current: &str) -> bool {
        if previous.starts_with(HEADING_PREFIX) || current.starts_with(HEADING_PREFIX) {
            return false;
        }
        match previous.chars().last() {
            None => return false,
            Some(c) if TERMINATORS.contains(&c) || c.is_numeric() => return false,
            Some(_) => {}
        }
        !self.starts_with_bullet(current)
    }

    /// Append a line, merging it into the previous one when it continues a
    /// sentence. Noise lines are dropped.
    pub fn push(&self, lines: &mut Vec<String>, text: &str) {
        if self.is_noise(text) {
            return;
        }
        match lines.last_mut() {
            Some(previous) if !previous.is_empty() && self.should_merge(previous, text) => {
                previous.push(' ');
                previous.push_str(text);
            }
            _ => lines.push(text.to_string()),
        }
    }

    /// Render ordered columns into the page's Markdown text.
    ///
    /// A blank line separates paragraphs (vertical gap above
    /// `paragraph_gap`, except right after a heading) and columns.
    pub fn assemble_page(
        &self,
        columns: &[Column],
        classifier: &HeadingClassifier,
        paragraph_gap: f64,
    ) -> String {
        let mut assembled: Vec<String> = Vec::new();

        for (idx, column) in columns.iter().enumerate() {
            let mut output: Vec<String> = Vec::new();
            let mut previous_top: Option<f64> = None;

            for line in &column.lines {
                if previous_top.is_some_and(|top| line.top - top > paragraph_gap) {
                    let after_heading = last_non_empty(&output)
                        .map_or(true, |last| last.starts_with(HEADING_PREFIX));
                    if !after_heading {
                        push_blank(&mut output);
                    }
                }
                let text = classifier.render(line);
                self.push(&mut output, &text);
                if !text.is_empty() {
                    previous_top = Some(line.top);
                }
            }

            let column_has_content = !output.is_empty();
            assembled.extend(output);
            if idx + 1 < columns.len() && column_has_content {
                push_blank(&mut assembled);
            }
        }

        assembled.join("\n").trim().to_string()
    }
}

impl Default for LineMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn last_non_empty(lines: &[String]) -> Option<&str> {
    lines.iter().rev().find(|l| !l.is_empty()).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_lines() {
        let merger = LineMerger::new();
        assert!(merger.is_noise(""));
        assert!(merger.is_noise("   "));
        assert!(merger.is_noise("12"));
        assert!(merger.is_noise("1 2 3"));
        assert!(merger.is_noise("A"));
        assert!(merger.is_noise("B."));
        assert!(!merger.is_noise("a"));
        assert!(!merger.is_noise("AB"));
        assert!(!merger.is_noise("正常文本"));
        assert!(!merger.is_noise("Page 3"));
    }

    #[test]
    fn test_bullets() {
        let merger = LineMerger::new();
        assert!(merger.starts_with_bullet("- item"));
        assert!(merger.starts_with_bullet("  • item"));
        assert!(merger.starts_with_bullet("1. first"));
        assert!(merger.starts_with_bullet("2) second"));
        assert!(merger.starts_with_bullet("iv. fourth"));
        assert!(merger.starts_with_bullet("IV. fourth"));
        assert!(!merger.starts_with_bullet("continued text"));
        assert!(!merger.starts_with_bullet(""));
    }

    #[test]
    fn test_merge_decisions() {
        let merger = LineMerger::new();
        assert!(merger.should_merge("The quick brown", "fox jumps"));
        assert!(!merger.should_merge("A full sentence.", "Next one"));
        assert!(!merger.should_merge("中文句子。", "下一句"));
        assert!(!merger.should_merge("Question?", "Answer"));
        assert!(!merger.should_merge("Total 42", "items"));
        assert!(!merger.should_merge("Steps", "- install"));
        assert!(!merger.should_merge("## Title", "body"));
        assert!(!merger.should_merge("body", "## Title"));
    }

    #[test]
    fn test_push_merges_and_filters() {
        let merger = LineMerger::new();
        let mut lines = Vec::new();
        merger.push(&mut lines, "The quick brown");
        merger.push(&mut lines, "42");
        merger.push(&mut lines, "fox jumps.");
        merger.push(&mut lines, "Next");
        assert_eq!(lines, vec!["The quick brown fox jumps.", "Next"]);
    }

    #[test]
    fn test_push_does_not_merge_across_blank() {
        let merger = LineMerger::new();
        let mut lines = vec!["first part".to_string(), String::new()];
        merger.push(&mut lines, "second");
        assert_eq!(lines, vec!["first part", "", "second"]);
    }
}
