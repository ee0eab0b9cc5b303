//! Text normalization shared by the cleaners.

use unicode_normalization::UnicodeNormalization;

const BOM: char = '\u{FEFF}';

/// Remove every byte-order mark from the text.
pub fn strip_bom(text: &str) -> String {
    text.replace(BOM, "")
}

/// NFKC-normalize and trim the final document text.
pub fn finalize(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}

/// Collapse runs of blank lines to one and drop leading/trailing blanks.
///
/// Lines are right-trimmed and stripped of BOMs first.
pub fn compact_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for raw in lines {
        let line = strip_bom(raw.as_ref()).trim_end().to_string();
        if line.is_empty() {
            if !previous_blank {
                result.push(String::new());
            }
            previous_blank = true;
        } else {
            result.push(line);
            previous_blank = false;
        }
    }

    while result.last().is_some_and(|l| l.is_empty()) {
        result.pop();
    }
    result
}

/// Append a blank separator unless the last line is already blank.
///
/// Nothing is appended to an empty list.
pub fn push_blank(lines: &mut Vec<String>) {
    if lines.last().is_some_and(|l| !l.is_empty()) {
        lines.push(String::new());
    }
}
