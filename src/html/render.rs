//! DOM to Markdown block rendering.

use regex::Regex;

use super::dom::{DomTree, NodeKind};
use super::noise::is_noise_tag;
use crate::normalize::{push_blank, strip_bom};

/// Elements rendered only through their children.
const WRAPPER_TAGS: &[&str] = &["div", "section", "article", "main", "body"];

/// Structures skipped by inline collection and rendered as blocks instead.
const BLOCK_STRUCTURES: &[&str] = &["ul", "ol", "table"];

/// Narrowest separator cell, in dashes.
const MIN_SEPARATOR_WIDTH: usize = 3;

/// Render `label` pointing at `href` as a Markdown link.
///
/// Produces `[label](href)`, `<href>` for a missing or identical label, and
/// just the label when there is no href.
pub fn format_link(label: &str, href: &str) -> String {
    let label = strip_bom(label.trim());
    let url = href.trim();
    if url.is_empty() {
        label
    } else if label.is_empty() || label == url {
        format!("<{url}>")
    } else {
        format!("[{label}]({url})")
    }
}

/// Append a block, separated from preceding content by a blank line.
pub fn emit_block(lines: &mut Vec<String>, content: &str) {
    let content = strip_bom(content);
    let content = content.trim();
    if content.is_empty() {
        return;
    }
    push_blank(lines);
    lines.push(content.to_string());
}

fn heading_level(name: &str) -> Option<usize> {
    let level = name.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn is_wrapper(name: &str) -> bool {
    WRAPPER_TAGS.contains(&name) || name.starts_with("sr-")
}

/// Walks an element tree and emits Markdown lines.
///
/// Output lines may contain consecutive blanks; callers compact them.
pub struct MarkdownRenderer {
    horizontal_space: Regex,
    padded_newline: Regex,
    blank_runs: Regex,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            horizontal_space: Regex::new(r"[ \t\x0C\x0B]+").expect("valid whitespace pattern"),
            padded_newline: Regex::new(r" ?\n ?").expect("valid newline pattern"),
            blank_runs: Regex::new(r"\n{3,}").expect("valid blank run pattern"),
        }
    }

    /// Render the element children of `root`.
    pub fn render<T: DomTree>(&self, tree: &T, root: &T::Node) -> Vec<String> {
        let mut lines = Vec::new();
        self.render_children(tree, root, &mut lines, 0);
        lines
    }

    fn render_children<T: DomTree>(&self, tree: &T, parent: &T::Node, lines: &mut Vec<String>, indent: usize) {
        for child in tree.children(parent) {
            // Loose text between blocks is not rendered
            if let NodeKind::Element(name) = tree.kind(&child) {
                self.render_element(tree, &child, &name, lines, indent);
            }
        }
    }

    fn render_element<T: DomTree>(
        &self,
        tree: &T,
        node: &T::Node,
        name: &str,
        lines: &mut Vec<String>,
        indent: usize,
    ) {
        if let Some(level) = heading_level(name) {
            let content = self.inline_text(tree, node);
            if !content.is_empty() {
                emit_block(lines, &format!("{} {}", "#".repeat(level), content));
            }
            return;
        }

        match name {
            "p" | "pre" | "blockquote" => {
                let content = self.inline_text(tree, node);
                if content.is_empty() {
                    return;
                }
                let block = match name {
                    "pre" => format!("```\n{content}\n```"),
                    "blockquote" => content
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(|line| format!("> {line}"))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    _ => content,
                };
                emit_block(lines, &block);
            }
            "ul" | "ol" => self.render_list(tree, node, lines, indent, name == "ol"),
            "table" => {
                let table = self.render_table(tree, node);
                if !table.is_empty() {
                    emit_block(lines, &table.join("\n"));
                }
            }
            "br" => push_blank(lines),
            "a" => {
                let content = self.inline_text(tree, node);
                let href = tree.attr(node, "href").unwrap_or_default();
                if !content.is_empty() {
                    emit_block(lines, &format_link(&content, &href));
                } else if !href.trim().is_empty() {
                    emit_block(lines, &format_link(&href, &href));
                }
            }
            _ if is_wrapper(name) => self.render_children(tree, node, lines, indent),
            _ => {
                let content = self.inline_text(tree, node);
                if !content.is_empty() {
                    emit_block(lines, &content);
                }
                for nested in tree.find_all(node, BLOCK_STRUCTURES, false) {
                    if let Some(nested_name) = tree.tag_name(&nested) {
                        self.render_element(tree, &nested, &nested_name, lines, indent);
                    }
                }
            }
        }
    }

    fn render_list<T: DomTree>(
        &self,
        tree: &T,
        node: &T::Node,
        lines: &mut Vec<String>,
        indent: usize,
        ordered: bool,
    ) {
        let items = tree.find_all(node, &["li"], false);
        if items.is_empty() {
            return;
        }
        push_blank(lines);

        let mut counter: i64 = if ordered {
            tree.attr(node, "start")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(1)
        } else {
            1
        };
        let list_indent = "  ".repeat(indent);
        let continuation_indent = format!("{list_indent}  ");

        for item in &items {
            let marker = if ordered {
                format!("{counter}. ")
            } else {
                "- ".to_string()
            };
            let line_prefix = format!("{list_indent}{marker}");

            let content = self.inline_text(tree, item);
            let mut content_lines = content.split('\n');
            let first = content_lines.next().unwrap_or("").trim();
            if first.is_empty() {
                lines.push(line_prefix.trim_end().to_string());
            } else {
                lines.push(format!("{line_prefix}{first}"));
            }
            for continuation in content_lines.map(str::trim).filter(|c| !c.is_empty()) {
                lines.push(format!("{continuation_indent}{continuation}"));
            }

            for nested in tree.find_all(item, &["ul", "ol"], false) {
                let nested_ordered = tree.tag_name(&nested).as_deref() == Some("ol");
                self.render_list(tree, &nested, lines, indent + 1, nested_ordered);
            }
            if ordered {
                counter += 1;
            }
        }
        lines.push(String::new());
    }

    /// Render a table as pipe-delimited Markdown rows.
    ///
    /// The first row containing a `th` cell becomes the header; without one
    /// the first row is used.
    fn render_table<T: DomTree>(&self, tree: &T, node: &T::Node) -> Vec<String> {
        let mut header_rows: Vec<Vec<String>> = Vec::new();
        let mut body_rows: Vec<Vec<String>> = Vec::new();

        for row in tree.find_all(node, &["tr"], true) {
            let mut cells = Vec::new();
            let mut is_header = false;
            for cell in tree.find_all(&row, &["th", "td"], false) {
                cells.push(self.inline_text(tree, &cell));
                if tree.tag_name(&cell).as_deref() == Some("th") {
                    is_header = true;
                }
            }
            if cells.is_empty() {
                continue;
            }
            if is_header {
                header_rows.push(cells);
            } else {
                body_rows.push(cells);
            }
        }

        let header = match header_rows.into_iter().next() {
            Some(header) => header,
            None if !body_rows.is_empty() => body_rows.remove(0),
            None => return Vec::new(),
        };

        let mut rows: Vec<Vec<String>> = std::iter::once(header).chain(body_rows).collect();
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(column_count, String::new());
        }
        let widths: Vec<usize> = (0..column_count)
            .map(|idx| {
                rows.iter()
                    .map(|row| row[idx].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_row = |row: &[String]| {
            let padded: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            format!("| {} |", padded.join(" | "))
        };
        let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w.max(MIN_SEPARATOR_WIDTH))).collect();

        let mut table = Vec::with_capacity(rows.len() + 1);
        table.push(format_row(rows[0].as_slice()));
        table.push(format!("| {} |", separator.join(" | ")));
        for row in &rows[1..] {
            table.push(format_row(row.as_slice()));
        }
        table
    }

    /// Flattened, whitespace-normalized text of a node's inline content.
    ///
    /// Nested lists and tables are skipped, `br` becomes a newline and
    /// anchors are rendered as links.
    pub fn inline_text<T: DomTree>(&self, tree: &T, node: &T::Node) -> String {
        let mut parts = String::new();

        for child in tree.children(node) {
            match tree.kind(&child) {
                NodeKind::Text(text) => {
                    let text = strip_bom(&text.replace('\r', ""));
                    parts.push_str(&self.horizontal_space.replace_all(&text, " "));
                }
                NodeKind::Element(name) => {
                    if is_noise_tag(&name) || BLOCK_STRUCTURES.contains(&name.as_str()) {
                        continue;
                    }
                    match name.as_str() {
                        "br" => parts.push('\n'),
                        "a" => {
                            let label = self.inline_text(tree, &child);
                            let href = tree.attr(&child, "href").unwrap_or_default();
                            if !label.is_empty() {
                                parts.push_str(&format_link(&label, &href));
                            } else if !href.trim().is_empty() {
                                parts.push_str(&format_link(&href, &href));
                            }
                        }
                        _ => parts.push_str(&self.inline_text(tree, &child)),
                    }
                }
                _ => {}
            }
        }

        if parts.is_empty() {
            return parts;
        }
        let text = self.horizontal_space.replace_all(&parts, " ");
        let text = self.padded_newline.replace_all(&text, "\n");
        let text = self.blank_runs.replace_all(&text, "\n\n");
        strip_bom(&text).trim().to_string()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::SimpleTree;
    use crate::normalize::compact_lines;

    fn render(html: &str) -> Vec<String> {
        let tree = SimpleTree::parse(html);
        let root = tree.body().unwrap_or_else(|| tree.root());
        compact_lines(MarkdownRenderer::new().render(&tree, &root))
    }

    #[test]
    fn test_format_link() {
        assert_eq!(format_link("guide", "https://x"), "[guide](https://x)");
        assert_eq!(format_link("https://x", "https://x"), "<https://x>");
        assert_eq!(format_link("", "https://x"), "<https://x>");
        assert_eq!(format_link("plain", "  "), "plain");
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let lines = render("<body><h3>Title</h3><h2>  </h2><p>One\n   two</p><p>three</p></body>");
        assert_eq!(lines, vec!["### Title", "", "One\ntwo", "", "three"]);
    }

    #[test]
    fn test_pre_and_blockquote() {
        let lines = render("<body><pre>let x = 1;</pre><blockquote>a<br>b</blockquote></body>");
        assert_eq!(lines, vec!["```\nlet x = 1;\n```", "", "> a\n> b"]);
    }

    #[test]
    fn test_ordered_list_start_and_continuation() {
        let lines = render(r#"<body><ol start="4"><li>first<br>more</li><li>second</li></ol></body>"#);
        assert_eq!(lines, vec!["4. first", "  more", "5. second"]);
    }

    #[test]
    fn test_invalid_start_falls_back_to_one() {
        let lines = render(r#"<body><ol start="x"><li>a</li></ol></body>"#);
        assert_eq!(lines, vec!["1. a"]);
    }

    #[test]
    fn test_nested_list() {
        let lines = render("<body><ul><li>outer<ul><li>inner</li></ul></li><li>next</li></ul></body>");
        assert_eq!(lines, vec!["- outer", "", "  - inner", "", "- next"]);
    }

    #[test]
    fn test_empty_list_item() {
        let lines = render("<body><ul><li></li><li>x</li></ul></body>");
        assert_eq!(lines, vec!["-", "- x"]);
    }

    #[test]
    fn test_table_padding() {
        let lines = render(
            "<body><table><tr><th>Name</th><th>Qty</th></tr>\
             <tr><td>Apple</td><td>3</td></tr><tr><td>Fig</td></tr></table></body>",
        );
        assert_eq!(
            lines,
            vec!["| Name  | Qty |\n| ----- | --- |\n| Apple | 3   |\n| Fig   |     |"]
        );
    }

    #[test]
    fn test_table_without_header_uses_first_row() {
        let lines = render("<body><table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table></body>");
        assert_eq!(lines, vec!["| a | b |\n| --- | --- |\n| c | d |"]);
    }

    #[test]
    fn test_wrappers_and_unknown_tags() {
        let lines = render(
            "<body><div><section><sr-card><p>deep</p></sr-card></section></div>\
             <figure>caption<ul><li>item</li></ul></figure></body>",
        );
        assert_eq!(lines, vec!["deep", "", "caption", "", "- item"]);
    }

    #[test]
    fn test_loose_text_in_wrapper_is_skipped() {
        let lines = render("<body><div>loose<p>kept</p></div></body>");
        assert_eq!(lines, vec!["kept"]);
    }

    #[test]
    fn test_block_anchor_and_br() {
        let lines = render(r#"<body><a href="https://x">https://x</a><br><br><a>bare</a></body>"#);
        assert_eq!(lines, vec!["<https://x>", "", "bare"]);
    }

    #[test]
    fn test_inline_text_normalization() {
        let tree = SimpleTree::parse("<p>\u{feff}Hello \t <b>bold</b>\r\n world <a href='/u'>link</a><script>x</script></p>");
        let p = tree.find_all(&tree.root(), &["p"], true).remove(0);
        let text = MarkdownRenderer::new().inline_text(&tree, &p);
        assert_eq!(text, "Hello bold\nworld [link](/u)");
    }
}
