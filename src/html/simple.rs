//! Minimal HTML parser used when the full parser is not compiled in.
//!
//! Builds a loose tree: no implied elements, no foster parenting. An end
//! tag closes the nearest open element with the same name and everything
//! opened after it; an end tag with no open match is ignored.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::dom::{DomTree, NodeKind};

/// Elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub type NodeRef = Rc<RefCell<SimpleNode>>;

#[derive(Debug)]
enum NodeData {
    Document,
    Element { name: String, attrs: Vec<(String, String)> },
    Text(String),
    Comment,
}

/// Node of a [`SimpleTree`].
///
/// Children are owned; the parent link is weak and only used by detach.
#[derive(Debug)]
pub struct SimpleNode {
    data: NodeData,
    children: Vec<NodeRef>,
    parent: Weak<RefCell<SimpleNode>>,
}

impl SimpleNode {
    fn new_ref(data: NodeData) -> NodeRef {
        Rc::new(RefCell::new(SimpleNode {
            data,
            children: Vec::new(),
            parent: Weak::new(),
        }))
    }

    fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn append_child(parent: &NodeRef, child: NodeRef) {
    child.borrow_mut().parent = Rc::downgrade(parent);
    parent.borrow_mut().children.push(child);
}

/// Tree produced by the minimal parser.
pub struct SimpleTree {
    root: NodeRef,
    body: Option<NodeRef>,
}

impl SimpleTree {
    /// Parse an HTML string. Never fails; malformed markup becomes text.
    pub fn parse(source: &str) -> Self {
        let root = SimpleNode::new_ref(NodeData::Document);
        let mut body = None;
        let mut stack: Vec<NodeRef> = vec![root.clone()];
        let bytes = source.as_bytes();
        let len = bytes.len();
        let mut pos = 0;

        while pos < len {
            let rest = &source[pos..];
            let Some(current) = stack.last().cloned() else {
                break;
            };

            if rest.starts_with("<!--") {
                let end = rest[4..].find("-->").map_or(len, |i| pos + 4 + i + 3);
                append_child(&current, SimpleNode::new_ref(NodeData::Comment));
                pos = end;
                continue;
            }

            if rest.starts_with("<!") || rest.starts_with("<?") {
                pos = rest.find('>').map_or(len, |i| pos + i + 1);
                continue;
            }

            if rest.starts_with("</") {
                if let Some(close) = rest.find('>') {
                    let name = rest[2..close]
                        .split_ascii_whitespace()
                        .next()
                        .unwrap_or("")
                        .to_ascii_lowercase();
                    close_element(&mut stack, &name);
                    pos += close + 1;
                    continue;
                }
            }

            if bytes[pos] == b'<' && bytes.get(pos + 1).is_some_and(u8::is_ascii_alphabetic) {
                if let Some(tag) = parse_start_tag(source, pos) {
                    let is_body = tag.name == "body";
                    let is_void = VOID_ELEMENTS.contains(&tag.name.as_str());
                    let is_raw = RAW_TEXT_ELEMENTS.contains(&tag.name.as_str());
                    let name = tag.name.clone();

                    let node = SimpleNode::new_ref(NodeData::Element {
                        name: tag.name,
                        attrs: tag.attrs,
                    });
                    append_child(&current, node.clone());
                    if is_body {
                        body = Some(node.clone());
                    }
                    pos = tag.end;

                    if tag.self_closing || is_void {
                        continue;
                    }
                    if is_raw {
                        let (text, next) = raw_text(source, pos, &name);
                        if !text.is_empty() {
                            append_child(&node, SimpleNode::new_ref(NodeData::Text(text.to_string())));
                        }
                        pos = next;
                        continue;
                    }
                    stack.push(node);
                    continue;
                }
            }

            // Text up to the next '<' (a stray '<' is kept as text)
            let skip = source[pos..].chars().next().map_or(1, char::len_utf8);
            let next = source[pos + skip..].find('<').map_or(len, |i| pos + skip + i);
            let text = decode_entities(&source[pos..next]);
            if !text.is_empty() {
                append_child(&current, SimpleNode::new_ref(NodeData::Text(text)));
            }
            pos = next;
        }

        Self { root, body }
    }
}

/// Close the innermost open element named `name`, never the document.
fn close_element(stack: &mut Vec<NodeRef>, name: &str) {
    for index in (1..stack.len()).rev() {
        if stack[index].borrow().name() == Some(name) {
            stack.truncate(index);
            return;
        }
    }
}

struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    /// Byte offset just past the closing '>'
    end: usize,
}

/// Parse a start tag beginning at `start` (the '<'). `None` if unterminated.
fn parse_start_tag(source: &str, start: usize) -> Option<StartTag> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let is_delim = |b: u8| b.is_ascii_whitespace() || b == b'>' || b == b'/';

    let mut i = start + 1;
    let name_start = i;
    while i < len && !is_delim(bytes[i]) {
        i += 1;
    }
    let name = source[name_start..i].to_ascii_lowercase();
    let mut attrs: Vec<(String, String)> = Vec::new();

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            return None;
        }
        match bytes[i] {
            b'>' => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: false,
                    end: i + 1,
                })
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: true,
                    end: i + 2,
                })
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < len && !is_delim(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        let attr_name = source[attr_start..i].to_ascii_lowercase();
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i] as char;
                let value_start = i + 1;
                let value_end = source[value_start..].find(quote).map(|o| value_start + o)?;
                value = decode_entities(&source[value_start..value_end]);
                i = value_end + 1;
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                value = decode_entities(&source[value_start..i]);
            }
        }

        if !attr_name.is_empty() && !attrs.iter().any(|(n, _)| *n == attr_name) {
            attrs.push((attr_name, value));
        }
    }
}

/// Raw content of a script/style element and the offset after its end tag.
fn raw_text<'a>(source: &'a str, start: usize, name: &str) -> (&'a str, usize) {
    let needle = format!("</{name}");
    let lowered = source[start..].to_ascii_lowercase();
    match lowered.find(&needle) {
        Some(offset) => {
            let text_end = start + offset;
            let next = source[text_end..]
                .find('>')
                .map_or(source.len(), |i| text_end + i + 1);
            (&source[start..text_end], next)
        }
        None => (&source[start..], source.len()),
    }
}

/// Decode character references: the common named ones and numeric ones.
/// Unknown references are left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let resolved = after
            .find(';')
            .and_then(|semi| resolve_entity(&after[..semi]).map(|c| (c, semi)));
        match resolved {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

impl DomTree for SimpleTree {
    type Node = NodeRef;

    fn root(&self) -> NodeRef {
        self.root.clone()
    }

    fn body(&self) -> Option<NodeRef> {
        self.body.clone()
    }

    fn kind(&self, node: &NodeRef) -> NodeKind {
        match &node.borrow().data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { name, .. } => NodeKind::Element(name.clone()),
            NodeData::Text(text) => NodeKind::Text(text.clone()),
            NodeData::Comment => NodeKind::Comment,
        }
    }

    fn attr(&self, node: &NodeRef, name: &str) -> Option<String> {
        match &node.borrow().data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        node.borrow().children.clone()
    }

    fn detach(&mut self, node: &NodeRef) {
        let parent = node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, node));
        }
        let mut detached = node.borrow_mut();
        detached.parent = Weak::new();
        detached.children.clear();
    }
}
