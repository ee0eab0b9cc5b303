//! Full HTML5 tree backed by `scraper` (html5ever).

use ego_tree::NodeId;
use scraper::{Html, Node};

use super::dom::{DomTree, NodeKind};

/// HTML5-conformant parse tree. Implied `<html>`, `<head>` and `<body>`
/// elements are always present.
pub struct ScraperTree {
    html: Html,
}

impl ScraperTree {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl DomTree for ScraperTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    fn body(&self) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|node| matches!(node.value(), Node::Element(e) if e.name() == "body"))
            .map(|node| node.id())
    }

    fn kind(&self, node: &NodeId) -> NodeKind {
        let Some(node) = self.html.tree.get(*node) else {
            return NodeKind::Other;
        };
        match node.value() {
            Node::Document | Node::Fragment => NodeKind::Document,
            Node::Element(element) => NodeKind::Element(element.name().to_ascii_lowercase()),
            Node::Text(text) => NodeKind::Text(String::from(&**text)),
            Node::Comment(_) => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        match self.html.tree.get(*node)?.value() {
            Node::Element(element) => element.attr(name).map(str::to_string),
            _ => None,
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(*node)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    fn detach(&mut self, node: &NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(*node) {
            node.detach();
        }
    }
}
