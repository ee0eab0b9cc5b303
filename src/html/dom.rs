//! Tree capability shared by the HTML parsing backends.

/// What a node is, with its tag name or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    /// Element with its lowercase tag name
    Element(String),
    Text(String),
    Comment,
    /// Doctype, processing instruction and the like
    Other,
}

/// Read access plus detachment over a parsed HTML tree.
///
/// Node handles are cheap to clone and stay valid after detachment; a
/// detached node is simply unreachable from the root.
pub trait DomTree {
    type Node: Clone;

    /// The document node.
    fn root(&self) -> Self::Node;

    /// The `<body>` element, if the document has one.
    fn body(&self) -> Option<Self::Node>;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// Attribute value by lowercase name.
    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Ordered children.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Remove a node and its subtree from the tree.
    fn detach(&mut self, node: &Self::Node);

    /// Lowercase tag name for elements.
    fn tag_name(&self, node: &Self::Node) -> Option<String> {
        match self.kind(node) {
            NodeKind::Element(name) => Some(name),
            _ => None,
        }
    }

    /// Elements named in `names`, in document order.
    ///
    /// With `recursive` false only direct children are considered.
    fn find_all(&self, node: &Self::Node, names: &[&str], recursive: bool) -> Vec<Self::Node> {
        let mut matches = Vec::new();
        for child in self.children(node) {
            if let NodeKind::Element(name) = self.kind(&child) {
                if names.contains(&name.as_str()) {
                    matches.push(child.clone());
                }
            }
            if recursive {
                matches.extend(self.find_all(&child, names, true));
            }
        }
        matches
    }

    /// All nodes below `node`, in document order.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        for child in self.children(node) {
            out.push(child.clone());
            out.extend(self.descendants(&child));
        }
        out
    }
}
