//! Removal of non-content subtrees.

use super::dom::{DomTree, NodeKind};

/// Elements whose whole subtree is dropped before rendering.
pub const NOISE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript", "aside"];

pub fn is_noise_tag(name: &str) -> bool {
    NOISE_TAGS.contains(&name)
}

/// Detaches noise elements and comments from a tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseStripper;

impl NoiseStripper {
    /// Strip the tree in place and return the number of detached nodes.
    pub fn strip<T: DomTree>(&self, tree: &mut T) -> usize {
        let root = tree.root();

        let noisy = tree.find_all(&root, NOISE_TAGS, true);
        for node in &noisy {
            tree.detach(node);
        }

        let comments: Vec<T::Node> = tree
            .descendants(&root)
            .into_iter()
            .filter(|node| tree.kind(node) == NodeKind::Comment)
            .collect();
        for node in &comments {
            tree.detach(node);
        }

        log::debug!(
            "Stripped {} noise element(s) and {} comment(s)",
            noisy.len(),
            comments.len()
        );
        noisy.len() + comments.len()
    }
}
