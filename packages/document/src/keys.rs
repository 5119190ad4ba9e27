//! # Key Enumeration and Redacted Checks
//!
//! Everything here answers questions about a document without returning a
//! single value: leaf paths, existence, and the length of a value.
//!
//! A key path cannot name a mapping key that is empty or contains `.`, so
//! such keys and everything beneath them are left out of [`list_keys`].

use crate::codec;
use crate::resolver;
use crate::{KeyPath, Node, Segment};

/// Result of a key check. Holds no value content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCheck {
    pub exists: bool,
    /// Character count of the value's rendering; `None` when absent
    pub value_length: Option<usize>,
}

impl KeyCheck {
    pub fn missing() -> Self {
        Self {
            exists: false,
            value_length: None,
        }
    }

    pub fn found(value_length: usize) -> Self {
        Self {
            exists: true,
            value_length: Some(value_length),
        }
    }
}

/// Paths of every non-null leaf, depth-first in document order
pub fn list_keys(root: &Node) -> Vec<KeyPath> {
    let mut keys = Vec::new();
    let mut prefix = Vec::new();
    collect_leaves(root, &mut prefix, &mut keys);
    keys
}

fn collect_leaves(node: &Node, prefix: &mut Vec<Segment>, keys: &mut Vec<KeyPath>) {
    match node {
        Node::Mapping(map) => {
            for (key, child) in map {
                if !addressable(key) {
                    continue;
                }
                prefix.push(Segment::parse(key));
                collect_leaves(child, prefix, keys);
                prefix.pop();
            }
        }
        Node::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                prefix.push(Segment::Index(index));
                collect_leaves(child, prefix, keys);
                prefix.pop();
            }
        }
        Node::Null => {}
        _ => {
            // A scalar document root has no path
            if let Some(path) = KeyPath::from_segments(prefix.clone()) {
                keys.push(path);
            }
        }
    }
}

fn addressable(key: &str) -> bool {
    !key.is_empty() && !key.contains('.')
}

/// Existence and value length at `path`. A null value counts as absent.
pub fn check_key(root: &Node, path: &KeyPath) -> KeyCheck {
    match resolver::get(root, path) {
        Ok(Node::Null) | Err(_) => KeyCheck::missing(),
        Ok(node) => KeyCheck::found(value_length(node)),
    }
}

fn value_length(node: &Node) -> usize {
    match node.plain_scalar() {
        Some(text) => text.chars().count(),
        // Containers and tagged values: length of their YAML rendering
        None => codec::to_yaml_string(node)
            .map(|yaml| yaml.trim().chars().count())
            .unwrap_or(0),
    }
}
