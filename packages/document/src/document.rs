//! # Document Handle
//!
//! A [`Document`] owns the node tree parsed from one YAML file. It lives for
//! a single fetch-mutate-commit cycle and is never shared.
//!
//! ## Lifecycle
//!
//! ```text
//! Fetch → Parse → Edit → Serialize → Commit
//!   ↓       ↓       ↓        ↓          ↓
//! Text    Tree   Resolver   Text     Revision
//! ```

use crate::codec;
use crate::keys::{self, KeyCheck};
use crate::resolver::{self, SetOutcome};
use crate::{DocumentError, KeyPath, Node, PathError};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty top-level mapping
    pub fn new() -> Self {
        Self {
            root: Node::empty_mapping(),
        }
    }

    pub fn from_node(root: Node) -> Self {
        Self { root }
    }

    /// Parse YAML text. An empty file is an empty mapping.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        Ok(Self {
            root: codec::from_yaml_str(source)?,
        })
    }

    /// Serialize to YAML. Output depends only on the tree, so equal documents
    /// always produce identical text.
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        codec::to_yaml_string(&self.root)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn get(&self, path: &KeyPath) -> Result<&Node, PathError> {
        resolver::get(&self.root, path)
    }

    pub fn set(&mut self, path: &KeyPath, value: Node) -> Result<SetOutcome, PathError> {
        resolver::set(&mut self.root, path, value)
    }

    pub fn add(&mut self, path: &KeyPath, value: Node) -> Result<SetOutcome, PathError> {
        resolver::add(&mut self.root, path, value)
    }

    pub fn delete(&mut self, path: &KeyPath) -> Result<Node, PathError> {
        resolver::delete(&mut self.root, path)
    }

    pub fn list_keys(&self) -> Vec<KeyPath> {
        keys::list_keys(&self.root)
    }

    pub fn check_key(&self, path: &KeyPath) -> KeyCheck {
        keys::check_key(&self.root, path)
    }
}
