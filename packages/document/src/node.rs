//! # Document Nodes
//!
//! A document is a tree of [`Node`]s. Mappings use string keys and keep
//! insertion order; sequences are plain vectors.

use indexmap::IndexMap;

/// Ordered mapping from string keys to child nodes
pub type Mapping = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    /// A value carrying an explicit YAML tag such as `!Ref`. Treated as an
    /// opaque leaf.
    Tagged(Box<TaggedNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedNode {
    /// Tag including its leading `!`
    pub tag: String,
    pub value: Node,
}

impl Node {
    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    pub fn empty_mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Sequence(_) | Node::Mapping(_))
    }

    /// Leaves are everything that is not a mapping or a sequence
    pub fn is_leaf(&self) -> bool {
        !self.is_container()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Human-readable kind, used in type conflict messages
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
            Node::Tagged(_) => "tagged value",
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Plain rendering of a scalar, the way it reads in a YAML file without
    /// quoting. Containers and tagged values have no plain form.
    pub fn plain_scalar(&self) -> Option<String> {
        match self {
            Node::Null => Some("null".to_string()),
            Node::Bool(b) => Some(b.to_string()),
            Node::Number(n) => Some(n.to_string()),
            Node::String(s) => Some(s.clone()),
            Node::Sequence(_) | Node::Mapping(_) | Node::Tagged(_) => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(value.into())
    }
}
