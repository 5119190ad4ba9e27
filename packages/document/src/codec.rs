//! Conversion between `serde_yaml` values and document nodes

use crate::{DocumentError, Mapping, Node, TaggedNode};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value;

pub(crate) fn from_yaml_str(source: &str) -> Result<Node, DocumentError> {
    let value: Value =
        serde_yaml::from_str(source).map_err(|e| DocumentError::Corrupt(e.to_string()))?;

    // An empty file parses as null; treat it as an empty top-level mapping
    match value {
        Value::Null => Ok(Node::empty_mapping()),
        other => from_value(other),
    }
}

pub(crate) fn to_yaml_string(node: &Node) -> Result<String, DocumentError> {
    serde_yaml::to_string(&to_value(node)).map_err(|e| DocumentError::Serialize(e.to_string()))
}

pub(crate) fn from_value(value: Value) -> Result<Node, DocumentError> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => Node::Number(n),
        Value::String(s) => Node::String(s),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(from_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(entries) => {
            let mut map = Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                let key = key_to_string(key)?;
                if map.contains_key(&key) {
                    return Err(DocumentError::UnsupportedKey(format!(
                        "duplicate key '{key}' after string conversion"
                    )));
                }
                map.insert(key, from_value(value)?);
            }
            Node::Mapping(map)
        }
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            Node::Tagged(Box::new(TaggedNode {
                tag: tag.to_string(),
                value: from_value(value)?,
            }))
        }
    })
}

pub(crate) fn to_value(node: &Node) -> Value {
    match node {
        Node::Null => Value::Null,
        Node::Bool(b) => Value::Bool(*b),
        Node::Number(n) => Value::Number(n.clone()),
        Node::String(s) => Value::String(s.clone()),
        Node::Sequence(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Node::Mapping(map) => {
            let mut entries = serde_yaml::Mapping::with_capacity(map.len());
            for (key, value) in map {
                entries.insert(Value::String(key.clone()), to_value(value));
            }
            Value::Mapping(entries)
        }
        Node::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tagged.tag.clone()),
            value: to_value(&tagged.value),
        })),
    }
}

/// Scalar keys become their plain string form; complex keys are rejected
fn key_to_string(key: Value) -> Result<String, DocumentError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Sequence(_) => Err(DocumentError::UnsupportedKey("sequence".to_string())),
        Value::Mapping(_) => Err(DocumentError::UnsupportedKey("mapping".to_string())),
        Value::Tagged(tagged) => Err(DocumentError::UnsupportedKey(format!(
            "tagged key {}",
            tagged.tag
        ))),
    }
}
