//! Parsed commands and their application to a document

use yamlstore_document::{Document, KeyCheck, KeyPath, Node, PathError, SetOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create or overwrite
    Set { path: KeyPath, value: String },

    /// Create or overwrite without changing the kind of an existing value
    Add { path: KeyPath, value: String },

    Delete { path: KeyPath },

    /// Existence check; never yields the value itself
    Get { path: KeyPath },

    ListKeys,
}

/// What applying an operation did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created,
    Replaced,
    Removed,
    Checked(KeyCheck),
    Listed(Vec<KeyPath>),
}

impl Operation {
    pub fn keyword(&self) -> &'static str {
        match self {
            Operation::Set { .. } => "set",
            Operation::Add { .. } => "add",
            Operation::Delete { .. } => "delete",
            Operation::Get { .. } => "get",
            Operation::ListKeys => "keys",
        }
    }

    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Operation::Set { path, .. }
            | Operation::Add { path, .. }
            | Operation::Delete { path }
            | Operation::Get { path } => Some(path),
            Operation::ListKeys => None,
        }
    }

    /// Only mutating operations lead to a commit
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::Set { .. } | Operation::Add { .. } | Operation::Delete { .. }
        )
    }

    /// Keyword and path without the value, safe for logs and commit messages
    pub fn summary(&self) -> String {
        match self.path() {
            Some(path) => format!("{} {}", self.keyword(), path),
            None => self.keyword().to_string(),
        }
    }

    /// Apply to `doc`. Read-only operations leave it untouched.
    pub fn apply(&self, doc: &mut Document) -> Result<Outcome, PathError> {
        match self {
            Operation::Set { path, value } => {
                doc.set(path, Node::string(value.as_str())).map(Outcome::from)
            }
            Operation::Add { path, value } => {
                doc.add(path, Node::string(value.as_str())).map(Outcome::from)
            }
            Operation::Delete { path } => doc.delete(path).map(|_| Outcome::Removed),
            Operation::Get { path } => Ok(Outcome::Checked(doc.check_key(path))),
            Operation::ListKeys => Ok(Outcome::Listed(doc.list_keys())),
        }
    }
}

impl From<SetOutcome> for Outcome {
    fn from(outcome: SetOutcome) -> Self {
        match outcome {
            SetOutcome::Created => Outcome::Created,
            SetOutcome::Replaced => Outcome::Replaced,
        }
    }
}
