//! # YAML Store Document
//!
//! In-memory document model for a YAML file addressed by dotted key paths.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec: YAML text ⇄ Node tree                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ path: "app.servers.0.host" → KeyPath        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ resolver: get / set / add / delete          │
//! │ keys: leaf enumeration, redacted key checks │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Insertion order is kept**: mappings serialize in the order keys were
//!    first seen, new keys are appended
//! 2. **No coercion**: a scalar is never silently replaced by a container
//!    while walking a path
//! 3. **Values stay inside**: key enumeration and key checks only ever expose
//!    paths, existence and lengths
//!
//! ## Usage
//!
//! ```rust
//! use yamlstore_document::{Document, KeyPath, Node};
//!
//! let mut doc = Document::parse("app:\n  name: Demo\n").unwrap();
//! let path: KeyPath = "app.port".parse().unwrap();
//! doc.set(&path, Node::string("8080")).unwrap();
//!
//! assert_eq!(doc.to_yaml().unwrap(), "app:\n  name: Demo\n  port: '8080'\n");
//! ```

mod codec;
mod document;
mod errors;
mod keys;
mod node;
mod path;
mod resolver;

pub use document::Document;
pub use errors::{DocumentError, PathError};
pub use keys::{check_key, list_keys, KeyCheck};
pub use node::{Mapping, Node, TaggedNode};
pub use path::{KeyPath, Segment};
pub use resolver::{add, delete, get, resolve, set, SetOutcome};
