//! # YAML Store Commands
//!
//! The command language accepted by the store, one command per line:
//!
//! ```text
//! set    <path>=<value>   create or overwrite
//! add    <path>=<value>   create or overwrite, same container kind only
//! delete <path>           remove one entry
//! get    <path>           existence and value length (read-only)
//! keys                    list leaf paths (read-only)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use yamlstore_command::{parse, Operation, Outcome};
//! use yamlstore_document::Document;
//!
//! let mut doc = Document::new();
//! let op = parse("set app.name=Demo").unwrap();
//! assert_eq!(op.apply(&mut doc).unwrap(), Outcome::Created);
//! ```

mod operation;
mod parser;

pub use operation::{Operation, Outcome};
pub use parser::{parse, ParseError};
