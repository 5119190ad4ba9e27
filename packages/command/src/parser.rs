use crate::Operation;
use thiserror::Error;
use yamlstore_document::KeyPath;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unknown command '{keyword}'. Use 'set', 'add', 'delete', 'get' or 'keys'")]
    UnknownCommand { keyword: String },

    #[error("Malformed command: {reason}")]
    MalformedCommand { reason: String },
}

impl ParseError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            reason: reason.into(),
        }
    }
}

/// Parse one command. Surrounding whitespace is ignored; the value of
/// `set`/`add` is everything after the first `=`, kept verbatim.
pub fn parse(text: &str) -> Result<Operation, ParseError> {
    let text = text.trim();
    let (keyword, rest) = match text.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest),
        None => (text, ""),
    };

    match keyword {
        "set" | "add" => {
            let (raw_path, value) = rest.split_once('=').ok_or_else(|| {
                ParseError::malformed(format!(
                    "invalid {keyword} syntax. Use '{keyword} key=value'"
                ))
            })?;
            let path = parse_path(raw_path)?;
            let value = value.to_string();
            Ok(if keyword == "set" {
                Operation::Set { path, value }
            } else {
                Operation::Add { path, value }
            })
        }
        "delete" => Ok(Operation::Delete {
            path: parse_path(rest)?,
        }),
        "get" => Ok(Operation::Get {
            path: parse_path(rest)?,
        }),
        "keys" => {
            if rest.trim().is_empty() {
                Ok(Operation::ListKeys)
            } else {
                Err(ParseError::malformed("'keys' takes no arguments"))
            }
        }
        other => Err(ParseError::UnknownCommand {
            keyword: other.to_string(),
        }),
    }
}

fn parse_path(raw: &str) -> Result<KeyPath, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::malformed("key path is empty"));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(ParseError::malformed(format!(
            "key path '{raw}' contains whitespace"
        )));
    }
    if raw.contains('=') {
        return Err(ParseError::malformed(format!("key path '{raw}' contains '='")));
    }
    KeyPath::parse(raw).map_err(|e| ParseError::malformed(e.to_string()))
}
