use yamlstore_document::KeyPath;

/// Caller-facing outcome of one store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    /// Human-readable summary of the document; key paths only
    pub content: Option<String>,
    pub keys: Option<Vec<KeyPath>>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            content: None,
            keys: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(message)
        }
    }

    /// Attach an `Updated keys:` listing of `keys`
    pub fn with_key_summary(mut self, keys: &[KeyPath]) -> Self {
        let mut content = String::from("Updated keys:");
        for key in keys {
            content.push('\n');
            content.push_str(&key.to_string());
        }
        self.content = Some(content);
        self
    }

    pub fn with_keys(mut self, keys: Vec<KeyPath>) -> Self {
        self.keys = Some(keys);
        self
    }
}
