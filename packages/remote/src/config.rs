//! Which remote file to operate on, and with what credential

use std::fmt;

/// Access token for the remote host. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for building the authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Remote file coordinates plus credential
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub token: Credential,
}

impl RemoteConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        path: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            path: path.into(),
            token: Credential::new(token),
        }
    }

    /// Names of the fields that are empty, in declaration order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.owner.trim().is_empty() {
            missing.push("owner");
        }
        if self.repo.trim().is_empty() {
            missing.push("repo");
        }
        if self.branch.trim().is_empty() {
            missing.push("branch");
        }
        if self.path.trim().is_empty() {
            missing.push("path");
        }
        if self.token.is_empty() {
            missing.push("token");
        }
        missing
    }

    /// `owner/repo@branch:path`, without the credential
    pub fn location(&self) -> String {
        format!("{}/{}@{}:{}", self.owner, self.repo, self.branch, self.path)
    }
}
