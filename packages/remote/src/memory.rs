//! In-process remote host.
//!
//! Files are keyed by owner, repo, branch and path. Every write assigns a
//! fresh `rev-N` revision, and `commit` enforces the same compare-and-swap
//! rule as a real host. Clones share state.

use crate::{RemoteConfig, RemoteDocument, RemoteDocumentClient, RemoteError, RemoteResult, Revision};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type FileKey = (String, String, String, String);

#[derive(Clone, Default)]
pub struct MemoryRemote {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    files: HashMap<FileKey, RemoteDocument>,
    next_revision: u64,
    required_token: Option<String>,
    unavailable_budget: usize,
    fetches: usize,
    commits: usize,
}

impl MemoryState {
    fn next_revision(&mut self) -> Revision {
        self.next_revision += 1;
        Revision::new(format!("rev-{}", self.next_revision))
    }

    /// Shared preamble of fetch and commit: injected outages, then auth
    fn admit(&mut self, config: &RemoteConfig) -> RemoteResult<()> {
        if self.unavailable_budget > 0 {
            self.unavailable_budget -= 1;
            return Err(RemoteError::Unavailable("injected outage".to_string()));
        }
        match &self.required_token {
            Some(token) if token != config.token.expose() => Err(RemoteError::Unauthorized),
            _ => Ok(()),
        }
    }
}

fn key(config: &RemoteConfig) -> FileKey {
    (
        config.owner.clone(),
        config.repo.clone(),
        config.branch.clone(),
        config.path.clone(),
    )
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every request whose credential differs from `token`
    pub fn with_required_token(self, token: impl Into<String>) -> Self {
        self.lock().required_token = Some(token.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write a file directly, as another client of the host would
    pub fn put_file(&self, config: &RemoteConfig, content: impl Into<String>) -> Revision {
        let mut state = self.lock();
        let revision = state.next_revision();
        state.files.insert(
            key(config),
            RemoteDocument {
                content: content.into(),
                revision: revision.clone(),
            },
        );
        revision
    }

    pub fn read_file(&self, config: &RemoteConfig) -> Option<RemoteDocument> {
        self.lock().files.get(&key(config)).cloned()
    }

    /// Make the next `count` requests fail with `Unavailable`
    pub fn fail_next(&self, count: usize) {
        self.lock().unavailable_budget = count;
    }

    /// Successful commits so far
    pub fn commit_count(&self) -> usize {
        self.lock().commits
    }

    /// Fetch attempts so far, successful or not
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }
}

#[async_trait]
impl RemoteDocumentClient for MemoryRemote {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, config: &RemoteConfig) -> RemoteResult<RemoteDocument> {
        let mut state = self.lock();
        state.fetches += 1;
        state.admit(config)?;
        state
            .files
            .get(&key(config))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(config.location()))
    }

    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        _message: &str,
    ) -> RemoteResult<Revision> {
        let mut state = self.lock();
        state.admit(config)?;

        let current = state
            .files
            .get(&key(config))
            .map(|file| file.revision.clone())
            .ok_or_else(|| RemoteError::NotFound(config.location()))?;
        if &current != revision {
            return Err(RemoteError::Conflict);
        }

        let next = state.next_revision();
        state.files.insert(
            key(config),
            RemoteDocument {
                content: content.to_string(),
                revision: next.clone(),
            },
        );
        state.commits += 1;
        Ok(next)
    }
}
