//! Fetch, mutate and commit one remote YAML document.
//!
//! Every call starts from a fresh fetch and keeps nothing afterwards. A
//! mutating command is committed against the revision it was applied to; if
//! another writer got there first the command is re-applied once on top of
//! the new revision. A conflict against content identical to what was sent
//! counts as success, since a retried commit may already have landed.

use crate::{CommandResult, RetryPolicy, StoreError, StoreResult};
use tracing::{error, info, warn};
use yamlstore_command::{parse, Operation, Outcome};
use yamlstore_document::{Document, KeyCheck, KeyPath};
use yamlstore_remote::{RemoteConfig, RemoteDocumentClient, RemoteError, Revision};

pub struct StoreExecutor<C> {
    client: C,
    retry: RetryPolicy,
}

/// A fetched document together with the revision it was read at
struct Snapshot {
    document: Document,
    revision: Revision,
}

impl<C: RemoteDocumentClient> StoreExecutor<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one command. Failures become `success: false` results.
    pub async fn execute(&self, config: &RemoteConfig, command: &str) -> CommandResult {
        match self.try_execute(config, command).await {
            Ok(result) => result,
            Err(err) => {
                error!(location = %config.location(), error = %err, "command failed");
                CommandResult::failure(err.to_string())
            }
        }
    }

    pub async fn try_execute(
        &self,
        config: &RemoteConfig,
        command: &str,
    ) -> StoreResult<CommandResult> {
        validate(config)?;
        let mut snapshot = self.load(config).await?;
        let operation = parse(command)?;
        info!(
            location = %config.location(),
            command = %operation.summary(),
            backend = self.client.backend_tag(),
            "executing command"
        );

        let mut conflict_retried = false;
        loop {
            let Snapshot {
                mut document,
                revision,
            } = snapshot;
            let before = document.to_yaml()?;
            let outcome = operation.apply(&mut document)?;
            if !operation.is_mutating() {
                return Ok(read_result(&operation, outcome));
            }

            let content = document.to_yaml()?;
            let keys = document.list_keys();
            if content == before {
                info!(location = %config.location(), "document unchanged, skipping commit");
                return Ok(CommandResult::success(format!(
                    "Command executed; '{}' already up to date, nothing to commit",
                    describe_path(&operation)
                ))
                .with_key_summary(&keys));
            }

            match self.commit(config, &content, &revision, &operation).await {
                Ok(new_revision) => {
                    info!(
                        location = %config.location(),
                        base = %revision,
                        revision = %new_revision,
                        "committed"
                    );
                    return Ok(CommandResult::success(committed_message(&operation, &outcome))
                        .with_key_summary(&keys));
                }
                Err(RemoteError::Conflict) if !conflict_retried => {
                    warn!(
                        location = %config.location(),
                        base = %revision,
                        "remote changed since fetch, re-applying once"
                    );
                    conflict_retried = true;
                    snapshot = self.load(config).await?;

                    // An earlier attempt may have landed before its response was lost
                    if snapshot.document.to_yaml()? == content {
                        info!(
                            location = %config.location(),
                            revision = %snapshot.revision,
                            "remote already holds the committed content"
                        );
                        return Ok(CommandResult::success(committed_message(
                            &operation, &outcome,
                        ))
                        .with_key_summary(&keys));
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Existence and value length of `key`; the value itself never leaves
    pub async fn check_key(&self, config: &RemoteConfig, key: &str) -> StoreResult<KeyCheck> {
        validate(config)?;
        let path: KeyPath = key.trim().parse()?;
        let snapshot = self.load(config).await?;
        let check = snapshot.document.check_key(&path);
        info!(location = %config.location(), key = %path, exists = check.exists, "checked key");
        Ok(check)
    }

    /// Every leaf key path of the document
    pub async fn list_keys(&self, config: &RemoteConfig) -> CommandResult {
        let listed = async {
            validate(config)?;
            let snapshot = self.load(config).await?;
            Ok::<_, StoreError>(snapshot.document.list_keys())
        };
        match listed.await {
            Ok(keys) => {
                info!(location = %config.location(), count = keys.len(), "listed keys");
                CommandResult::success("YAML keys fetched successfully").with_keys(keys)
            }
            Err(err) => {
                error!(location = %config.location(), error = %err, "listing keys failed");
                CommandResult::failure(err.to_string())
            }
        }
    }

    /// Check that the file can be fetched, without parsing it
    pub async fn probe(&self, config: &RemoteConfig) -> StoreResult<Revision> {
        validate(config)?;
        let remote = self.retry.run("fetch", || self.client.fetch(config)).await?;
        Ok(remote.revision)
    }

    async fn load(&self, config: &RemoteConfig) -> StoreResult<Snapshot> {
        let remote = self.retry.run("fetch", || self.client.fetch(config)).await?;
        let document = Document::parse(&remote.content)?;
        info!(location = %config.location(), revision = %remote.revision, "fetched document");
        Ok(Snapshot {
            document,
            revision: remote.revision,
        })
    }

    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        operation: &Operation,
    ) -> Result<Revision, RemoteError> {
        let message = format!(
            "Update {} via yamlstore: {}",
            config.path,
            operation.summary()
        );
        self.retry
            .run("commit", || self.client.commit(config, content, revision, &message))
            .await
    }
}

fn validate(config: &RemoteConfig) -> StoreResult<()> {
    let missing = config.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::ConfigIncomplete { missing })
    }
}

fn describe_path(operation: &Operation) -> String {
    operation
        .path()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn committed_message(operation: &Operation, outcome: &Outcome) -> String {
    let verb = match outcome {
        Outcome::Created => "created",
        Outcome::Removed => "deleted",
        _ => "updated",
    };
    format!(
        "Command executed: key '{}' {verb} and changes pushed",
        describe_path(operation)
    )
}

fn read_result(operation: &Operation, outcome: Outcome) -> CommandResult {
    match outcome {
        Outcome::Checked(check) if check.exists => CommandResult::success(format!(
            "Key '{}' exists (value length {})",
            describe_path(operation),
            check.value_length.unwrap_or_default()
        )),
        Outcome::Checked(_) => {
            CommandResult::success(format!("Key '{}' does not exist", describe_path(operation)))
        }
        Outcome::Listed(keys) => {
            CommandResult::success("YAML keys fetched successfully").with_keys(keys)
        }
        _ => CommandResult::success("Command executed"),
    }
}
