//! Store executor against the in-memory remote
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use yamlstore_document::{KeyCheck, KeyPath};
use yamlstore_remote::{
    MemoryRemote, RemoteConfig, RemoteDocument, RemoteDocumentClient, RemoteError, RemoteResult,
    Revision,
};
use yamlstore_store::{RetryPolicy, StoreError, StoreExecutor};

fn config() -> RemoteConfig {
    RemoteConfig::new("acme", "infra", "main", "config.yaml", "ghp_secret")
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_backoff_ms: 1,
        max_backoff_ms: 2,
    }
}

fn seeded(content: &str) -> MemoryRemote {
    let remote = MemoryRemote::new();
    remote.put_file(&config(), content);
    remote
}

fn build_executor<C: RemoteDocumentClient>(client: C) -> StoreExecutor<C> {
    StoreExecutor::new(client).with_retry_policy(fast_retry())
}

fn content_of(remote: &MemoryRemote) -> String {
    remote.read_file(&config()).unwrap().content
}

/// Writes a competing version of the file right before the first
/// `commit_races` commits reach the host
struct RacingRemote {
    inner: MemoryRemote,
    competing: &'static str,
    commit_races: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl RacingRemote {
    fn new(inner: MemoryRemote, competing: &'static str, commit_races: usize) -> Self {
        Self {
            inner,
            competing,
            commit_races: AtomicUsize::new(commit_races),
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RemoteDocumentClient for RacingRemote {
    fn backend_tag(&self) -> &'static str {
        "racing"
    }

    async fn fetch(&self, config: &RemoteConfig) -> RemoteResult<RemoteDocument> {
        self.inner.fetch(config).await
    }

    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        message: &str,
    ) -> RemoteResult<Revision> {
        self.messages.lock().unwrap().push(message.to_string());
        let races_left = self.commit_races.load(Ordering::SeqCst);
        if races_left > 0 {
            self.commit_races.store(races_left - 1, Ordering::SeqCst);
            self.inner.put_file(config, self.competing);
        }
        self.inner.commit(config, content, revision, message).await
    }
}

/// Holds the first two fetches until both have happened, so two commands
/// start from the same revision
struct LockstepRemote {
    inner: MemoryRemote,
    barrier: Barrier,
    fetches: AtomicUsize,
}

#[async_trait]
impl RemoteDocumentClient for LockstepRemote {
    fn backend_tag(&self) -> &'static str {
        "lockstep"
    }

    async fn fetch(&self, config: &RemoteConfig) -> RemoteResult<RemoteDocument> {
        let document = self.inner.fetch(config).await?;
        if self.fetches.fetch_add(1, Ordering::SeqCst) < 2 {
            self.barrier.wait().await;
        }
        Ok(document)
    }

    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        message: &str,
    ) -> RemoteResult<Revision> {
        self.inner.commit(config, content, revision, message).await
    }
}

/// Applies the first commit and then reports a timeout instead of the new revision
struct LostResponseRemote {
    inner: MemoryRemote,
    lost: AtomicUsize,
}

#[async_trait]
impl RemoteDocumentClient for LostResponseRemote {
    fn backend_tag(&self) -> &'static str {
        "lost-response"
    }

    async fn fetch(&self, config: &RemoteConfig) -> RemoteResult<RemoteDocument> {
        self.inner.fetch(config).await
    }

    async fn commit(
        &self,
        config: &RemoteConfig,
        content: &str,
        revision: &Revision,
        message: &str,
    ) -> RemoteResult<Revision> {
        let revision = self.inner.commit(config, content, revision, message).await?;
        if self.lost.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(RemoteError::Unavailable("request timed out".to_string()));
        }
        Ok(revision)
    }
}

#[tokio::test]
async fn test_set_on_empty_document() {
    let remote = seeded("{}\n");
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "set app.name=Demo").await;
    assert!(result.success, "{}", result.message);
    assert_eq!(content_of(&remote), "app:\n  name: Demo\n");
    assert_eq!(result.content.as_deref(), Some("Updated keys:\napp.name"));
    assert_eq!(remote.commit_count(), 1);
}

#[tokio::test]
async fn test_delete_missing_key_names_path() {
    let remote = seeded("app:\n  name: Demo\n");
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "delete app.missing").await;
    assert!(!result.success);
    assert!(result.message.contains("app.missing"), "{}", result.message);
    assert_eq!(content_of(&remote), "app:\n  name: Demo\n");
    assert_eq!(remote.commit_count(), 0);
}

#[tokio::test]
async fn test_check_key_reports_length_only() {
    let remote = seeded("app:\n  name: Demo\n");
    let executor = build_executor(remote);

    let check = executor.check_key(&config(), "app.name").await.unwrap();
    assert_eq!(check, KeyCheck::found(4));

    let missing = executor.check_key(&config(), "app.port").await.unwrap();
    assert_eq!(missing, KeyCheck::missing());
}

#[tokio::test]
async fn test_check_key_rejects_invalid_path() {
    let executor = build_executor(seeded("a: 1\n"));
    let err = executor.check_key(&config(), "a..b").await.unwrap_err();
    assert!(matches!(err, StoreError::Path(_)));
}

#[tokio::test]
async fn test_conflict_then_success_creates_one_revision() {
    let inner = seeded("app:\n  name: Old\n");
    let racing = RacingRemote::new(inner.clone(), "team: core\napp:\n  name: Old\n", 1);
    let executor = build_executor(racing);

    let result = executor.execute(&config(), "set app.name=Demo").await;
    assert!(result.success, "{}", result.message);

    // The competing write is kept and only one of our commits landed
    assert_eq!(inner.commit_count(), 1);
    assert_eq!(content_of(&inner), "team: core\napp:\n  name: Demo\n");
    assert_eq!(executor.client().messages.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_conflict_is_surfaced() {
    let inner = seeded("a: 1\n");
    let racing = RacingRemote::new(inner.clone(), "a: other\n", 2);
    let executor = build_executor(racing);

    let err = executor
        .try_execute(&config(), "set a=2")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Remote(yamlstore_remote::RemoteError::Conflict)
    ));
    assert_eq!(inner.commit_count(), 0);
    assert_eq!(content_of(&inner), "a: other\n");
}

#[tokio::test]
async fn test_concurrent_disjoint_keys_both_land() {
    let inner = seeded("app:\n  name: Demo\n");
    let lockstep = LockstepRemote {
        inner: inner.clone(),
        barrier: Barrier::new(2),
        fetches: AtomicUsize::new(0),
    };
    let executor = build_executor(lockstep);
    let config = config();

    let (first, second) = tokio::join!(
        executor.execute(&config, "set app.port=8080"),
        executor.execute(&config, "set app.debug=true"),
    );
    assert!(first.success, "{}", first.message);
    assert!(second.success, "{}", second.message);

    let keys: Vec<String> = executor
        .list_keys(&config)
        .await
        .keys
        .unwrap()
        .iter()
        .map(KeyPath::to_string)
        .collect();
    assert!(keys.contains(&"app.port".to_string()));
    assert!(keys.contains(&"app.debug".to_string()));
    assert_eq!(inner.commit_count(), 2);
}

#[tokio::test]
async fn test_unavailable_is_retried() {
    let remote = seeded("a: 1\n");
    remote.fail_next(2);
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "set b=2").await;
    assert!(result.success, "{}", result.message);
    assert_eq!(remote.fetch_count(), 3);
    assert_eq!(remote.commit_count(), 1);
}

#[tokio::test]
async fn test_commit_landed_before_timeout_is_success() {
    let inner = seeded("app:\n  name: Demo\n");
    let executor = build_executor(LostResponseRemote {
        inner: inner.clone(),
        lost: AtomicUsize::new(0),
    });

    let result = executor.execute(&config(), "delete app.name").await;
    assert!(result.success, "{}", result.message);
    assert!(result.message.contains("deleted"), "{}", result.message);
    assert_eq!(inner.commit_count(), 1);
    assert_eq!(content_of(&inner), "app: {}\n");
}

#[tokio::test]
async fn test_unavailable_gives_up_after_bounded_attempts() {
    let remote = seeded("a: 1\n");
    remote.fail_next(10);
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "set b=2").await;
    assert!(!result.success);
    assert!(result.message.contains("unavailable"), "{}", result.message);
    assert_eq!(remote.fetch_count(), 3);
}

#[tokio::test]
async fn test_incomplete_config_makes_no_network_call() {
    let remote = seeded("a: 1\n");
    let executor = build_executor(remote.clone());
    let mut incomplete = config();
    incomplete.token = Default::default();

    let result = executor.execute(&incomplete, "set b=2").await;
    assert!(!result.success);
    assert_eq!(result.message, "Missing required fields: token");
    assert_eq!(remote.fetch_count(), 0);
}

#[tokio::test]
async fn test_corrupt_document_is_never_committed() {
    let remote = seeded("a: [1, 2\n");
    let executor = build_executor(remote.clone());

    let err = executor.try_execute(&config(), "set b=2").await.unwrap_err();
    assert!(matches!(err, StoreError::Document(_)));
    assert_eq!(remote.commit_count(), 0);
}

#[tokio::test]
async fn test_colliding_keys_block_unrelated_set() {
    let remote = seeded("1: first\n'1': second\nx: old\n");
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "set x=new").await;
    assert!(!result.success);
    assert!(result.message.contains("duplicate key"), "{}", result.message);
    assert_eq!(remote.commit_count(), 0);
    assert_eq!(content_of(&remote), "1: first\n'1': second\nx: old\n");
}

#[tokio::test]
async fn test_parse_error_commits_nothing() {
    let remote = seeded("a: 1\n");
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "frobnicate a").await;
    assert!(!result.success);
    assert!(result.message.contains("frobnicate"));

    let result = executor.execute(&config(), "set a").await;
    assert!(!result.success);
    assert!(result.message.contains("key=value"));
    assert_eq!(remote.commit_count(), 0);
}

#[tokio::test]
async fn test_read_only_commands_do_not_commit() {
    let remote = seeded("app:\n  name: Demo\n  port: 8080\n");
    let executor = build_executor(remote.clone());

    let got = executor.execute(&config(), "get app.name").await;
    assert!(got.success);
    assert_eq!(got.message, "Key 'app.name' exists (value length 4)");

    let listed = executor.execute(&config(), "keys").await;
    assert!(listed.success);
    assert_eq!(listed.keys.unwrap().len(), 2);
    assert_eq!(remote.commit_count(), 0);
}

#[tokio::test]
async fn test_repeated_set_commits_once() {
    let remote = seeded("{}\n");
    let executor = build_executor(remote.clone());

    assert!(executor.execute(&config(), "set a.b=c").await.success);
    let again = executor.execute(&config(), "set a.b=c").await;
    assert!(again.success);
    assert!(again.message.contains("nothing to commit"));
    assert_eq!(remote.commit_count(), 1);
}

#[tokio::test]
async fn test_unauthorized_does_not_echo_token() {
    let remote = seeded("a: 1\n").with_required_token("ghp_right");
    let executor = build_executor(remote.clone());

    let result = executor.execute(&config(), "set a=2").await;
    assert!(!result.success);
    assert!(result.message.contains("Unauthorized"));
    assert!(!result.message.contains("ghp_secret"));
    assert!(!result.message.contains("ghp_right"));
}

#[tokio::test]
async fn test_commit_message_omits_value() {
    let racing = RacingRemote::new(seeded("db: {}\n"), "", 0);
    let executor = build_executor(racing);

    let result = executor.execute(&config(), "set db.password=hunter2").await;
    assert!(result.success, "{}", result.message);
    assert!(!result.message.contains("hunter2"));
    assert_eq!(
        *executor.client().messages.lock().unwrap(),
        vec!["Update config.yaml via yamlstore: set db.password".to_string()]
    );
}

#[tokio::test]
async fn test_list_keys() {
    let executor = build_executor(seeded("app:\n  name: Demo\n  tags: [a, b]\nempty: null\n"));
    let result = executor.list_keys(&config()).await;
    assert!(result.success);
    let keys: Vec<String> = result.keys.unwrap().iter().map(KeyPath::to_string).collect();
    assert_eq!(keys, vec!["app.name", "app.tags.0", "app.tags.1"]);
}

#[tokio::test]
async fn test_probe_missing_file() {
    let executor = build_executor(MemoryRemote::new());
    let err = executor.probe(&config()).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Remote(yamlstore_remote::RemoteError::NotFound(_))
    ));

    // Reachable even when the content is not valid YAML
    let reachable = build_executor(seeded("a: [1, 2\n"));
    assert!(reachable.probe(&config()).await.is_ok());
}

#[tokio::test]
async fn test_shared_executor_across_tasks() {
    let remote = seeded("{}\n");
    let executor = Arc::new(build_executor(remote.clone()));

    let handle = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.execute(&config(), "set x=1").await })
    };
    assert!(handle.await.unwrap().success);
    assert_eq!(content_of(&remote), "x: '1'\n");
}
