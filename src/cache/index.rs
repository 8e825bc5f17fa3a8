use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, warn};

use super::scan::scan_cache_dir;

/// Repositories known to hold GGUF files locally, filled in by a background scan.
///
/// The scanner thread publishes the full set exactly once; readers only ever
/// see "not ready" or the complete set.
#[derive(Debug, Default)]
pub struct CacheIndex {
    ready: AtomicBool,
    repos: OnceLock<HashSet<String>>,
    done: Notify,
}

impl CacheIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stores the scan result and flips the readiness flag. Later calls are ignored.
    pub fn publish(&self, repos: HashSet<String>) {
        if self.repos.set(repos).is_err() {
            warn!("Cache index already published, ignoring second result");
            return;
        }
        self.ready.store(true, Ordering::Release);
        self.done.notify_waiters();
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// True when the scan has finished and saw `repo_id`.
    pub fn contains(&self, repo_id: &str) -> bool {
        self.is_ready() && self.repos.get().is_some_and(|r| r.contains(repo_id))
    }

    /// Number of repositories found; zero until ready.
    pub fn len(&self) -> usize {
        if !self.is_ready() {
            return 0;
        }
        self.repos.get().map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted identifiers, or `None` while the scan is still running.
    pub fn snapshot(&self) -> Option<Vec<String>> {
        if !self.is_ready() {
            return None;
        }
        let mut ids: Vec<String> = self.repos.get()?.iter().cloned().collect();
        ids.sort();
        Some(ids)
    }

    /// Waits until the scan is published or `timeout` elapses. Returns readiness.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let notified = self.done.notified();
        if self.is_ready() {
            return true;
        }
        let _ = tokio::time::timeout(timeout, notified).await;
        self.is_ready()
    }
}

/// Starts the single background thread that scans the hub cache.
///
/// The thread is detached. A missing root or a failed scan still publishes an
/// empty set so waiters are released.
pub fn spawn_scanner(index: Arc<CacheIndex>, root: Option<PathBuf>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("cache-scan".to_string())
        .spawn(move || {
            let repos = match root {
                Some(root) => match scan_cache_dir(&root) {
                    Ok(cache) => cache.repos_with_model_files(),
                    Err(e) => {
                        warn!("Hub cache scan failed at {}: {}", root.display(), e);
                        HashSet::new()
                    }
                },
                None => {
                    warn!("No hub cache directory could be resolved");
                    HashSet::new()
                }
            };
            info!("Cache index ready with {} GGUF repositories", repos.len());
            index.publish(repos);
        })
}
