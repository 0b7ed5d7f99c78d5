//! Document store client.
//!
//! Loads the whole dataset from the remote endpoint, falling back to local slots and
//! then to the seed. Persisting writes the local slots first and then pushes to the
//! remote in a background task the caller does not wait for.
//!
//! Remote calls are single-flight: one async lock per store, and a background push
//! whose snapshot has been superseded by a newer `persist` is skipped.

mod remote;

pub use remote::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::db::LocalSlots;
use crate::errors::AppError;
use crate::models::Dataset;

/// How a background push ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote accepted the snapshot.
    Written,
    /// The push failed; the snapshot only exists locally until the next mutation.
    Failed,
    /// A newer snapshot was persisted before this one got its turn.
    Superseded,
    /// No remote endpoint is configured.
    Disabled,
}

/// Handle to a background remote push. Dropping it detaches the task.
#[derive(Debug)]
pub struct SyncHandle {
    task: Option<JoinHandle<SyncOutcome>>,
}

impl SyncHandle {
    fn disabled() -> Self {
        Self { task: None }
    }

    /// Wait for the push to finish.
    pub async fn outcome(self) -> SyncOutcome {
        match self.task {
            Some(task) => task.await.unwrap_or(SyncOutcome::Failed),
            None => SyncOutcome::Disabled,
        }
    }
}

#[derive(Clone)]
pub struct DocumentStore {
    remote: Option<RemoteEndpoint>,
    local: LocalSlots,
    remote_lock: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl DocumentStore {
    pub fn new(remote: Option<RemoteEndpoint>, local: LocalSlots) -> Self {
        Self {
            remote,
            local,
            remote_lock: Arc::new(Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Load the dataset: remote if it has data, else local slots, else seed.
    pub async fn load(&self) -> Dataset {
        match &self.remote {
            Some(remote) => {
                let _guard = self.remote_lock.lock().await;
                match remote.fetch().await {
                    Ok(Some(dataset)) => {
                        info!(records = dataset.len(), "Loaded dataset from remote");
                        return dataset;
                    }
                    Ok(None) => warn!("Remote returned no collections, using local fallback"),
                    Err(e) => warn!("Remote fetch failed, using local fallback: {}", e),
                }
            }
            None => debug!("Remote not configured, using local fallback"),
        }

        self.local.load_dataset().await
    }

    /// Write the dataset locally, then push it to the remote in the background.
    ///
    /// Returns once the local write is durable. Background failures are logged only.
    pub async fn persist(&self, dataset: Dataset) -> Result<SyncHandle, AppError> {
        self.local.save_dataset(&dataset).await?;

        let Some(remote) = self.remote.clone() else {
            return Ok(SyncHandle::disabled());
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.generation.clone();
        let lock = self.remote_lock.clone();

        let task = tokio::spawn(async move {
            let _guard = lock.lock().await;

            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "Skipping superseded background sync");
                return SyncOutcome::Superseded;
            }

            match remote.push(&dataset).await {
                Ok(()) => {
                    debug!(generation, "Background sync written");
                    SyncOutcome::Written
                }
                Err(e) => {
                    warn!(generation, "Background sync failed: {}", e);
                    SyncOutcome::Failed
                }
            }
        });

        Ok(SyncHandle { task: Some(task) })
    }

    /// Push the dataset to the remote and report whether it was accepted.
    ///
    /// Local slots are left untouched.
    pub async fn override_remote(&self, dataset: &Dataset) -> bool {
        let Some(remote) = &self.remote else {
            warn!("Remote push requested but no remote endpoint is configured");
            return false;
        };

        let _guard = self.remote_lock.lock().await;
        match remote.push(dataset).await {
            Ok(()) => {
                info!(records = dataset.len(), "Remote overwritten");
                true
            }
            Err(e) => {
                warn!("Remote overwrite failed: {}", e);
                false
            }
        }
    }
}
