//! The directory: the single in-memory dataset and every mutation on it.
//!
//! Each mutation is one reconciler call followed by one persist call, done while
//! holding the dataset lock, so the in-memory copy and the local fallback never
//! diverge. The remote push runs in the background.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::{seed_dataset, Dataset, Record, RecordKind, RevisionInfo, Status};
use crate::moderation::{self, SubmissionPath};
use crate::reconcile;
use crate::session::Commit;
use crate::store::{DocumentStore, SyncHandle};

pub const SYNC_REJECTED: &str =
    "Сервер вернул ошибку. Проверьте настройки скрипта (Разрешения: Anyone).";
pub const REMOTE_NOT_CONFIGURED: &str = "Ошибка: URL удалённого хранилища не настроен.";
pub const APPROVED_RECORD_LOCKED: &str =
    "Опубликованную запись может изменить только администратор.";

/// Result of an accepted mutation.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub revision_id: i64,
    /// Background remote push of the new snapshot.
    pub sync: SyncHandle,
}

/// Outcome of an explicit push to the remote endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub item_count: usize,
    pub seeded: bool,
}

struct DirectoryState {
    dataset: Dataset,
    revision: RevisionInfo,
}

impl DirectoryState {
    fn bump(&mut self, dataset: Dataset) -> i64 {
        self.dataset = dataset;
        self.revision = RevisionInfo {
            revision_id: self.revision.revision_id + 1,
            generated_at: Utc::now().to_rfc3339(),
        };
        self.revision.revision_id
    }
}

pub struct Directory {
    store: DocumentStore,
    state: Mutex<DirectoryState>,
}

impl Directory {
    /// Load the dataset through the store and start at revision 0.
    pub async fn open(store: DocumentStore) -> Self {
        let dataset = store.load().await;
        info!(
            events = dataset.events.len(),
            help = dataset.help.len(),
            "Directory loaded"
        );

        Self {
            store,
            state: Mutex::new(DirectoryState {
                dataset,
                revision: RevisionInfo {
                    revision_id: 0,
                    generated_at: Utc::now().to_rfc3339(),
                },
            }),
        }
    }

    /// Current dataset and the revision it belongs to.
    pub async fn snapshot(&self) -> (Dataset, i64) {
        let state = self.state.lock().await;
        (state.dataset.clone(), state.revision.revision_id)
    }

    pub async fn revision_id(&self) -> i64 {
        self.state.lock().await.revision.revision_id
    }

    pub async fn revision_info(&self) -> RevisionInfo {
        self.state.lock().await.revision.clone()
    }

    /// Save a validated record via upsert.
    ///
    /// The public path may only overwrite records that are still pending.
    pub async fn save(
        &self,
        commit: Commit,
        path: SubmissionPath,
    ) -> Result<Applied<Commit>, AppError> {
        let mut state = self.state.lock().await;
        let Dataset { events, help } = state.dataset.clone();

        let next = match &commit {
            Commit::Event(event) => {
                guard_public_write(path, reconcile::find(&event.id, &events))?;
                Dataset::new(reconcile::upsert(event.clone(), events), help)
            }
            Commit::Help(offer) => {
                guard_public_write(path, reconcile::find(&offer.id, &help))?;
                Dataset::new(events, reconcile::upsert(offer.clone(), help))
            }
        };

        let sync = self.store.persist(next.clone()).await?;
        let revision_id = state.bump(next);
        info!(kind = ?commit.kind(), id = commit.id(), ?path, "Record saved");

        Ok(Applied {
            value: commit,
            revision_id,
            sync,
        })
    }

    /// Approve a record. Unknown ids are an error; approved ones are re-saved unchanged.
    pub async fn approve(&self, kind: RecordKind, id: &str) -> Result<Applied<Commit>, AppError> {
        let mut state = self.state.lock().await;
        let Dataset { events, help } = state.dataset.clone();

        let (next, approved) = match kind {
            RecordKind::Event => {
                let event = moderation::approve(find_owned(id, &events)?);
                let events = reconcile::upsert(event.clone(), events);
                (Dataset::new(events, help), Commit::Event(event))
            }
            RecordKind::Help => {
                let offer = moderation::approve(find_owned(id, &help)?);
                let help = reconcile::upsert(offer.clone(), help);
                (Dataset::new(events, help), Commit::Help(offer))
            }
        };

        let sync = self.store.persist(next.clone()).await?;
        let revision_id = state.bump(next);
        info!(?kind, id, "Record approved");

        Ok(Applied {
            value: approved,
            revision_id,
            sync,
        })
    }

    /// Delete a record. Absent ids still succeed and still persist.
    ///
    /// The public path may only withdraw pending records.
    pub async fn delete(
        &self,
        kind: RecordKind,
        id: &str,
        path: SubmissionPath,
    ) -> Result<Applied<()>, AppError> {
        let mut state = self.state.lock().await;
        let Dataset { events, help } = state.dataset.clone();

        let next = match kind {
            RecordKind::Event => {
                guard_public_write(path, reconcile::find(id, &events))?;
                Dataset::new(reconcile::remove(id, events), help)
            }
            RecordKind::Help => {
                guard_public_write(path, reconcile::find(id, &help))?;
                Dataset::new(events, reconcile::remove(id, help))
            }
        };

        let sync = self.store.persist(next.clone()).await?;
        let revision_id = state.bump(next);
        info!(?kind, id, ?path, "Record deleted");

        Ok(Applied {
            value: (),
            revision_id,
            sync,
        })
    }

    /// Push the current dataset to the remote endpoint and wait for the answer.
    ///
    /// With `seed` set and an empty directory the bundled seed is pushed instead and,
    /// once accepted, replaces the in-memory dataset if it is still empty. Local
    /// fallback is not written. The dataset lock is not held during the remote call.
    pub async fn push_to_remote(&self, seed: bool) -> Result<(SyncReport, i64), AppError> {
        let (dataset, seeded) = {
            let state = self.state.lock().await;
            if seed && state.dataset.is_empty() {
                (seed_dataset(), true)
            } else {
                (state.dataset.clone(), false)
            }
        };
        let item_count = dataset.len();

        if !self.store.has_remote() {
            return Err(AppError::SyncFailed {
                message: REMOTE_NOT_CONFIGURED.to_string(),
                item_count,
            });
        }

        if !self.store.override_remote(&dataset).await {
            return Err(AppError::SyncFailed {
                message: SYNC_REJECTED.to_string(),
                item_count,
            });
        }

        let mut state = self.state.lock().await;
        // A record saved while the push was in flight wins over the seed.
        let seeded = seeded && state.dataset.is_empty();
        let revision_id = if seeded {
            state.bump(dataset)
        } else {
            state.revision.revision_id
        };
        info!(item_count, seeded, "Dataset pushed to remote");

        Ok((SyncReport { item_count, seeded }, revision_id))
    }
}

fn find_owned<R: Record>(id: &str, collection: &[R]) -> Result<R, AppError> {
    reconcile::find(id, collection)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("{:?} {} not found", R::KIND, id)))
}

fn guard_public_write<R: Record>(path: SubmissionPath, existing: Option<&R>) -> Result<(), AppError> {
    match (path, existing) {
        (SubmissionPath::Public, Some(record)) if record.status() == Status::Approved => {
            Err(AppError::Validation(APPROVED_RECORD_LOCKED.to_string()))
        }
        _ => Ok(()),
    }
}
