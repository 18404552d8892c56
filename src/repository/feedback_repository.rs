use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

use super::types::{
    DataSource, Listing, Removal, SaveOutcome, SearchOutcome, StatusChange, SyncState,
};
use crate::analytics::{self, FeedbackStats};
use crate::configuration::types::DEFAULT_SYNC_PAGE_SIZE;
use crate::error_handling::types::{GatewayError, RepositoryError, StorageError};
use crate::feedback::types::{FeedbackItem, FeedbackStatus, NewFeedback};
use crate::feedback::validation::{validate_draft, validate_record};
use crate::gateway::remote_trait::FeedbackRemote;
use crate::query::pipeline;
use crate::query::types::FeedbackQuery;
use crate::storage::storage_trait::FallbackStore;

/// Upper bound on pages pulled by one `list`, in case the remote keeps
/// reporting more pages than it delivers.
const MAX_SYNC_PAGES: usize = 1_000;

/// Two-tier feedback collection.
///
/// Reads go to the remote first and fall back to the last persisted snapshot;
/// writes are attempted remotely and always applied locally. Reachability and
/// remote failures are never returned as errors, they show up in the outcome
/// types and in [`FeedbackRepository::is_degraded`].
///
/// The in-memory snapshot is only locked between awaits, and every mutation
/// is persisted before it becomes visible. Concurrent edits are last-write-wins.
pub struct FeedbackRepository<R, S> {
    remote: Arc<R>,
    store: Arc<S>,
    snapshot: Mutex<Vec<FeedbackItem>>,
    degraded: AtomicBool,
    sync_page_size: usize,
}

impl<R: FeedbackRemote, S: FallbackStore> FeedbackRepository<R, S> {
    /// Starts from whatever the store holds. A corrupt store is an error, an absent one is empty.
    pub fn open(remote: Arc<R>, store: Arc<S>) -> Result<Self, StorageError> {
        let snapshot = store.load_snapshot()?;
        info!("Opened feedback repository with {} cached items", snapshot.len());
        Ok(Self {
            remote,
            store,
            snapshot: Mutex::new(snapshot),
            degraded: AtomicBool::new(false),
            sync_page_size: DEFAULT_SYNC_PAGE_SIZE,
        })
    }

    pub fn with_sync_page_size(mut self, sync_page_size: usize) -> Self {
        self.sync_page_size = sync_page_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FeedbackItem>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `edit` to a copy of the snapshot, persists it, then publishes it.
    /// Nothing changes when persisting fails.
    fn commit<T>(
        &self,
        edit: impl FnOnce(&mut Vec<FeedbackItem>) -> T,
    ) -> Result<T, StorageError> {
        let mut snapshot = self.lock();
        let mut next = snapshot.clone();
        let out = edit(&mut next);
        self.store.save_snapshot(&next)?;
        *snapshot = next;
        Ok(out)
    }

    fn contains(&self, id: &str) -> bool {
        self.lock().iter().any(|item| item.id == id)
    }

    fn mark(&self, source: DataSource) {
        self.degraded.store(source.is_degraded(), Ordering::SeqCst);
    }

    /// `true` when the latest read was answered from the fallback store.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<FeedbackItem> {
        self.lock().clone()
    }

    /// Pulls every remote page. Duplicate ids (a page shifted under us) keep the
    /// first copy; records breaking the collection invariants are dropped.
    async fn fetch_all(&self) -> Result<Vec<FeedbackItem>, GatewayError> {
        let mut query = FeedbackQuery::default().page(1, self.sync_page_size);
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        loop {
            let page = self.remote.search(&query).await?;
            let received = page.content.len();
            items.extend(
                page.content
                    .into_iter()
                    .filter(accept_remote)
                    .filter(|i| seen.insert(i.id.clone())),
            );
            if received == 0 || query.page >= page.total_pages || query.page >= MAX_SYNC_PAGES {
                break;
            }
            query.page += 1;
        }
        debug!("Fetched {} items in {} page(s)", items.len(), query.page);
        Ok(items)
    }

    /// The full collection. A successful fetch overwrites the local snapshot;
    /// a failed one returns the persisted snapshot as it is.
    pub async fn list(&self) -> Result<Listing, RepositoryError> {
        match self.fetch_all().await {
            Ok(items) => {
                self.commit(|snapshot| *snapshot = items.clone())?;
                self.mark(DataSource::Remote);
                Ok(Listing {
                    items,
                    source: DataSource::Remote,
                })
            }
            Err(e) => {
                warn!("Remote listing failed, serving local snapshot: {}", e);
                let items = self.store.load_snapshot()?;
                *self.lock() = items.clone();
                self.mark(DataSource::Fallback);
                Ok(Listing {
                    items,
                    source: DataSource::Fallback,
                })
            }
        }
    }

    /// Validates and submits a draft. The item lands in the snapshot either way.
    pub async fn create(&self, draft: NewFeedback) -> Result<SaveOutcome, RepositoryError> {
        validate_draft(&draft).map_err(RepositoryError::ValidationFailed)?;
        let candidate = draft.into_item(Uuid::new_v4().to_string(), Utc::now());

        let outcome = match self.remote.create(&candidate).await {
            Ok(stored) if accept_remote(&stored) => SaveOutcome::SavedRemote(stored),
            // Accepted by the server but echoed back unusable: keep our copy under its id.
            Ok(stored) if !stored.id.trim().is_empty() => SaveOutcome::SavedRemote(FeedbackItem {
                id: stored.id,
                ..candidate
            }),
            Ok(_) => SaveOutcome::SavedOffline(candidate),
            Err(e) => {
                warn!("Remote create failed, keeping `{}` offline: {}", candidate.id, e);
                SaveOutcome::SavedOffline(candidate)
            }
        };

        let item = outcome.item().clone();
        self.commit(|snapshot| upsert(snapshot, item))?;
        info!(
            "Saved feedback `{}` ({})",
            outcome.item().id,
            if outcome.is_offline() { "offline" } else { "remote" }
        );
        Ok(outcome)
    }

    /// Moves an item to `status`. Only the status changes locally, whatever the remote says.
    pub async fn update_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<StatusChange, RepositoryError> {
        let current = self
            .lock()
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.status)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        if current.is_regression_to(status) {
            warn!("Feedback `{}` moves back from {} to {}", id, current, status);
        }

        let sync = match self.remote.update_status(id, status).await {
            Ok(_) => SyncState::Synced,
            Err(e) => {
                warn!("Remote status update of `{}` failed: {}", id, e);
                SyncState::LocalOnly
            }
        };

        let item = self
            .commit(|snapshot| {
                snapshot.iter_mut().find(|item| item.id == id).map(|item| {
                    item.status = status;
                    item.clone()
                })
            })?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        debug!("Feedback `{}` is now {} ({:?})", id, status, sync);
        Ok(StatusChange { item, sync })
    }

    /// Deletes an item remotely if possible and locally in any case.
    pub async fn remove(&self, id: &str) -> Result<Removal, RepositoryError> {
        if !self.contains(id) {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        let sync = match self.remote.delete(id).await {
            Ok(()) => SyncState::Synced,
            Err(e) => {
                warn!("Remote delete of `{}` failed: {}", id, e);
                SyncState::LocalOnly
            }
        };

        let removed = self.commit(|snapshot| {
            let before = snapshot.len();
            snapshot.retain(|item| item.id != id);
            before != snapshot.len()
        })?;
        if !removed {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        info!("Removed feedback `{}` ({:?})", id, sync);
        Ok(Removal {
            id: id.to_string(),
            sync,
        })
    }

    /// Server-side search, or the local pipeline over the snapshot when the remote fails.
    pub async fn search(&self, query: &FeedbackQuery) -> Result<SearchOutcome, RepositoryError> {
        query.validate()?;
        match self.remote.search(query).await {
            Ok(page) => {
                self.mark(DataSource::Remote);
                Ok(SearchOutcome {
                    page: page.into_page(query),
                    source: DataSource::Remote,
                })
            }
            Err(e) => {
                warn!("Remote search failed, filtering local snapshot: {}", e);
                let page = pipeline::run(&self.lock(), query)?;
                self.mark(DataSource::Fallback);
                Ok(SearchOutcome {
                    page,
                    source: DataSource::Fallback,
                })
            }
        }
    }

    pub fn stats(&self, now: DateTime<Utc>) -> FeedbackStats {
        analytics::summarize(&self.lock(), now)
    }
}

fn accept_remote(item: &FeedbackItem) -> bool {
    match validate_record(item) {
        Ok(()) => true,
        Err(issues) => {
            let reasons: Vec<String> = issues.iter().map(ToString::to_string).collect();
            warn!("Ignoring remote feedback `{}`: {}", item.id, reasons.join("; "));
            false
        }
    }
}

fn upsert(snapshot: &mut Vec<FeedbackItem>, item: FeedbackItem) {
    match snapshot.iter_mut().find(|existing| existing.id == item.id) {
        Some(existing) => *existing = item,
        None => snapshot.push(item),
    }
}
