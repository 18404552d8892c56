#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};

    use crate::error_handling::types::{GatewayError, RepositoryError};
    use crate::feedback::types::{FeedbackItem, FeedbackStatus, FeedbackType, NewFeedback, Priority};
    use crate::gateway::remote_trait::FeedbackRemote;
    use crate::gateway::types::RemotePage;
    use crate::query::pipeline;
    use crate::query::types::{FeedbackQuery, SortKey};
    use crate::repository::{DataSource, FeedbackRepository, SaveOutcome, SyncState};
    use crate::storage::file_storage::FileStore;
    use crate::storage::memory_storage::MemoryStore;
    use crate::storage::storage_trait::FallbackStore;

    // In-process stand-in for the remote service. Server ids are numeric, like the real backend.
    struct FakeRemote {
        online: AtomicBool,
        // Rating the server echoes back on create; `u8::MAX` echoes what was sent.
        echo_rating: AtomicU8,
        items: Mutex<Vec<FeedbackItem>>,
        next_id: AtomicUsize,
        searches: AtomicUsize,
        creates: AtomicUsize,
        status_updates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl FakeRemote {
        fn with_items(items: Vec<FeedbackItem>) -> Self {
            Self {
                online: AtomicBool::new(true),
                echo_rating: AtomicU8::new(u8::MAX),
                items: Mutex::new(items),
                next_id: AtomicUsize::new(100),
                searches: AtomicUsize::new(0),
                creates: AtomicUsize::new(0),
                status_updates: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }

        fn set_online(&self, online: bool) {
            self.online.store(online, Ordering::SeqCst);
        }

        fn reachable(&self) -> Result<(), GatewayError> {
            if self.online.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(GatewayError::NetworkUnreachable("connection refused".into()))
            }
        }

        fn network_calls(&self) -> usize {
            self.searches.load(Ordering::SeqCst)
                + self.creates.load(Ordering::SeqCst)
                + self.status_updates.load(Ordering::SeqCst)
                + self.deletes.load(Ordering::SeqCst)
        }
    }

    impl FeedbackRemote for FakeRemote {
        async fn create(&self, item: &FeedbackItem) -> Result<FeedbackItem, GatewayError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.reachable()?;
            let mut stored = item.clone();
            stored.id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
            let echo = self.echo_rating.load(Ordering::SeqCst);
            if echo != u8::MAX {
                stored.rating = echo;
            }
            self.items.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn search(&self, query: &FeedbackQuery) -> Result<RemotePage, GatewayError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.reachable()?;
            let items = self.items.lock().unwrap().clone();
            let page = pipeline::run(&items, query)
                .map_err(|e| GatewayError::RemoteRejected { status: 400, body: e.to_string() })?;
            Ok(RemotePage {
                content: page.content,
                total_pages: page.total_pages,
                total_elements: page.total_elements,
            })
        }

        async fn update_status(
            &self,
            id: &str,
            status: FeedbackStatus,
        ) -> Result<FeedbackItem, GatewayError> {
            self.status_updates.fetch_add(1, Ordering::SeqCst);
            self.reachable()?;
            let mut items = self.items.lock().unwrap();
            let item = items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| GatewayError::RemoteRejected { status: 404, body: "Not found".into() })?;
            item.status = status;
            Ok(item.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), GatewayError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.reachable()?;
            self.items.lock().unwrap().retain(|i| i.id != id);
            Ok(())
        }
    }

    fn item(id: &str, title: &str, rating: u8, day: u32) -> FeedbackItem {
        FeedbackItem {
            id: id.to_string(),
            author_name: "Ann".into(),
            author_email: "ann@example.com".into(),
            kind: FeedbackType::Bug,
            priority: Priority::Medium,
            title: title.to_string(),
            description: "details".into(),
            rating,
            status: FeedbackStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
        }
    }

    fn draft(title: &str) -> NewFeedback {
        NewFeedback {
            author_name: "Bob".into(),
            author_email: "bob@example.com".into(),
            kind: FeedbackType::Feature,
            priority: Priority::High,
            title: title.to_string(),
            description: "please add it".into(),
            rating: 4,
        }
    }

    fn seeded() -> Vec<FeedbackItem> {
        vec![
            item("1", "Login broken", 2, 1),
            item("2", "Dark mode", 5, 2),
            item("3", "Slow search", 3, 3),
        ]
    }

    fn repository(
        remote: Vec<FeedbackItem>,
        stored: Vec<FeedbackItem>,
    ) -> (Arc<FakeRemote>, Arc<MemoryStore>, FeedbackRepository<FakeRemote, MemoryStore>) {
        let remote = Arc::new(FakeRemote::with_items(remote));
        let store = Arc::new(MemoryStore::new());
        store.save_snapshot(&stored).unwrap();
        let repo = FeedbackRepository::open(remote.clone(), store.clone()).unwrap();
        (remote, store, repo)
    }

    #[tokio::test]
    async fn open_starts_from_persisted_snapshot() {
        let (_, _, repo) = repository(vec![], seeded());
        assert_eq!(repo.snapshot(), seeded());
        assert!(!repo.is_degraded());
    }

    #[tokio::test]
    async fn list_overwrites_local_snapshot() {
        let (_, store, repo) = repository(seeded(), vec![item("old", "Stale", 1, 9)]);

        let listing = repo.list().await.unwrap();
        assert_eq!(listing.source, DataSource::Remote);
        assert_eq!(listing.items.len(), 3);
        assert!(listing.items.iter().all(|i| i.id != "old"));
        assert_eq!(store.load_snapshot().unwrap(), listing.items);
        assert_eq!(repo.snapshot(), listing.items);
        assert!(!repo.is_degraded());
    }

    #[tokio::test]
    async fn list_pages_through_the_remote() {
        let many: Vec<_> = (1..=7).map(|n| item(&n.to_string(), "Item", 3, n)).collect();
        let remote = Arc::new(FakeRemote::with_items(many));
        let repo = FeedbackRepository::open(remote.clone(), Arc::new(MemoryStore::new()))
            .unwrap()
            .with_sync_page_size(3);

        let listing = repo.list().await.unwrap();
        assert_eq!(listing.items.len(), 7);
        assert_eq!(remote.searches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn degraded_list_returns_last_persisted_snapshot() {
        let (remote, store, repo) = repository(seeded(), vec![]);
        let online = repo.list().await.unwrap().items;
        remote.set_online(false);

        let listing = repo.list().await.unwrap();
        assert_eq!(listing.source, DataSource::Fallback);
        assert!(listing.is_degraded());
        assert!(repo.is_degraded());
        assert_eq!(listing.items, online);
        assert_eq!(store.load_snapshot().unwrap(), online);

        remote.set_online(true);
        repo.list().await.unwrap();
        assert!(!repo.is_degraded());
    }

    #[tokio::test]
    async fn list_drops_records_with_rating_out_of_range() {
        let mut broken = item("9", "Rated nine", 5, 4);
        broken.rating = 9;
        let mut remote_items = seeded();
        remote_items.push(broken);
        let (_, store, repo) = repository(remote_items, vec![]);

        let listing = repo.list().await.unwrap();
        assert_eq!(listing.items.len(), 3);
        assert!(listing.items.iter().all(|i| (1..=5).contains(&i.rating)));
        assert!(store.load_snapshot().unwrap().iter().all(|i| i.id != "9"));

        let now = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let stats = repo.stats(now);
        assert_eq!(stats.rating_distribution.iter().sum::<usize>(), stats.total);
    }

    #[tokio::test]
    async fn create_keeps_local_copy_when_server_echo_is_invalid() {
        let (remote, _, repo) = repository(vec![], vec![]);
        remote.echo_rating.store(0, Ordering::SeqCst);

        let outcome = repo.create(draft("Export to CSV")).await.unwrap();
        let SaveOutcome::SavedRemote(saved) = outcome else {
            panic!("expected a remote save");
        };
        assert_eq!(saved.id, "100");
        assert_eq!(saved.rating, 4);
        assert_eq!(repo.snapshot(), vec![saved]);
    }

    #[tokio::test]
    async fn create_online_uses_server_record() {
        let (remote, store, repo) = repository(seeded(), seeded());

        let outcome = repo.create(draft("Export to CSV")).await.unwrap();
        let SaveOutcome::SavedRemote(saved) = outcome else {
            panic!("expected a remote save");
        };
        assert_eq!(saved.id, "100");
        assert_eq!(saved.status, FeedbackStatus::Pending);
        assert_eq!(remote.creates.load(Ordering::SeqCst), 1);
        assert!(store.load_snapshot().unwrap().contains(&saved));
    }

    #[tokio::test]
    async fn create_then_list_contains_item_once() {
        let (_, _, repo) = repository(seeded(), vec![]);
        let saved = repo.create(draft("Export to CSV")).await.unwrap().into_item();

        let listing = repo.list().await.unwrap();
        let copies = listing.items.iter().filter(|i| i.id == saved.id).count();
        assert_eq!(copies, 1);
    }

    #[tokio::test]
    async fn create_offline_keeps_generated_id() {
        let (remote, store, repo) = repository(vec![], vec![]);
        remote.set_online(false);

        let outcome = repo.create(draft("  Export to CSV  ")).await.unwrap();
        assert!(outcome.is_offline());
        let saved = outcome.into_item();
        assert!(uuid::Uuid::parse_str(&saved.id).is_ok());
        assert_eq!(saved.title, "Export to CSV");
        assert_eq!(store.load_snapshot().unwrap(), vec![saved.clone()]);

        let listing = repo.list().await.unwrap();
        assert_eq!(listing.items.iter().filter(|i| i.id == saved.id).count(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_remote() {
        let (remote, store, repo) = repository(vec![], vec![]);
        let mut bad = draft("");
        bad.rating = 0;
        bad.author_email = "bob".into();

        let err = repo.create(bad).await.unwrap_err();
        let RepositoryError::ValidationFailed(issues) = err else {
            panic!("expected a validation failure");
        };
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["email", "title", "rating"]);
        assert_eq!(remote.network_calls(), 0);
        assert!(store.load_snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_status_unknown_id_is_not_found() {
        let (remote, store, repo) = repository(seeded(), seeded());

        let err = repo.update_status("nope", FeedbackStatus::Resolved).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(id) if id == "nope"));
        assert_eq!(remote.network_calls(), 0);
        assert_eq!(repo.snapshot(), seeded());
        assert_eq!(store.load_snapshot().unwrap(), seeded());
    }

    #[tokio::test]
    async fn update_status_changes_only_status() {
        let (_, store, repo) = repository(seeded(), seeded());

        let change = repo.update_status("2", FeedbackStatus::InProgress).await.unwrap();
        assert_eq!(change.sync, SyncState::Synced);

        let mut expected = seeded();
        expected[1].status = FeedbackStatus::InProgress;
        assert_eq!(change.item, expected[1]);
        assert_eq!(repo.snapshot(), expected);
        assert_eq!(store.load_snapshot().unwrap(), expected);
    }

    #[tokio::test]
    async fn update_status_is_idempotent() {
        let (_, _, repo) = repository(seeded(), seeded());
        repo.update_status("1", FeedbackStatus::Resolved).await.unwrap();
        let once = repo.snapshot();
        repo.update_status("1", FeedbackStatus::Resolved).await.unwrap();
        assert_eq!(repo.snapshot(), once);
    }

    #[tokio::test]
    async fn update_status_offline_applies_locally() {
        let (remote, store, repo) = repository(seeded(), seeded());
        remote.set_online(false);

        let change = repo.update_status("3", FeedbackStatus::Closed).await.unwrap();
        assert_eq!(change.sync, SyncState::LocalOnly);
        assert_eq!(store.load_snapshot().unwrap()[2].status, FeedbackStatus::Closed);
    }

    #[tokio::test]
    async fn remote_rejection_is_local_only() {
        // Present locally, unknown to the server.
        let (_, _, repo) = repository(vec![], seeded());
        let change = repo.update_status("1", FeedbackStatus::Resolved).await.unwrap();
        assert_eq!(change.sync, SyncState::LocalOnly);
        assert_eq!(change.item.status, FeedbackStatus::Resolved);
    }

    #[tokio::test]
    async fn remove_deletes_locally_regardless() {
        let (remote, store, repo) = repository(seeded(), seeded());

        let removal = repo.remove("1").await.unwrap();
        assert_eq!(removal.sync, SyncState::Synced);

        remote.set_online(false);
        let removal = repo.remove("2").await.unwrap();
        assert_eq!(removal.sync, SyncState::LocalOnly);

        let ids: Vec<_> = store.load_snapshot().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["3"]);
        assert!(matches!(repo.remove("1").await, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_uses_remote_then_falls_back() {
        let (remote, _, repo) = repository(seeded(), seeded());
        let query = FeedbackQuery::default().sorted_by(SortKey::Rating).page(1, 2);

        let online = repo.search(&query).await.unwrap();
        assert_eq!(online.source, DataSource::Remote);
        assert_eq!(online.page.total_elements, 3);

        remote.set_online(false);
        let offline = repo.search(&query).await.unwrap();
        assert!(offline.is_degraded());
        assert!(repo.is_degraded());
        assert_eq!(offline.page, online.page);
    }

    #[tokio::test]
    async fn search_rejects_zero_page_before_network() {
        let (remote, _, repo) = repository(seeded(), seeded());
        let query = FeedbackQuery::default().page(0, 5);
        assert!(matches!(
            repo.search(&query).await,
            Err(RepositoryError::InvalidQuery(_))
        ));
        assert_eq!(remote.network_calls(), 0);
    }

    #[tokio::test]
    async fn corrupt_store_surfaces_as_storage_error() {
        let (remote, store, repo) = repository(seeded(), vec![]);
        store.write(crate::storage::StoreKey::Feedback, "{ not json").unwrap();
        remote.set_online(false);
        assert!(matches!(repo.list().await, Err(RepositoryError::Storage(_))));
    }

    #[tokio::test]
    async fn snapshot_survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FakeRemote::with_items(seeded()));
        {
            let store = Arc::new(FileStore::new(dir.path()).unwrap());
            let repo = FeedbackRepository::open(remote.clone(), store).unwrap();
            repo.list().await.unwrap();
            repo.update_status("2", FeedbackStatus::Resolved).await.unwrap();
        }

        remote.set_online(false);
        let store = Arc::new(FileStore::new(dir.path()).unwrap());
        let repo = FeedbackRepository::open(remote, store).unwrap();
        let listing = repo.list().await.unwrap();
        assert!(listing.is_degraded());
        assert_eq!(listing.items.len(), 3);
        assert_eq!(listing.items[1].status, FeedbackStatus::Resolved);
    }

    #[tokio::test]
    async fn stats_summarize_snapshot() {
        let (_, _, repo) = repository(vec![], seeded());
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let stats = repo.stats(now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_rating, 3.3);
        assert_eq!(stats.timeline[2], 3);
    }

    #[tokio::test]
    async fn concurrent_status_updates_last_write_wins() {
        let (_, _, repo) = repository(seeded(), seeded());
        let repo = Arc::new(repo);
        let (a, b) = tokio::join!(
            repo.update_status("1", FeedbackStatus::InProgress),
            repo.update_status("1", FeedbackStatus::Resolved),
        );
        let a = a.unwrap();
        let b = b.unwrap();
        let final_status = repo.snapshot()[0].status;
        assert!(final_status == a.item.status || final_status == b.item.status);
        assert_eq!(repo.snapshot().len(), 3);
    }
}
