//! Cached list reads and mutations for one entity
//!
//! [`EntityStore`] is generic over a [`FieldMapper`] and instantiated once
//! per entity. Reads are cached per filter and deduplicated while in
//! flight; every successful mutation drops all cached lists of the entity
//! so the next read refetches. Nothing is applied locally before the
//! storage layer confirms it, and nothing is retried.

mod cache;
mod notify;

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;

use crate::error::{Error, Result};
use crate::mapper::{AssetMapper, ClientMapper, FieldMapper, MaintenanceMapper, RepairMapper};
use crate::repository::{ListFilter, Repository};

use self::cache::{CacheKey, Lookup, QueryCache};

pub use self::cache::QueryState;
pub use self::notify::{ChannelNotifier, Notification, NotificationKind, Notifier, TracingNotifier};

pub type AssetStore = EntityStore<AssetMapper>;
pub type ClientStore = EntityStore<ClientMapper>;
pub type RepairStore = EntityStore<RepairMapper>;
pub type MaintenanceStore = EntityStore<MaintenanceMapper>;

pub struct EntityStore<M: FieldMapper> {
    repository: Arc<dyn Repository<M>>,
    notifier: Arc<dyn Notifier>,
    cache: QueryCache<M::Entity>,
}

impl<M: FieldMapper> EntityStore<M> {
    pub fn new(repository: Arc<dyn Repository<M>>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_stale_time(repository, notifier, None)
    }

    /// Like [`EntityStore::new`], but cached lists older than `stale_time`
    /// are refetched on the next read
    pub fn with_stale_time(
        repository: Arc<dyn Repository<M>>,
        notifier: Arc<dyn Notifier>,
        stale_time: Option<Duration>,
    ) -> Self {
        Self {
            repository,
            notifier,
            cache: QueryCache::new(stale_time),
        }
    }

    /// All entities matching `filter`, newest first.
    ///
    /// Concurrent calls for the same filter share one request. An
    /// unfiltered read that finds the table empty inserts the seed rows
    /// and reads again, once. Failures are wrapped in [`Error::Shared`];
    /// [`Error::root`] gives back the original error.
    pub async fn list(&self, filter: Option<ListFilter>) -> Result<Arc<Vec<M::Entity>>> {
        let key: CacheKey = filter;
        let (fetch, ticket) = match self.cache.lookup(&key, || self.start_fetch(key.clone())) {
            Lookup::Hit(data) => return Ok(data),
            Lookup::Pending { fetch, ticket } => (fetch, ticket),
        };

        let outcome = fetch.await;
        self.cache.settle(&key, ticket, &outcome);
        outcome.map_err(Error::Shared)
    }

    /// Current state of the cached read for `filter`, without fetching
    pub fn state(&self, filter: Option<&ListFilter>) -> QueryState<M::Entity> {
        self.cache.state(&filter.cloned())
    }

    /// Looks `id` up in the unfiltered list
    pub async fn find(&self, id: &str) -> Result<Option<M::Entity>> {
        let entities = self.list(None).await?;
        Ok(entities.iter().find(|e| M::entity_id(e) == id).cloned())
    }

    /// Drops every cached list of this entity
    pub fn invalidate(&self) {
        tracing::debug!(cache_key = M::CACHE_KEY, "invalidating cached lists");
        self.cache.invalidate_all();
    }

    pub async fn add(&self, draft: &M::Draft) -> Result<M::Entity> {
        let outcome = async {
            let row = self.repository.insert(&M::to_new_row(draft)).await?;
            Ok::<_, Error>(M::from_row(row)?)
        }
        .await;
        let messages = M::MESSAGES;
        self.finish("add", outcome, messages.created, messages.create_failed)
    }

    /// Sends only the fields present in `patch`
    pub async fn update(&self, id: &str, patch: &M::Patch) -> Result<M::Entity> {
        let outcome = async {
            let row = self.repository.update(id, &M::to_row_patch(patch)).await?;
            Ok::<_, Error>(M::from_row(row)?)
        }
        .await;
        let messages = M::MESSAGES;
        self.finish("update", outcome, messages.updated, messages.update_failed)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let outcome = self.repository.delete(id).await;
        let messages = M::MESSAGES;
        self.finish("delete", outcome, messages.deleted, messages.delete_failed)
    }

    fn finish<T>(
        &self,
        operation: &str,
        outcome: Result<T>,
        (title, description): (&str, &str),
        failure: &str,
    ) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.invalidate();
                self.notifier.notify(Notification::success(title, description));
                Ok(value)
            }
            Err(err) => {
                tracing::error!(table = M::TABLE, operation, error = %err, "mutation failed");
                self.notifier.notify(Notification::error(failure));
                Err(err)
            }
        }
    }

    fn start_fetch(&self, filter: CacheKey) -> cache::SharedFetch<M::Entity> {
        let repository = Arc::clone(&self.repository);
        async move {
            fetch_entities::<M>(repository.as_ref(), filter.as_ref())
                .await
                .map(Arc::new)
                .map_err(|err| {
                    tracing::error!(cache_key = M::CACHE_KEY, error = %err, "list fetch failed");
                    Arc::new(err)
                })
        }
        .boxed()
        .shared()
    }
}

async fn fetch_entities<M: FieldMapper>(
    repository: &dyn Repository<M>,
    filter: Option<&ListFilter>,
) -> Result<Vec<M::Entity>> {
    let mut rows = repository.fetch_all(filter).await?;

    if rows.is_empty() && filter.is_none() {
        let seed = M::seed_rows();
        if !seed.is_empty() {
            tracing::info!(table = M::TABLE, rows = seed.len(), "table is empty, inserting seed rows");
            repository.insert_many(&seed).await?;
            rows = repository.fetch_all(filter).await?;
        }
    }

    rows.into_iter()
        .map(|row| M::from_row(row).map_err(Error::from))
        .collect()
}
