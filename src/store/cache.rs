//! List cache with request deduplication

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, Shared};

use crate::error::Error;
use crate::repository::ListFilter;

pub(crate) type FetchOutcome<E> = Result<Arc<Vec<E>>, Arc<Error>>;
pub(crate) type SharedFetch<E> = Shared<BoxFuture<'static, FetchOutcome<E>>>;

pub(crate) type CacheKey = Option<ListFilter>;

/// What a list read currently looks like to the presentation layer
#[derive(Debug, Clone)]
pub enum QueryState<E> {
    /// Never requested, or invalidated since
    Idle,
    Loading,
    Ready(Arc<Vec<E>>),
    Failed(String),
}

impl<E> QueryState<E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&Arc<Vec<E>>> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

enum Entry<E> {
    Loading { fetch: SharedFetch<E>, ticket: u64 },
    Ready { data: Arc<Vec<E>>, fetched_at: Instant },
    Failed { error: Arc<Error> },
}

/// Either a fresh cached list or the fetch to await for it
pub(crate) enum Lookup<E> {
    Hit(Arc<Vec<E>>),
    Pending { fetch: SharedFetch<E>, ticket: u64 },
}

struct Entries<E> {
    map: HashMap<CacheKey, Entry<E>>,
    next_ticket: u64,
}

pub(crate) struct QueryCache<E> {
    entries: Mutex<Entries<E>>,
    stale_time: Option<Duration>,
}

impl<E> QueryCache<E> {
    pub(crate) fn new(stale_time: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                next_ticket: 0,
            }),
            stale_time,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries<E>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, fetched_at: Instant) -> bool {
        self.stale_time
            .map_or(true, |stale_time| fetched_at.elapsed() < stale_time)
    }

    /// Returns the cached list, joins the in-flight fetch for `key`, or
    /// registers the fetch built by `start`.
    pub(crate) fn lookup(
        &self,
        key: &CacheKey,
        start: impl FnOnce() -> SharedFetch<E>,
    ) -> Lookup<E> {
        let mut entries = self.lock();
        match entries.map.get(key) {
            Some(Entry::Ready { data, fetched_at }) if self.is_fresh(*fetched_at) => {
                return Lookup::Hit(Arc::clone(data));
            }
            Some(Entry::Loading { fetch, ticket }) => {
                return Lookup::Pending {
                    fetch: fetch.clone(),
                    ticket: *ticket,
                };
            }
            _ => {}
        }

        entries.next_ticket += 1;
        let ticket = entries.next_ticket;
        let fetch = start();
        entries.map.insert(
            key.clone(),
            Entry::Loading {
                fetch: fetch.clone(),
                ticket,
            },
        );
        Lookup::Pending { fetch, ticket }
    }

    /// Records the outcome of fetch `ticket`. A fetch that was invalidated
    /// while in flight is not recorded.
    pub(crate) fn settle(&self, key: &CacheKey, ticket: u64, outcome: &FetchOutcome<E>) {
        let mut entries = self.lock();
        let current = matches!(
            entries.map.get(key),
            Some(Entry::Loading { ticket: t, .. }) if *t == ticket
        );
        if !current {
            return;
        }
        let entry = match outcome {
            Ok(data) => Entry::Ready {
                data: Arc::clone(data),
                fetched_at: Instant::now(),
            },
            Err(error) => Entry::Failed {
                error: Arc::clone(error),
            },
        };
        entries.map.insert(key.clone(), entry);
    }

    pub(crate) fn state(&self, key: &CacheKey) -> QueryState<E> {
        match self.lock().map.get(key) {
            None => QueryState::Idle,
            Some(Entry::Loading { .. }) => QueryState::Loading,
            Some(Entry::Ready { data, .. }) => QueryState::Ready(Arc::clone(data)),
            Some(Entry::Failed { error }) => QueryState::Failed(error.to_string()),
        }
    }

    /// Drops every cached list, filtered or not
    pub(crate) fn invalidate_all(&self) {
        self.lock().map.clear();
    }
}
