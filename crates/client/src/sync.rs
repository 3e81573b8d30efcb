//! Cached, invalidating access to the transactions collection.
//!
//! Reads go through the [`QueryCache`]: fresh data is served without a
//! request, stale or missing data is fetched with one automatic retry.
//! Writes are never retried; a successful write invalidates every
//! transactions query and refetches the watched ones before returning.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use api_types::transaction::{NewTransaction, Transaction, TransactionType, TransactionUpdate};
use tokio::time::{Instant, sleep};

use crate::{
    cache::{QueryCache, QueryKey, QueryState, TRANSACTIONS},
    client::{ClientError, TransactionService},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    /// How long fetched data is served without refetching.
    pub stale_time: Duration,
    /// How long an unwatched, unused entry is kept.
    pub gc_time: Duration,
    /// Delay before the single retry of a failed read.
    pub retry_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(10 * 60),
            retry_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Success,
    Error(String),
}

/// Last known state of each kind of write.
#[derive(Clone, Debug, Default)]
pub struct MutationTracker {
    create: MutationState,
    update: MutationState,
    delete: MutationState,
}

impl MutationTracker {
    pub fn state(&self, kind: MutationKind) -> &MutationState {
        match kind {
            MutationKind::Create => &self.create,
            MutationKind::Update => &self.update,
            MutationKind::Delete => &self.delete,
        }
    }

    fn set(&mut self, kind: MutationKind, state: MutationState) {
        match kind {
            MutationKind::Create => self.create = state,
            MutationKind::Update => self.update = state,
            MutationKind::Delete => self.delete = state,
        }
    }
}

/// Locks are never held across an await. Poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A read registered with `begin_fetch`. Dropping it before `complete`
/// abandons the fetch.
struct PendingFetch<'a, T: Clone> {
    cache: &'a Mutex<QueryCache<T>>,
    key: QueryKey,
    seq: Option<u64>,
}

impl<'a, T: Clone> PendingFetch<'a, T> {
    fn begin(cache: &'a Mutex<QueryCache<T>>, key: QueryKey) -> Self {
        let seq = lock(cache).begin_fetch(key, Instant::now());
        Self {
            cache,
            key,
            seq: Some(seq),
        }
    }

    fn complete(mut self, outcome: Result<T, String>) -> bool {
        match self.seq.take() {
            Some(seq) => lock(self.cache).complete_fetch(self.key, seq, outcome, Instant::now()),
            None => false,
        }
    }
}

impl<T: Clone> Drop for PendingFetch<'_, T> {
    fn drop(&mut self) {
        if self.seq.is_some() {
            tracing::debug!("abandoned {} fetch", self.key.resource);
            lock(self.cache).abandon_fetch(self.key, Instant::now());
        }
    }
}

/// A write marked `Pending`. Dropping it before `finish` puts the mutation
/// back to `Idle`.
struct PendingMutation<'a> {
    tracker: &'a Mutex<MutationTracker>,
    kind: MutationKind,
    done: bool,
}

impl<'a> PendingMutation<'a> {
    fn start(tracker: &'a Mutex<MutationTracker>, kind: MutationKind) -> Self {
        lock(tracker).set(kind, MutationState::Pending);
        Self {
            tracker,
            kind,
            done: false,
        }
    }

    fn finish(mut self, state: MutationState) {
        self.done = true;
        lock(self.tracker).set(self.kind, state);
    }
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!("abandoned {:?} mutation", self.kind);
            lock(self.tracker).set(self.kind, MutationState::Idle);
        }
    }
}

pub struct TransactionsSync<S> {
    service: S,
    options: SyncOptions,
    cache: Mutex<QueryCache<Vec<Transaction>>>,
    mutations: Mutex<MutationTracker>,
}

impl<S: TransactionService> TransactionsSync<S> {
    pub fn new(service: S) -> Self {
        Self::with_options(service, SyncOptions::default())
    }

    pub fn with_options(service: S, options: SyncOptions) -> Self {
        Self {
            service,
            options,
            cache: Mutex::new(QueryCache::new(options.stale_time)),
            mutations: Mutex::new(MutationTracker::default()),
        }
    }

    /// Returns the transactions for `filter`, from cache when fresh.
    pub async fn transactions(
        &self,
        filter: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, ClientError> {
        let key = QueryKey::transactions(filter);
        {
            let mut cache = lock(&self.cache);
            let now = Instant::now();
            let evicted = cache.collect_garbage(now, self.options.gc_time);
            if evicted > 0 {
                tracing::debug!("evicted {evicted} idle queries");
            }
            if let Some(data) = cache.fresh(key, now) {
                return Ok(data);
            }
        }

        self.fetch(key).await
    }

    /// Fetches `filter` again regardless of freshness.
    pub async fn refetch(
        &self,
        filter: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, ClientError> {
        self.fetch(QueryKey::transactions(filter)).await
    }

    pub fn snapshot(&self, filter: Option<TransactionType>) -> QueryState<Vec<Transaction>> {
        lock(&self.cache).state(QueryKey::transactions(filter), Instant::now())
    }

    /// Registers an observer: watched queries are refetched after each write
    /// and never evicted.
    pub fn watch(&self, filter: Option<TransactionType>) {
        lock(&self.cache).watch(QueryKey::transactions(filter), Instant::now());
    }

    pub fn unwatch(&self, filter: Option<TransactionType>) {
        lock(&self.cache).unwatch(QueryKey::transactions(filter), Instant::now());
    }

    pub fn collect_garbage(&self) -> usize {
        lock(&self.cache).collect_garbage(Instant::now(), self.options.gc_time)
    }

    pub fn is_cached(&self, filter: Option<TransactionType>) -> bool {
        lock(&self.cache).contains(QueryKey::transactions(filter))
    }

    pub fn mutation_state(&self, kind: MutationKind) -> MutationState {
        lock(&self.mutations).state(kind).clone()
    }

    pub async fn create(&self, new: NewTransaction) -> Result<Transaction, ClientError> {
        let pending = PendingMutation::start(&self.mutations, MutationKind::Create);
        let result = self.service.create(new).await;
        self.finish(pending, result).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, ClientError> {
        let pending = PendingMutation::start(&self.mutations, MutationKind::Update);
        let result = self.service.update(id, update).await;
        self.finish(pending, result).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let pending = PendingMutation::start(&self.mutations, MutationKind::Delete);
        let result = self.service.delete(id).await;
        self.finish(pending, result).await
    }

    async fn fetch(&self, key: QueryKey) -> Result<Vec<Transaction>, ClientError> {
        let pending = PendingFetch::begin(&self.cache, key);

        let result = match self.service.list(key.filter).await {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::warn!(
                    "fetching {} failed, retrying in {:?}: {err}",
                    key.resource,
                    self.options.retry_delay
                );
                sleep(self.options.retry_delay).await;
                self.service.list(key.filter).await
            }
        };

        let outcome = match &result {
            Ok(data) => Ok(data.clone()),
            Err(err) => Err(err.to_string()),
        };
        if !pending.complete(outcome) {
            tracing::debug!("discarded superseded {} result", key.resource);
        }

        result
    }

    async fn finish<T>(
        &self,
        pending: PendingMutation<'_>,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        match &result {
            Ok(_) => {
                pending.finish(MutationState::Success);
                self.invalidate().await;
            }
            Err(err) => pending.finish(MutationState::Error(err.to_string())),
        }
        result
    }

    async fn invalidate(&self) {
        let watched = lock(&self.cache).invalidate(TRANSACTIONS);
        for key in watched {
            if let Err(err) = self.fetch(key).await {
                tracing::warn!("refetch after write failed: {err}");
            }
        }
    }
}
