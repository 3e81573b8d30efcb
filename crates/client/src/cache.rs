//! Query cache keyed by `(resource, filter)`.
//!
//! The cache only keeps bookkeeping; it never talks to the network. Callers
//! pass the current [`Instant`] so the time-based rules can be driven from
//! tests.

use std::{collections::HashMap, time::Duration};

use api_types::transaction::TransactionType;
use tokio::time::Instant;

/// Resource namespace of every transactions query.
pub const TRANSACTIONS: &str = "transactions";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub filter: Option<TransactionType>,
}

impl QueryKey {
    pub fn transactions(filter: Option<TransactionType>) -> Self {
        Self {
            resource: TRANSACTIONS,
            filter,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Read-only view of one cache entry.
///
/// `data` survives a failed refetch, so an `Error` status can come with the
/// last good value.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub updated_at: Option<Instant>,
    pub is_stale: bool,
}

#[derive(Debug)]
struct Entry<T> {
    data: Option<T>,
    error: Option<String>,
    updated_at: Option<Instant>,
    last_access: Instant,
    invalidated: bool,
    /// Last sequence number handed out by `begin_fetch`.
    issued_seq: u64,
    /// Sequence number of the last result written into the entry.
    applied_seq: u64,
    /// `issued_seq` at the time of the last invalidation.
    invalidated_seq: u64,
    in_flight: usize,
    observers: usize,
}

impl<T> Entry<T> {
    fn new(now: Instant) -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            last_access: now,
            invalidated: false,
            issued_seq: 0,
            applied_seq: 0,
            invalidated_seq: 0,
            in_flight: 0,
            observers: 0,
        }
    }

    fn status(&self) -> QueryStatus {
        if self.in_flight > 0 {
            QueryStatus::Loading
        } else if let Some(error) = &self.error {
            QueryStatus::Error(error.clone())
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        match (&self.data, self.updated_at) {
            (Some(_), Some(updated_at)) => {
                !self.invalidated && now.saturating_duration_since(updated_at) < stale_time
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct QueryCache<T> {
    entries: HashMap<QueryKey, Entry<T>>,
    stale_time: Duration,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time,
        }
    }

    fn entry(&mut self, key: QueryKey, now: Instant) -> &mut Entry<T> {
        self.entries.entry(key).or_insert_with(|| Entry::new(now))
    }

    /// Returns the cached value if it can be served without a fetch.
    pub fn fresh(&mut self, key: QueryKey, now: Instant) -> Option<T> {
        let stale_time = self.stale_time;
        let entry = self.entries.get_mut(&key)?;
        entry.last_access = now;
        if entry.is_fresh(now, stale_time) {
            entry.data.clone()
        } else {
            None
        }
    }

    pub fn state(&self, key: QueryKey, now: Instant) -> QueryState<T> {
        match self.entries.get(&key) {
            Some(entry) => QueryState {
                status: entry.status(),
                data: entry.data.clone(),
                updated_at: entry.updated_at,
                is_stale: !entry.is_fresh(now, self.stale_time),
            },
            None => QueryState {
                status: QueryStatus::Idle,
                data: None,
                updated_at: None,
                is_stale: true,
            },
        }
    }

    /// Marks a fetch for `key` as started and returns its sequence number.
    pub fn begin_fetch(&mut self, key: QueryKey, now: Instant) -> u64 {
        let entry = self.entry(key, now);
        entry.issued_seq += 1;
        entry.in_flight += 1;
        entry.last_access = now;
        entry.issued_seq
    }

    /// Records the outcome of the fetch numbered `seq`.
    ///
    /// Returns `false` when a newer result was already applied and this one
    /// was discarded. A fetch that started before the last invalidation is
    /// stored but the entry stays stale.
    pub fn complete_fetch(
        &mut self,
        key: QueryKey,
        seq: u64,
        result: Result<T, String>,
        now: Instant,
    ) -> bool {
        let entry = self.entry(key, now);
        entry.in_flight = entry.in_flight.saturating_sub(1);
        if seq <= entry.applied_seq {
            return false;
        }

        entry.applied_seq = seq;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.error = None;
                entry.updated_at = Some(now);
                entry.invalidated = seq <= entry.invalidated_seq;
            }
            Err(error) => entry.error = Some(error),
        }
        true
    }

    /// Forgets a fetch that will never complete, e.g. because its future was
    /// dropped. The entry keeps its last result.
    pub fn abandon_fetch(&mut self, key: QueryKey, now: Instant) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
            entry.last_access = now;
        }
    }

    /// Invalidates every entry of `resource` and returns the watched keys,
    /// which should be refetched right away.
    pub fn invalidate(&mut self, resource: &str) -> Vec<QueryKey> {
        self.entries
            .iter_mut()
            .filter(|(key, _)| key.resource == resource)
            .filter_map(|(key, entry)| {
                entry.invalidated = true;
                entry.invalidated_seq = entry.issued_seq;
                (entry.observers > 0).then_some(*key)
            })
            .collect()
    }

    pub fn watch(&mut self, key: QueryKey, now: Instant) {
        let entry = self.entry(key, now);
        entry.observers += 1;
        entry.last_access = now;
    }

    pub fn unwatch(&mut self, key: QueryKey, now: Instant) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.observers = entry.observers.saturating_sub(1);
            entry.last_access = now;
        }
    }

    /// Drops entries that nobody watches and nobody has read for `gc_time`.
    ///
    /// Returns how many entries were evicted.
    pub fn collect_garbage(&mut self, now: Instant, gc_time: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            entry.observers > 0
                || entry.in_flight > 0
                || now.saturating_duration_since(entry.last_access) < gc_time
        });
        before - self.entries.len()
    }

    pub fn contains(&self, key: QueryKey) -> bool {
        self.entries.contains_key(&key)
    }
}
