//! Per-request batch loader.
//!
//! Resolving a timeline page touches many referenced entities (tags,
//! medication schedules); fetching them one-by-one per event is an N+1
//! storm. A [`Loader`] coalesces every `load` registered before its
//! deferred dispatch task runs -- one scheduler tick on a cooperative
//! executor -- into a single [`BatchFetch::fetch`] call with the
//! deduplicated key set, then distributes each value (or a `None`
//! not-found sentinel) back to its callers in requested order.
//!
//! Results are cached for the loader's lifetime. Construct a fresh
//! [`Loader`] per inbound request so neither cache entries nor in-flight
//! batches ever cross request or user boundaries. The dispatch is an
//! explicit spawned task rather than ambient event-loop timing, so the
//! coalescing window is testable deterministically on a current-thread
//! runtime.
//!
//! The one-fetch-per-tick guarantee is strict only on a current-thread
//! runtime. On a multi-thread runtime the dispatch task may run on
//! another worker before every concurrent `load` has registered, so a
//! logical batch can split into more than one fetch. Results stay
//! correct either way: each key settles exactly once into the cache and
//! every waiter receives its value. Batching there is best-effort, a
//! throughput optimization rather than an invariant.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::sync::oneshot;

use crate::error::CoreError;

/// A batched fetch against the backing store.
///
/// Implementations receive the deduplicated key set and return a map of
/// the keys that exist; absent keys are reported to callers as `None`.
#[async_trait]
pub trait BatchFetch: Send + Sync + 'static {
    type Key: Eq + Hash + Clone + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    async fn fetch(
        &self,
        keys: &[Self::Key],
    ) -> Result<HashMap<Self::Key, Self::Value>, CoreError>;
}

type LoadResult<V> = Result<Option<V>, CoreError>;
type Waiters<K, V> = HashMap<K, Vec<oneshot::Sender<LoadResult<V>>>>;

struct LoaderState<K, V> {
    /// Settled results, kept for the loader's lifetime.
    cache: HashMap<K, LoadResult<V>>,
    /// Keys awaiting the next dispatch, with the callers joined to each.
    waiters: Waiters<K, V>,
    /// Whether a dispatch task has been spawned for the current batch.
    dispatch_scheduled: bool,
}

impl<K, V> Default for LoaderState<K, V> {
    fn default() -> Self {
        Self {
            cache: HashMap::new(),
            waiters: HashMap::new(),
            dispatch_scheduled: false,
        }
    }
}

/// Coalescing, deduplicating, request-scoped loader over a [`BatchFetch`].
pub struct Loader<F: BatchFetch> {
    fetcher: Arc<F>,
    state: Arc<Mutex<LoaderState<F::Key, F::Value>>>,
}

impl<F: BatchFetch> Clone for Loader<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            state: Arc::clone(&self.state),
        }
    }
}

impl<F: BatchFetch> Loader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            state: Arc::new(Mutex::new(LoaderState::default())),
        }
    }

    /// Load a single key. Resolves to `Ok(None)` when the store has no
    /// row for it.
    pub async fn load(&self, key: F::Key) -> LoadResult<F::Value> {
        let rx = {
            let mut state = self.state.lock().expect("loader state poisoned");
            if let Some(settled) = state.cache.get(&key) {
                return settled.clone();
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.entry(key).or_default().push(tx);
            if !state.dispatch_scheduled {
                state.dispatch_scheduled = true;
                let loader = self.clone();
                tokio::spawn(async move { loader.dispatch().await });
            }
            rx
        };
        rx.await
            .unwrap_or_else(|_| Err(CoreError::Internal("batch dispatch dropped".into())))
    }

    /// Load many keys, resolving to values in the requested order --
    /// duplicates included. Fails as a whole if the underlying fetch for
    /// any key fails.
    pub async fn load_many(&self, keys: &[F::Key]) -> Result<Vec<Option<F::Value>>, CoreError> {
        try_join_all(keys.iter().cloned().map(|key| self.load(key))).await
    }

    /// Deferred batch dispatch: yield once so every `load` registered in
    /// the current tick joins the batch, then fetch and settle.
    async fn dispatch(self) {
        tokio::task::yield_now().await;

        let (keys, waiters) = {
            let mut state = self.state.lock().expect("loader state poisoned");
            state.dispatch_scheduled = false;
            let waiters = std::mem::take(&mut state.waiters);
            let keys: Vec<F::Key> = waiters.keys().cloned().collect();
            (keys, waiters)
        };
        if keys.is_empty() {
            return;
        }

        let fetched = self.fetcher.fetch(&keys).await;

        let mut state = self.state.lock().expect("loader state poisoned");
        match fetched {
            Ok(mut values) => {
                for (key, senders) in waiters {
                    let value = values.remove(&key);
                    state.cache.insert(key, Ok(value.clone()));
                    for tx in senders {
                        let _ = tx.send(Ok(value.clone()));
                    }
                }
            }
            Err(err) => {
                for (key, senders) in waiters {
                    state.cache.insert(key, Err(err.clone()));
                    for tx in senders {
                        let _ = tx.send(Err(err.clone()));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher that records every batch it receives.
    struct RecordingFetch {
        calls: AtomicUsize,
        batches: Mutex<Vec<Vec<i64>>>,
        missing: Vec<i64>,
    }

    impl RecordingFetch {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                batches: Mutex::new(Vec::new()),
                missing: Vec::new(),
            }
        }

        fn with_missing(missing: Vec<i64>) -> Self {
            Self {
                missing,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl BatchFetch for Arc<RecordingFetch> {
        type Key = i64;
        type Value = String;

        async fn fetch(&self, keys: &[i64]) -> Result<HashMap<i64, String>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut sorted = keys.to_vec();
            sorted.sort_unstable();
            self.batches.lock().unwrap().push(sorted);
            Ok(keys
                .iter()
                .filter(|k| !self.missing.contains(k))
                .map(|&k| (k, format!("value-{k}")))
                .collect())
        }
    }

    #[tokio::test]
    async fn coalesces_same_tick_loads_into_one_fetch() {
        let fetch = Arc::new(RecordingFetch::new());
        let loader = Loader::new(Arc::clone(&fetch));

        let (a, b, c) = tokio::join!(loader.load(1), loader.load(2), loader.load(3));
        assert_eq!(a.unwrap(), Some("value-1".to_string()));
        assert_eq!(b.unwrap(), Some("value-2".to_string()));
        assert_eq!(c.unwrap(), Some("value-3".to_string()));

        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*fetch.batches.lock().unwrap(), vec![vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn duplicate_keys_are_deduplicated_in_the_batch() {
        let fetch = Arc::new(RecordingFetch::new());
        let loader = Loader::new(Arc::clone(&fetch));

        let results = loader.load_many(&[7, 7, 8, 7]).await.unwrap();
        assert_eq!(
            results,
            vec![
                Some("value-7".to_string()),
                Some("value-7".to_string()),
                Some("value-8".to_string()),
                Some("value-7".to_string()),
            ]
        );

        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*fetch.batches.lock().unwrap(), vec![vec![7, 8]]);
    }

    #[tokio::test]
    async fn missing_keys_resolve_to_none() {
        let fetch = Arc::new(RecordingFetch::with_missing(vec![2]));
        let loader = Loader::new(Arc::clone(&fetch));

        let results = loader.load_many(&[1, 2, 3]).await.unwrap();
        assert_eq!(
            results,
            vec![
                Some("value-1".to_string()),
                None,
                Some("value-3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn later_ticks_start_a_new_batch_and_hit_the_cache() {
        let fetch = Arc::new(RecordingFetch::new());
        let loader = Loader::new(Arc::clone(&fetch));

        loader.load(1).await.unwrap();
        // Cached: no second fetch for the same key.
        loader.load(1).await.unwrap();
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);

        // A new key after the first batch settled dispatches again.
        loader.load(2).await.unwrap();
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 2);
        assert_eq!(*fetch.batches.lock().unwrap(), vec![vec![1], vec![2]]);
    }

    #[tokio::test]
    async fn separate_loader_instances_share_nothing() {
        let fetch = Arc::new(RecordingFetch::new());
        let first = Loader::new(Arc::clone(&fetch));
        let second = Loader::new(Arc::clone(&fetch));

        first.load(1).await.unwrap();
        second.load(1).await.unwrap();

        // Same key, two loaders: two fetches. Request isolation over reuse.
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_loads_resolve_correctly_across_worker_threads() {
        let fetch = Arc::new(RecordingFetch::new());
        let loader = Loader::new(Arc::clone(&fetch));

        // Dispatch may fire before every load has registered here, so a
        // batch can split across fetches; every caller must still get the
        // right value for its key.
        let tasks: Vec<_> = (0..32)
            .map(|k| {
                let loader = loader.clone();
                tokio::spawn(async move { (k, loader.load(k).await) })
            })
            .collect();
        for task in tasks {
            let (k, result) = task.await.unwrap();
            assert_eq!(result.unwrap(), Some(format!("value-{k}")));
        }

        // Each key is fetched at most once regardless of batch shape.
        let mut fetched: Vec<i64> = fetch
            .batches
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .copied()
            .collect();
        fetched.sort_unstable();
        assert_eq!(fetched, (0..32).collect::<Vec<i64>>());
    }

    struct FailingFetch;

    #[async_trait]
    impl BatchFetch for FailingFetch {
        type Key = i64;
        type Value = String;

        async fn fetch(&self, _keys: &[i64]) -> Result<HashMap<i64, String>, CoreError> {
            Err(CoreError::Internal("store unavailable".into()))
        }
    }

    #[tokio::test]
    async fn fetch_errors_propagate_to_every_caller() {
        let loader = Loader::new(FailingFetch);
        let (a, b) = tokio::join!(loader.load(1), loader.load(2));
        assert!(a.is_err());
        assert!(b.is_err());
    }
}
