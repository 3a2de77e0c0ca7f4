//! Folder resolution cache
//!
//! Shared across collections. Each resolution pass:
//! - drains pending store events (invalidation)
//! - deduplicates the requested ids and serves cached folders
//! - fetches all misses with a single batched lookup, falling back to
//!   per-id lookups when the batch is rejected
//!
//! Failed lookups are reported per folder and never cached. A fetch that
//! overlaps an invalidation is returned to its caller but not cached.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Folder, FolderId};
use crate::store::{FolderEvent, FolderStore};

/// Outcome of one resolution pass, keyed by folder id
pub type Resolved = HashMap<FolderId, Result<Arc<Folder>>>;

pub struct FolderCache<S> {
    store: Arc<S>,
    state: Mutex<State>,
    events: Mutex<Option<broadcast::Receiver<FolderEvent>>>,
}

#[derive(Default)]
struct State {
    entries: HashMap<FolderId, Arc<Folder>>,
    /// Bumped on every invalidation
    generation: u64,
}

impl State {
    fn evict(&mut self, id: &FolderId) -> bool {
        self.generation += 1;
        self.entries.remove(id).is_some()
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.entries.clear();
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

impl<S: FolderStore> FolderCache<S> {
    pub fn new(store: Arc<S>) -> Self {
        FolderCache { store, state: Mutex::new(State::default()), events: Mutex::new(None) }
    }

    /// Cache that drops entries as the store reports changes
    pub fn with_events(store: Arc<S>, events: broadcast::Receiver<FolderEvent>) -> Self {
        let cache = Self::new(store);
        cache.subscribe(events);
        cache
    }

    /// Replace the invalidation subscription
    pub fn subscribe(&self, events: broadcast::Receiver<FolderEvent>) {
        *lock(&self.events) = Some(events);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drop one cached folder. Returns whether it was cached.
    pub fn invalidate(&self, id: &FolderId) -> bool {
        lock(&self.state).evict(id)
    }

    pub fn clear(&self) {
        lock(&self.state).clear();
    }

    pub fn len(&self) -> usize {
        self.drain_events();
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached folder, without fetching
    pub fn cached(&self, id: &FolderId) -> Option<Arc<Folder>> {
        self.drain_events();
        lock(&self.state).entries.get(id).cloned()
    }

    /// Apply every event received since the last pass
    fn drain_events(&self) {
        let mut guard = lock(&self.events);
        let Some(rx) = guard.as_mut() else { return };
        let mut state = lock(&self.state);
        loop {
            match rx.try_recv() {
                Ok(FolderEvent::Updated(id)) | Ok(FolderEvent::Removed(id)) => {
                    state.evict(&id);
                }
                Ok(FolderEvent::Refresh) => state.clear(),
                Err(TryRecvError::Lagged(n)) => {
                    debug!(missed = n, "folder events lagged, clearing cache");
                    state.clear();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    *guard = None;
                    break;
                }
            }
        }
    }

    /// Resolve a single folder
    pub async fn get(&self, id: &FolderId) -> Result<Arc<Folder>> {
        self.resolve([id])
            .await
            .remove(id)
            .unwrap_or_else(|| Err(Error::FolderUnknown(id.clone())))
    }

    /// Resolve every distinct id. Each id appears exactly once in the result.
    pub async fn resolve<'a, I>(&self, ids: I) -> Resolved
    where
        I: IntoIterator<Item = &'a FolderId>,
    {
        self.drain_events();
        let wanted: BTreeSet<&FolderId> = ids.into_iter().collect();
        let mut out = Resolved::with_capacity(wanted.len());
        let mut missing = Vec::new();
        let generation = {
            let state = lock(&self.state);
            for id in wanted {
                match state.entries.get(id) {
                    Some(f) => {
                        out.insert(id.clone(), Ok(f.clone()));
                    }
                    None => missing.push(id.clone()),
                }
            }
            state.generation
        };
        if missing.is_empty() {
            debug!(hits = out.len(), "folders served from cache");
            return out;
        }
        debug!(hits = out.len(), misses = missing.len(), "fetching folders");

        let fetched = match self.store.multiple(&missing).await {
            Ok(list) if list.len() == missing.len() => list,
            Ok(list) => {
                warn!(requested = missing.len(), returned = list.len(), "batch lookup size mismatch");
                self.fetch_each(&missing).await
            }
            Err(e) => {
                debug!(error = %e, "batch lookup rejected, fetching individually");
                self.fetch_each(&missing).await
            }
        };

        // events published while fetching count against this pass
        self.drain_events();
        let mut state = lock(&self.state);
        let fresh = state.generation == generation;
        if !fresh {
            debug!("folders invalidated during fetch, not caching");
        }
        for (id, r) in missing.into_iter().zip(fetched) {
            match r {
                Ok(folder) => {
                    let folder = Arc::new(folder);
                    if fresh {
                        state.entries.insert(id.clone(), folder.clone());
                    }
                    out.insert(id, Ok(folder));
                }
                Err(e) => {
                    warn!(folder = %id, error = %e, "folder lookup failed");
                    out.insert(id.clone(), Err(Error::FolderUnknown(id)));
                }
            }
        }
        out
    }

    async fn fetch_each(&self, ids: &[FolderId]) -> Vec<Result<Folder>> {
        let mut r = Vec::with_capacity(ids.len());
        for id in ids {
            r.push(self.store.get(id).await);
        }
        r
    }
}
