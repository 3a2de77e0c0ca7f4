//! Folder store interface and an in-memory implementation

use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::model::{Folder, FolderId};
use crate::rights::{self, FolderAction};

/// Capacity of folder event channels
pub const EVENT_CAPACITY: usize = 256;

/// Change notification published by a folder store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderEvent {
    Updated(FolderId),
    Removed(FolderId),
    /// Everything may have changed
    Refresh,
}

/// Source of folder metadata
pub trait FolderStore: Send + Sync {
    /// Fetch a single folder
    fn get(&self, id: &FolderId) -> impl Future<Output = Result<Folder>> + Send;

    /// Fetch several folders in one request.
    ///
    /// Returns one entry per requested id, in request order. An outer `Err`
    /// means the batch as a whole failed and callers fall back to `get`.
    fn multiple(&self, ids: &[FolderId]) -> impl Future<Output = Result<Vec<Result<Folder>>>> + Send;

    /// Folder-level capability check
    fn can(&self, action: FolderAction, folder: &Folder) -> bool {
        rights::can(action, folder)
    }
}

/// Folder store kept entirely in memory
pub struct MemoryFolderStore {
    folders: RwLock<HashMap<FolderId, Folder>>,
    events: broadcast::Sender<FolderEvent>,
}

impl Default for MemoryFolderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFolderStore {
    pub fn new() -> Self {
        MemoryFolderStore {
            folders: RwLock::new(HashMap::new()),
            events: broadcast::channel(EVENT_CAPACITY).0,
        }
    }

    pub fn with_folders(folders: impl IntoIterator<Item = Folder>) -> Self {
        let store = Self::new();
        {
            let mut map = store.folders.write().unwrap_or_else(|p| p.into_inner());
            for f in folders {
                map.insert(f.id.clone(), f);
            }
        }
        store
    }

    /// Insert or replace a folder
    pub fn put(&self, folder: Folder) {
        let id = folder.id.clone();
        self.folders.write().unwrap_or_else(|p| p.into_inner()).insert(id.clone(), folder);
        self.publish(FolderEvent::Updated(id));
    }

    pub fn remove(&self, id: &FolderId) -> bool {
        let removed = self.folders.write().unwrap_or_else(|p| p.into_inner()).remove(id).is_some();
        if removed {
            self.publish(FolderEvent::Removed(id.clone()));
        }
        removed
    }

    pub fn clear(&self) {
        self.folders.write().unwrap_or_else(|p| p.into_inner()).clear();
        self.publish(FolderEvent::Refresh);
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<FolderEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: FolderEvent) {
        // no receivers is fine
        let _ = self.events.send(event);
    }

    fn lookup(&self, id: &FolderId) -> Result<Folder> {
        self.folders
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| Error::FolderUnknown(id.clone()))
    }
}

impl FolderStore for MemoryFolderStore {
    async fn get(&self, id: &FolderId) -> Result<Folder> {
        self.lookup(id)
    }

    async fn multiple(&self, ids: &[FolderId]) -> Result<Vec<Result<Folder>>> {
        Ok(ids.iter().map(|id| self.lookup(id)).collect())
    }
}
