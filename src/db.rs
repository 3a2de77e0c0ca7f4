//! LMDB-backed folder store
//!
//! Storage layout:
//! - `folders`: folder id -> JSON folder
//! - `groups`: user id (big-endian u64) -> JSON list of group ids
//!
//! Every mutation publishes a [`FolderEvent`] so caches can invalidate.

use std::path::Path;

use byteorder::BigEndian;
use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use tokio::sync::broadcast;
use tracing::info;

use crate::error::{err, Error, Result};
use crate::model::{Folder, FolderId, Session, UserId};
use crate::store::{FolderEvent, FolderStore, EVENT_CAPACITY};

// Database type aliases
pub type FolderDb = Database<Str, Bytes>;
pub type GroupDb = Database<U64<BigEndian>, Bytes>;

/// Default LMDB map size (1 GiB)
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

pub struct LmdbFolderStore {
    env: Env,
    folders: FolderDb,
    groups: GroupDb,
    events: broadcast::Sender<FolderEvent>,
}

impl LmdbFolderStore {
    /// Open (or create) a store at `path`
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(err)?;
        let env = unsafe { EnvOpenOptions::new().map_size(map_size).max_dbs(2).open(path).map_err(err)? };
        let mut tx = env.write_txn().map_err(err)?;
        let folders = env.create_database(&mut tx, Some("folders")).map_err(err)?;
        let groups = env.create_database(&mut tx, Some("groups")).map_err(err)?;
        tx.commit().map_err(err)?;
        info!(path = %path.display(), "folder store opened");
        Ok(LmdbFolderStore { env, folders, groups, events: broadcast::channel(EVENT_CAPACITY).0 })
    }

    fn read<T, F: FnOnce(&RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        f(&self.env.read_txn().map_err(err)?)
    }

    fn write<T, F: FnOnce(&mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut tx = self.env.write_txn().map_err(err)?;
        let r = f(&mut tx)?;
        tx.commit().map_err(err)?;
        Ok(r)
    }

    fn publish(&self, event: FolderEvent) {
        let _ = self.events.send(event);
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<FolderEvent> {
        self.events.subscribe()
    }

    fn load(&self, tx: &RoTxn, id: &FolderId) -> Result<Folder> {
        match self.folders.get(tx, id.as_str()).map_err(err)? {
            Some(raw) => serde_json::from_slice(raw).map_err(err),
            None => Err(Error::FolderUnknown(id.clone())),
        }
    }

    /// Insert or replace a folder
    pub fn put(&self, folder: &Folder) -> Result<()> {
        let raw = serde_json::to_vec(folder).map_err(err)?;
        self.write(|tx| self.folders.put(tx, folder.id.as_str(), &raw).map_err(err))?;
        self.publish(FolderEvent::Updated(folder.id.clone()));
        Ok(())
    }

    pub fn remove(&self, id: &FolderId) -> Result<bool> {
        let removed = self.write(|tx| self.folders.delete(tx, id.as_str()).map_err(err))?;
        if removed {
            self.publish(FolderEvent::Removed(id.clone()));
        }
        Ok(removed)
    }

    /// Number of stored folders
    pub fn count(&self) -> Result<u64> {
        self.read(|tx| self.folders.len(tx).map_err(err))
    }

    /// Remove every folder and group membership
    pub fn clear(&self) -> Result<()> {
        self.write(|tx| {
            self.folders.clear(tx).map_err(err)?;
            self.groups.clear(tx).map_err(err)
        })?;
        self.publish(FolderEvent::Refresh);
        Ok(())
    }

    pub fn set_groups(&self, user: UserId, groups: &[UserId]) -> Result<()> {
        let raw = serde_json::to_vec(groups).map_err(err)?;
        self.write(|tx| self.groups.put(tx, &user, &raw).map_err(err))
    }

    /// Groups the user belongs to; empty when none are recorded
    pub fn groups_of(&self, user: UserId) -> Result<Vec<UserId>> {
        self.read(|tx| match self.groups.get(tx, &user).map_err(err)? {
            Some(raw) => serde_json::from_slice(raw).map_err(err),
            None => Ok(Vec::new()),
        })
    }

    pub fn session_for(&self, user: UserId) -> Result<Session> {
        Ok(Session::new(user, self.groups_of(user)?))
    }
}

impl FolderStore for LmdbFolderStore {
    async fn get(&self, id: &FolderId) -> Result<Folder> {
        self.read(|tx| self.load(tx, id))
    }

    /// All ids are read inside one transaction
    async fn multiple(&self, ids: &[FolderId]) -> Result<Vec<Result<Folder>>> {
        self.read(|tx| Ok(ids.iter().map(|id| self.load(tx, id)).collect()))
    }
}
