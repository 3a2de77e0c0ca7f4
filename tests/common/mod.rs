//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use foldercaps::*;

pub const USER: UserId = 42;
pub const OTHER: UserId = 99;
pub const GROUP: UserId = 7;

/// Pack folder rights fields
pub fn pack(folder: u32, read: u32, write: u32, delete: u32, admin: u32) -> u32 {
    folder | read << OFFSET_READ | write << OFFSET_WRITE | delete << OFFSET_DELETE | admin << OFFSET_ADMIN
}

/// Every right, admin included
pub fn full() -> u32 {
    pack(4, 2, 2, 2, 1)
}

/// Objects rights limited to own objects, may create objects but no subfolders
pub fn own_only() -> u32 {
    pack(2, 1, 1, 1, 0)
}

pub fn folder(id: &str, module: Module, own_rights: u32) -> Folder {
    Folder::new(id, module, own_rights)
}

pub fn standard(id: &str, module: Module, own_rights: u32) -> Folder {
    Folder { standard_folder: true, ..Folder::new(id, module, own_rights) }
}

pub fn object(id: &str, folder_id: &str, created_by: UserId) -> Item {
    LeafObject::new(id, folder_id, created_by).into()
}

pub fn session() -> Arc<Session> {
    Arc::new(Session::new(USER, vec![GROUP]))
}

/// Fixture folders: "mail" (full, mail), "own" (own only, contacts),
/// "inbox" (full, standard mail), "files" (full, infostore)
pub fn fixture_folders() -> Vec<Folder> {
    vec![
        folder("mail", Module::Mail, full()),
        folder("own", Module::Contacts, own_only()),
        standard("inbox", Module::Mail, full()),
        folder("files", Module::Infostore, full()),
    ]
}

/// Folder store that counts and records lookups
pub struct CountingStore {
    pub inner: MemoryFolderStore,
    pub batch_ok: bool,
    pub batches: AtomicUsize,
    pub singles: AtomicUsize,
    pub fetched: Mutex<Vec<FolderId>>,
}

impl CountingStore {
    pub fn new(folders: Vec<Folder>) -> Self {
        CountingStore {
            inner: MemoryFolderStore::with_folders(folders),
            batch_ok: true,
            batches: AtomicUsize::new(0),
            singles: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Store that rejects every batch request
    pub fn unbatched(folders: Vec<Folder>) -> Self {
        CountingStore { batch_ok: false, ..Self::new(folders) }
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn singles(&self) -> usize {
        self.singles.load(Ordering::SeqCst)
    }

    pub fn fetched(&self) -> Vec<FolderId> {
        self.fetched.lock().unwrap().clone()
    }
}

impl FolderStore for CountingStore {
    async fn get(&self, id: &FolderId) -> Result<Folder> {
        self.singles.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(id.clone());
        self.inner.get(id).await
    }

    async fn multiple(&self, ids: &[FolderId]) -> Result<Vec<Result<Folder>>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        if !self.batch_ok {
            return Err(Error::Batch("batch lookups unsupported".into()));
        }
        self.fetched.lock().unwrap().extend(ids.iter().cloned());
        self.inner.multiple(ids).await
    }
}

pub fn counting_cache(folders: Vec<Folder>) -> Arc<FolderCache<CountingStore>> {
    Arc::new(FolderCache::new(Arc::new(CountingStore::new(folders))))
}

pub fn selection(cache: &Arc<FolderCache<CountingStore>>, items: Vec<Item>) -> Collection<CountingStore> {
    Collection::new(cache.clone(), session(), items)
}
