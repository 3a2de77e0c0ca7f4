//! foldercaps - permission and property resolution for groupware selections
//!
//! Given a selection of folders and/or objects (mails, contacts, files...),
//! decide which actions the current user may perform on it as a whole.
//!
//! - [`rights`]: packed folder rights and object ACL decoding
//! - [`cache`]: deduplicating, batching folder resolution with invalidation
//! - [`matcher`]: per-item classification (ACL override vs folder rights)
//! - [`props`]: AND-fold into a [`Properties`] record
//! - [`collection`]: the facade callers use

pub mod cache;
pub mod collection;
#[cfg(feature = "server")]
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod matcher;
pub mod model;
pub mod props;
pub mod rights;
pub mod store;

pub use cache::{FolderCache, Resolved};
pub use collection::Collection;
pub use constants::*;
pub use db::LmdbFolderStore;
pub use error::{Error, Result};
pub use matcher::{classify, classify_folder, classify_object, match_acl, Classified, FolderRights, ObjectClass, ObjectFacts};
pub use model::{Folder, FolderId, Item, LeafObject, Meta, Module, ObjectPermission, Session, UserId};
pub use props::{aggregate, Properties};
pub use rights::{can, decode, decode_raw, AclLevel, FolderAction, ObjectRights, RightField, RightLevel};
pub use store::{FolderEvent, FolderStore, MemoryFolderStore};
