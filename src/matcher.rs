//! Per-item classification
//!
//! Objects: an explicit ACL entry for the user (or one of the user's groups)
//! overrides folder-derived rights; the first matching entry wins.
//! Folders: folder-level rights come from the store's capability check on
//! the folder itself.

use crate::cache::Resolved;
use crate::error::{Error, Result};
use crate::model::{Folder, FolderId, Item, LeafObject, ObjectPermission, Session};
use crate::rights::{decode, AclLevel, FolderAction, ObjectRights, RightField, RightLevel};
use crate::store::FolderStore;

/// Folder-level rights of a selected folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderRights {
    pub create_folder: bool,
    pub rename_folder: bool,
    pub delete_folder: bool,
    pub change_seen: bool,
}

impl FolderRights {
    /// Folders are deleted as a unit
    #[inline]
    pub fn delete(&self) -> bool {
        self.delete_folder
    }
}

/// Rights of a selected object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectClass {
    /// Rights came from an explicit ACL entry
    pub uses_object_acl: bool,
    pub rights: ObjectRights,
    /// New objects may be created in the owning folder
    pub create: bool,
    pub change_seen: bool,
}

/// Facts about an object that hold whether or not its folder resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectFacts {
    pub encrypted: bool,
    pub has_folder_id: bool,
    pub has_filename: bool,
}

impl ObjectFacts {
    pub fn of(object: &LeafObject) -> Self {
        ObjectFacts {
            encrypted: object.is_encrypted(),
            has_folder_id: object.folder_id.is_some(),
            has_filename: object.filename.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Folder(Result<FolderRights>),
    Object { facts: ObjectFacts, class: Result<ObjectClass> },
}

/// First ACL entry naming the user, or a group the user belongs to
pub fn match_acl<'a>(perms: &'a [ObjectPermission], session: &Session) -> Option<&'a ObjectPermission> {
    perms.iter().find(|p| {
        if p.group { session.in_group(p.entity) } else { p.entity == session.user_id }
    })
}

pub fn classify_folder<S: FolderStore>(folder: &Folder, store: &S) -> FolderRights {
    FolderRights {
        create_folder: store.can(FolderAction::CreateFolder, folder),
        rename_folder: store.can(FolderAction::RenameFolder, folder),
        delete_folder: store.can(FolderAction::DeleteFolder, folder),
        change_seen: store.can(FolderAction::ChangeSeen, folder),
    }
}

/// Classify an object against its resolved owning folder.
///
/// An object that names a folder which is not supplied is unknown, even when
/// an ACL entry matches. Objects without a folder (attachments, shares) rely
/// on their ACL alone.
pub fn classify_object<S: FolderStore>(
    object: &LeafObject,
    folder: Option<&Folder>,
    session: &Session,
    store: &S,
) -> Result<ObjectClass> {
    if let (Some(id), None) = (&object.folder_id, folder) {
        return Err(Error::FolderUnknown(id.clone()));
    }
    let acl = object
        .object_permissions
        .as_deref()
        .and_then(|perms| match_acl(perms, session));

    let (uses_object_acl, rights) = match (acl, folder) {
        (Some(p), _) => (true, AclLevel::from_bits(p.bits).rights()),
        (None, Some(f)) => (false, ObjectRights::from_folder(f.own_rights, object.created_by, session.user_id)),
        (None, None) => return Err(Error::Unplaced(object.id.clone())),
    };

    Ok(ObjectClass {
        uses_object_acl,
        rights,
        create: folder.map(|f| decode(f.own_rights, RightField::Read) == RightLevel::All).unwrap_or(false),
        change_seen: folder.map(|f| store.can(FolderAction::ChangeSeen, f)).unwrap_or(false),
    })
}

fn lookup<'a>(folders: &'a Resolved, id: Option<&FolderId>) -> Option<&'a Folder> {
    id.and_then(|id| folders.get(id)).and_then(|r| r.as_ref().ok()).map(|f| &**f)
}

/// Classify one selection entry against a resolution pass
pub fn classify<S: FolderStore>(item: &Item, folders: &Resolved, session: &Session, store: &S) -> Classified {
    match item {
        Item::Folder(id) => Classified::Folder(
            lookup(folders, Some(id))
                .map(|f| classify_folder(f, store))
                .ok_or_else(|| Error::FolderUnknown(id.clone())),
        ),
        Item::Object(o) => Classified::Object {
            facts: ObjectFacts::of(o),
            class: classify_object(o, lookup(folders, o.folder_id.as_ref()), session, store),
        },
    }
}
