//! Rights decoding
//!
//! Two distinct encodings exist:
//! - folder rights: one packed `u32`, fields read with shift and mask ([`decode`])
//! - object ACL bits: a small cumulative threshold ([`AclLevel`])

use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::error::Error;
use crate::model::{Folder, Module, UserId};

/// Field of a packed folder rights value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightField {
    /// Folder visibility and creation rights
    Folder,
    Read,
    Write,
    Delete,
    Admin,
}

impl RightField {
    #[inline]
    pub const fn offset(self) -> u32 {
        match self {
            RightField::Folder => OFFSET_FOLDER,
            RightField::Read => OFFSET_READ,
            RightField::Write => OFFSET_WRITE,
            RightField::Delete => OFFSET_DELETE,
            RightField::Admin => OFFSET_ADMIN,
        }
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        mask_for(self.offset())
    }
}

#[inline]
const fn mask_for(offset: u32) -> u32 {
    if offset >= OFFSET_ADMIN { ADMIN_MASK } else { FIELD_MASK }
}

/// Decoded rights level of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RightLevel {
    None,
    /// Only objects created by the current user
    OwnOnly,
    All,
}

impl RightLevel {
    /// Whether this level covers an object created by `owner` for `user`
    #[inline]
    pub fn grants(self, owner: UserId, user: UserId) -> bool {
        match self {
            RightLevel::None => false,
            RightLevel::OwnOnly => owner == user,
            RightLevel::All => true,
        }
    }
}

/// Raw field value at an arbitrary offset. Shifts past the width yield 0.
#[inline]
pub fn field(bits: u32, offset: u32) -> u32 {
    bits.checked_shr(offset).unwrap_or(0) & mask_for(offset)
}

/// Decode the field at an arbitrary offset
pub fn decode_raw(bits: u32, offset: u32) -> RightLevel {
    let v = field(bits, offset);
    if offset >= OFFSET_ADMIN {
        // single bit: set means granted
        return if v == 0 { RightLevel::None } else { RightLevel::All };
    }
    match v {
        0 => RightLevel::None,
        1 => RightLevel::OwnOnly,
        _ => RightLevel::All,
    }
}

/// Decode one named field of a packed rights value
#[inline]
pub fn decode(bits: u32, field: RightField) -> RightLevel {
    decode_raw(bits, field.offset())
}

/// Read/modify/delete triple for a single object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectRights {
    pub read: bool,
    pub modify: bool,
    pub delete: bool,
}

impl ObjectRights {
    pub const NONE: ObjectRights = ObjectRights { read: false, modify: false, delete: false };
    pub const ALL: ObjectRights = ObjectRights { read: true, modify: true, delete: true };

    /// Rights inherited from the folder `own_rights` for an object by `owner`
    pub fn from_folder(own_rights: u32, owner: UserId, user: UserId) -> Self {
        ObjectRights {
            read: decode(own_rights, RightField::Read).grants(owner, user),
            modify: decode(own_rights, RightField::Write).grants(owner, user),
            delete: decode(own_rights, RightField::Delete).grants(owner, user),
        }
    }
}

/// Cumulative object ACL level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AclLevel {
    None,
    Read,
    Modify,
    Delete,
}

impl AclLevel {
    pub fn from_bits(bits: u32) -> Self {
        if bits >= ACL_DELETE {
            AclLevel::Delete
        } else if bits >= ACL_MODIFY {
            AclLevel::Modify
        } else if bits >= ACL_READ {
            AclLevel::Read
        } else {
            AclLevel::None
        }
    }

    pub fn rights(self) -> ObjectRights {
        ObjectRights {
            read: self >= AclLevel::Read,
            modify: self >= AclLevel::Modify,
            delete: self >= AclLevel::Delete,
        }
    }
}

/// Folder-level action checked through a folder store's `can`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderAction {
    CreateFolder,
    RenameFolder,
    DeleteFolder,
    ChangeSeen,
}

impl FolderAction {
    pub const ALL: [FolderAction; 4] = [
        FolderAction::CreateFolder,
        FolderAction::RenameFolder,
        FolderAction::DeleteFolder,
        FolderAction::ChangeSeen,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FolderAction::CreateFolder => CREATE_FOLDER,
            FolderAction::RenameFolder => RENAME_FOLDER,
            FolderAction::DeleteFolder => DELETE_FOLDER,
            FolderAction::ChangeSeen => CHANGE_SEEN,
        }
    }
}

impl fmt::Display for FolderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FolderAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        FolderAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::Usage(format!("unknown folder action {s}")))
    }
}

/// Default folder capability policy
pub fn can(action: FolderAction, folder: &Folder) -> bool {
    let rights = folder.own_rights;
    let admin = decode(rights, RightField::Admin) == RightLevel::All;
    match action {
        FolderAction::CreateFolder => field(rights, OFFSET_FOLDER) >= FOLDER_CREATE_SUBFOLDERS,
        FolderAction::RenameFolder | FolderAction::DeleteFolder => admin && !folder.standard_folder,
        FolderAction::ChangeSeen => {
            folder.module == Module::Mail && decode(rights, RightField::Write) != RightLevel::None
        }
    }
}
