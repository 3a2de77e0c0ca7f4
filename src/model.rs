//! Folders, leaf objects and selection items
//!
//! Selection entries arrive as loosely shaped JSON. They are classified once,
//! at ingestion, into [`Item::Folder`] or [`Item::Object`]; nothing downstream
//! inspects shapes again.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// User and group ids share one numeric space
pub type UserId = u64;

/// Folder id. Mail folders use paths (`default0/INBOX`), other modules use
/// numbers; both are kept as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        FolderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        FolderId(s.to_string())
    }
}

impl<'de> Deserialize<'de> for FolderId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        string_or_number(d).map(FolderId)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

/// Missing and `null` fields both take the default
fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

/// Groupware module owning a folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Mail,
    Contacts,
    Calendar,
    Tasks,
    Infostore,
    #[default]
    #[serde(other)]
    Other,
}

/// Folder metadata as served by a folder store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    /// Parent folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub own_rights: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub module: Module,
    #[serde(default, deserialize_with = "null_as_default")]
    pub standard_folder: bool,
}

impl Folder {
    pub fn new(id: impl Into<String>, module: Module, own_rights: u32) -> Self {
        Folder {
            id: FolderId::new(id),
            folder_id: None,
            title: None,
            own_rights,
            created_by: 0,
            module,
            standard_folder: false,
        }
    }
}

/// Explicit per-object grant naming a user or a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPermission {
    pub entity: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: bool,
    pub bits: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "Encrypted", default, deserialize_with = "null_as_default")]
    pub encrypted: bool,
}

/// Mail, contact, task, appointment or file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafObject {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_permissions: Option<Vec<ObjectPermission>>,
    /// Present on attachments and other nested objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl LeafObject {
    pub fn new(id: impl Into<String>, folder_id: impl Into<String>, created_by: UserId) -> Self {
        LeafObject {
            id: id.into(),
            folder_id: Some(FolderId::new(folder_id)),
            created_by,
            object_permissions: None,
            filename: None,
            meta: None,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.meta.as_ref().map(|m| m.encrypted).unwrap_or(false)
    }
}

/// One entry of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// The entry is a folder; its data is resolved by id
    Folder(FolderId),
    Object(LeafObject),
}

impl Item {
    /// Classify a JSON selection entry.
    ///
    /// Folders are recognised by a `standard_folder` attribute or by the
    /// `folder_id: "folder"` marker used by file listings.
    pub fn from_json(value: &Value) -> Result<Item> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::InvalidItem(format!("expected an object, got {value}")))?;
        let marker = obj.get("folder_id").and_then(Value::as_str) == Some("folder");
        if obj.contains_key("standard_folder") || marker {
            let id = obj
                .get("id")
                .cloned()
                .ok_or_else(|| Error::InvalidItem("folder without id".into()))?;
            let id = serde_json::from_value(id).map_err(|e| Error::InvalidItem(e.to_string()))?;
            return Ok(Item::Folder(id));
        }
        serde_json::from_value(value.clone())
            .map(Item::Object)
            .map_err(|e| Error::InvalidItem(e.to_string()))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }

    /// Folder this entry needs resolved: itself for folders, the owner for objects
    pub fn referenced_folder(&self) -> Option<&FolderId> {
        match self {
            Item::Folder(id) => Some(id),
            Item::Object(o) => o.folder_id.as_ref(),
        }
    }
}

impl From<LeafObject> for Item {
    fn from(o: LeafObject) -> Self {
        Item::Object(o)
    }
}

impl From<&Folder> for Item {
    fn from(f: &Folder) -> Self {
        Item::Folder(f.id.clone())
    }
}

/// The user a selection is evaluated for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    #[serde(default)]
    pub groups: Vec<UserId>,
}

impl Session {
    pub fn new(user_id: UserId, groups: Vec<UserId>) -> Self {
        Session { user_id, groups }
    }

    #[inline]
    pub fn in_group(&self, group: UserId) -> bool {
        self.groups.contains(&group)
    }
}
