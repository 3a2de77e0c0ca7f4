//! Properties record and the AND-fold that builds it

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::matcher::Classified;

/// What a selection permits, plus quantity and quality facts about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Properties {
    pub read: bool,
    pub modify: bool,
    pub delete: bool,
    pub create: bool,
    #[serde(rename = "create:folder")]
    pub create_folder: bool,
    #[serde(rename = "rename:folder")]
    pub rename_folder: bool,
    #[serde(rename = "delete:folder")]
    pub delete_folder: bool,
    #[serde(rename = "change:seen")]
    pub change_seen: bool,
    /// Some object is encrypted
    pub guard: bool,
    pub none: bool,
    pub some: bool,
    pub one: bool,
    pub multiple: bool,
    pub items: bool,
    pub folders: bool,
    pub mixed: bool,
    /// Some referenced folder could not be resolved
    pub unknown: bool,
    /// Every object sits directly in a folder (no attachments)
    pub toplevel: bool,
}

impl Properties {
    /// Starting point of the fold: every right granted
    pub fn for_count(count: usize) -> Self {
        Properties {
            read: true,
            modify: true,
            delete: true,
            create: true,
            create_folder: true,
            rename_folder: true,
            delete_folder: true,
            change_seen: true,
            guard: false,
            none: count == 0,
            some: count > 0,
            one: count == 1,
            multiple: count > 1,
            items: false,
            folders: false,
            mixed: false,
            unknown: false,
            toplevel: true,
        }
    }

    /// Value of a named key, `None` for unknown keys
    pub fn get(&self, key: &str) -> Option<bool> {
        Some(match key {
            READ => self.read,
            MODIFY => self.modify,
            DELETE => self.delete,
            CREATE => self.create,
            CREATE_FOLDER => self.create_folder,
            RENAME_FOLDER => self.rename_folder,
            DELETE_FOLDER => self.delete_folder,
            CHANGE_SEEN => self.change_seen,
            GUARD => self.guard,
            NONE => self.none,
            SOME => self.some,
            ONE => self.one,
            MULTIPLE => self.multiple,
            ITEMS => self.items,
            FOLDERS => self.folders,
            MIXED => self.mixed,
            UNKNOWN => self.unknown,
            TOPLEVEL => self.toplevel,
            _ => return None,
        })
    }

    /// True iff every named key is set. Unknown keys count as unset.
    pub fn has(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.get(k) == Some(true))
    }

    fn deny_all(&mut self) {
        self.read = false;
        self.modify = false;
        self.delete = false;
        self.create = false;
        self.create_folder = false;
        self.rename_folder = false;
        self.delete_folder = false;
        self.change_seen = false;
    }
}

/// Fold classified items into one record.
///
/// Every item is visited; an unknown folder does not stop the fold, so
/// `guard` and `toplevel` still see later items.
pub fn aggregate(classified: &[Classified]) -> Properties {
    let mut p = Properties::for_count(classified.len());
    if classified.is_empty() {
        return p;
    }

    let (mut has_folder, mut has_leaf) = (false, false);
    for c in classified {
        match c {
            Classified::Folder(Ok(f)) => {
                has_folder = true;
                p.create_folder &= f.create_folder;
                p.rename_folder &= f.rename_folder;
                p.delete_folder &= f.delete_folder;
                p.change_seen &= f.change_seen;
                p.delete &= f.delete();
            }
            Classified::Folder(Err(_)) => {
                has_folder = true;
                p.unknown = true;
            }
            Classified::Object { facts, class } => {
                has_leaf = true;
                p.guard |= facts.encrypted;
                p.toplevel &= facts.has_folder_id && !facts.has_filename;
                match class {
                    Ok(o) => {
                        p.read &= o.rights.read;
                        p.modify &= o.rights.modify;
                        p.delete &= o.rights.delete;
                        p.create &= o.create;
                        p.change_seen &= o.change_seen;
                    }
                    Err(_) => {
                        p.unknown = true;
                        p.read = false;
                        p.modify = false;
                        p.delete = false;
                        p.create = false;
                        p.change_seen = false;
                    }
                }
            }
        }
    }

    // undefined without a folder in the selection
    if !has_folder {
        p.create_folder = false;
        p.rename_folder = false;
    }
    // undefined without an object in the selection
    if !has_leaf {
        p.create = false;
        p.read = false;
        p.modify = false;
    }

    p.items = has_leaf && !has_folder;
    p.folders = has_folder && !has_leaf;
    p.mixed = has_folder && has_leaf;

    if p.unknown {
        p.deny_all();
    }
    p
}
