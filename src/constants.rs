//! Rights field layout and selection constants

// Field offsets inside a packed folder rights value
pub const OFFSET_FOLDER: u32 = 0;
pub const OFFSET_READ: u32 = 7;
pub const OFFSET_WRITE: u32 = 14;
pub const OFFSET_DELETE: u32 = 21;
pub const OFFSET_ADMIN: u32 = 28;

// Field masks; the admin field is a single bit
pub const FIELD_MASK: u32 = 127;
pub const ADMIN_MASK: u32 = 1;

// Folder field level required to create subfolders
pub const FOLDER_CREATE_SUBFOLDERS: u32 = 4;

// Object ACL thresholds (cumulative)
pub const ACL_READ: u32 = 1;
pub const ACL_MODIFY: u32 = 2;
pub const ACL_DELETE: u32 = 4;

/// Selections at or above this size are considered large
pub const LARGE_SELECTION: usize = 100;

// Properties record keys
pub const READ: &str = "read";
pub const MODIFY: &str = "modify";
pub const DELETE: &str = "delete";
pub const CREATE: &str = "create";
pub const CREATE_FOLDER: &str = "create:folder";
pub const RENAME_FOLDER: &str = "rename:folder";
pub const DELETE_FOLDER: &str = "delete:folder";
pub const CHANGE_SEEN: &str = "change:seen";
pub const GUARD: &str = "guard";
pub const NONE: &str = "none";
pub const SOME: &str = "some";
pub const ONE: &str = "one";
pub const MULTIPLE: &str = "multiple";
pub const ITEMS: &str = "items";
pub const FOLDERS: &str = "folders";
pub const MIXED: &str = "mixed";
pub const UNKNOWN: &str = "unknown";
pub const TOPLEVEL: &str = "toplevel";
