//! Rights decoding: packed folder fields, object ACL thresholds and the
//! default folder capability policy

mod common;

use common::*;
use foldercaps::rights::field;
use foldercaps::*;

// ============================================================================
// Packed Folder Rights
// ============================================================================

#[test]
fn field_values_map_to_levels() {
    assert_eq!(decode(0, RightField::Folder), RightLevel::None);
    assert_eq!(decode(0b1, RightField::Folder), RightLevel::OwnOnly);
    assert_eq!(decode(0b10, RightField::Folder), RightLevel::All);
    assert_eq!(decode(0b1110, RightField::Folder), RightLevel::All);
    assert_eq!(decode(127, RightField::Folder), RightLevel::All);
}

#[test]
fn fields_are_isolated_by_mask() {
    let bits = pack(0, 1, 2, 0, 0);
    assert_eq!(decode(bits, RightField::Folder), RightLevel::None);
    assert_eq!(decode(bits, RightField::Read), RightLevel::OwnOnly);
    assert_eq!(decode(bits, RightField::Write), RightLevel::All);
    assert_eq!(decode(bits, RightField::Delete), RightLevel::None);
    assert_eq!(decode(bits, RightField::Admin), RightLevel::None);
}

#[test]
fn admin_field_is_a_single_bit() {
    assert_eq!(RightField::Admin.mask(), ADMIN_MASK);
    assert_eq!(RightField::Read.mask(), FIELD_MASK);
    assert_eq!(decode(1 << 28, RightField::Admin), RightLevel::All);
    assert_eq!(decode(0, RightField::Admin), RightLevel::None);
    // bits below the admin offset do not leak in
    assert_eq!(decode((1 << 28) - 1, RightField::Admin), RightLevel::None);
    // bits above the admin bit are masked off
    assert_eq!(decode(1 << 29, RightField::Admin), RightLevel::None);
    assert_eq!(decode(u32::MAX, RightField::Admin), RightLevel::All);
}

#[test]
fn out_of_range_offsets_deny() {
    assert_eq!(field(u32::MAX, 32), 0);
    assert_eq!(decode_raw(u32::MAX, 40), RightLevel::None);
    assert_eq!(decode_raw(u32::MAX, 31), RightLevel::All);
}

#[test]
fn levels_grant_by_ownership() {
    assert!(!RightLevel::None.grants(USER, USER));
    assert!(RightLevel::OwnOnly.grants(USER, USER));
    assert!(!RightLevel::OwnOnly.grants(OTHER, USER));
    assert!(RightLevel::All.grants(OTHER, USER));
}

#[test]
fn folder_rights_for_objects() {
    assert_eq!(ObjectRights::from_folder(full(), OTHER, USER), ObjectRights::ALL);
    assert_eq!(ObjectRights::from_folder(own_only(), USER, USER), ObjectRights::ALL);
    assert_eq!(ObjectRights::from_folder(own_only(), OTHER, USER), ObjectRights::NONE);
    let read_all = pack(0, 2, 1, 0, 0);
    assert_eq!(
        ObjectRights::from_folder(read_all, OTHER, USER),
        ObjectRights { read: true, modify: false, delete: false }
    );
}

// ============================================================================
// Object ACL Thresholds
// ============================================================================

#[test]
fn acl_bits_are_cumulative_thresholds() {
    assert_eq!(AclLevel::from_bits(0), AclLevel::None);
    assert_eq!(AclLevel::from_bits(1), AclLevel::Read);
    assert_eq!(AclLevel::from_bits(2), AclLevel::Modify);
    assert_eq!(AclLevel::from_bits(3), AclLevel::Modify);
    assert_eq!(AclLevel::from_bits(4), AclLevel::Delete);
    assert_eq!(AclLevel::from_bits(8), AclLevel::Delete);

    assert_eq!(AclLevel::None.rights(), ObjectRights::NONE);
    assert_eq!(AclLevel::Read.rights(), ObjectRights { read: true, modify: false, delete: false });
    assert_eq!(AclLevel::Modify.rights(), ObjectRights { read: true, modify: true, delete: false });
    assert_eq!(AclLevel::Delete.rights(), ObjectRights::ALL);
}

// ============================================================================
// Folder Capability Policy
// ============================================================================

#[test]
fn create_folder_needs_subfolder_level() {
    assert!(can(FolderAction::CreateFolder, &folder("a", Module::Tasks, pack(4, 0, 0, 0, 0))));
    assert!(!can(FolderAction::CreateFolder, &folder("a", Module::Tasks, pack(2, 2, 2, 2, 1))));
}

#[test]
fn rename_and_delete_need_admin_on_non_standard_folders() {
    let f = folder("a", Module::Calendar, full());
    assert!(can(FolderAction::RenameFolder, &f));
    assert!(can(FolderAction::DeleteFolder, &f));

    let s = standard("b", Module::Calendar, full());
    assert!(!can(FolderAction::RenameFolder, &s));
    assert!(!can(FolderAction::DeleteFolder, &s));

    let no_admin = folder("c", Module::Calendar, pack(4, 2, 2, 2, 0));
    assert!(!can(FolderAction::RenameFolder, &no_admin));
    assert!(!can(FolderAction::DeleteFolder, &no_admin));
}

#[test]
fn change_seen_is_mail_only() {
    assert!(can(FolderAction::ChangeSeen, &folder("m", Module::Mail, own_only())));
    assert!(!can(FolderAction::ChangeSeen, &folder("m", Module::Mail, pack(2, 2, 0, 0, 0))));
    assert!(!can(FolderAction::ChangeSeen, &folder("c", Module::Contacts, full())));
}

#[test]
fn folder_actions_parse_from_keys() {
    for a in FolderAction::ALL {
        assert_eq!(a.as_str().parse::<FolderAction>().unwrap(), a);
    }
    assert_eq!("create:folder".parse::<FolderAction>().unwrap(), FolderAction::CreateFolder);
    assert!(matches!("publish:folder".parse::<FolderAction>(), Err(Error::Usage(_))));
}
