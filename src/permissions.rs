//! Role-based permission checks for the admin console.
//!
//! Three fixed roles, each with a static grant list. Ownership-scoped grants
//! (`CreateOwn`, `UpdateOwn`, `DeleteOwn`) only apply to items owned by the
//! acting user; the `All` grant short-circuits every check.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    EndUser,
    Manager,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Create,
    CreateOwn,
    Update,
    UpdateOwn,
    Delete,
    DeleteOwn,
    ViewReports,
    CreateViews,
    ManageViews,
    ManageSnapshots,
    All,
}

impl Role {
    fn grants(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::EndUser => &[Read, CreateOwn, UpdateOwn, DeleteOwn],
            Role::Manager => &[
                Read,
                Create,
                Update,
                DeleteOwn,
                Delete,
                ViewReports,
                CreateViews,
            ],
            Role::Admin => &[
                Read,
                Create,
                Update,
                Delete,
                ViewReports,
                ManageViews,
                ManageSnapshots,
                All,
            ],
        }
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    let grants = role.grants();
    grants.contains(&permission) || grants.contains(&Permission::All)
}

pub fn can_create(role: Role) -> bool {
    has_permission(role, Permission::Create) || has_permission(role, Permission::CreateOwn)
}

pub fn can_update(role: Role) -> bool {
    has_permission(role, Permission::Update) || has_permission(role, Permission::UpdateOwn)
}

pub fn can_delete(role: Role) -> bool {
    has_permission(role, Permission::Delete) || has_permission(role, Permission::DeleteOwn)
}

pub fn can_view_reports(role: Role) -> bool {
    has_permission(role, Permission::ViewReports)
}

pub fn can_manage_views(role: Role) -> bool {
    has_permission(role, Permission::ManageViews)
}

pub fn can_manage_snapshots(role: Role) -> bool {
    has_permission(role, Permission::ManageSnapshots)
}

/// Ownership-aware delete check: a blanket `Delete` grant allows deleting
/// anything, `DeleteOwn` only items the acting user owns.
pub fn can_delete_item(role: Role, item_user_id: i64, current_user_id: i64) -> bool {
    if has_permission(role, Permission::Delete) {
        return true;
    }
    has_permission(role, Permission::DeleteOwn) && item_user_id == current_user_id
}
