//! Role → permission table.

use serde::Serialize;

use crate::domain::Role;

/// A capability checked by route handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Permission {
    /// Read any resource.
    #[serde(rename = "read:all")]
    ReadAll,
    /// Modify any resource.
    #[serde(rename = "write:all")]
    WriteAll,
    /// Delete any resource.
    #[serde(rename = "delete:all")]
    DeleteAll,
    /// Read resources owned by the caller.
    #[serde(rename = "read:own")]
    ReadOwn,
    /// Modify resources owned by the caller.
    #[serde(rename = "write:own")]
    WriteOwn,
    /// Delete resources owned by the caller.
    #[serde(rename = "delete:own")]
    DeleteOwn,
}

const ADMIN: &[Permission] = &[
    Permission::ReadAll,
    Permission::WriteAll,
    Permission::DeleteAll,
    Permission::ReadOwn,
    Permission::WriteOwn,
    Permission::DeleteOwn,
];

const BASIC: &[Permission] = &[
    Permission::ReadOwn,
    Permission::WriteOwn,
    Permission::DeleteOwn,
];

/// Returns every permission granted to `role`.
#[must_use]
pub const fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::Basic => BASIC,
    }
}

/// Returns `true` if `role` grants every permission in `required`.
#[must_use]
pub fn grants_all(role: Role, required: &[Permission]) -> bool {
    let granted = permissions_for(role);
    required.iter().all(|p| granted.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_can_write_own_but_not_all() {
        assert!(grants_all(Role::Basic, &[Permission::WriteOwn]));
        assert!(!grants_all(Role::Basic, &[Permission::WriteAll]));
    }

    #[test]
    fn admin_holds_its_whole_table() {
        assert!(grants_all(Role::Admin, permissions_for(Role::Admin)));
        assert!(grants_all(Role::Admin, permissions_for(Role::Basic)));
    }

    #[test]
    fn empty_requirement_always_passes() {
        assert!(grants_all(Role::Basic, &[]));
    }
}
