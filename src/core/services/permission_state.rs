use std::collections::{HashMap, HashSet};

use crate::core::models::change_record::{ChangeEvent, ChangeRecord};

/// Point-in-time projection of the change log: which users are deleted,
/// which permissions each role grants, and which roles each user holds.
///
/// Built by applying records one at a time in log order. Records missing a
/// field their kind needs leave the state untouched.
#[derive(Debug, Clone, Default)]
pub struct PermissionState {
    deleted: HashMap<String, bool>,
    role_permissions: HashMap<String, HashSet<String>>,
    user_roles: HashMap<String, HashSet<String>>,
    display_names: HashMap<String, String>,
}

impl PermissionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay `records` (already ordered) into a fresh state.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> Self {
        let mut state = Self::new();
        for record in records {
            state.apply(record);
        }
        state
    }

    /// Apply one record.
    pub fn apply(&mut self, record: &ChangeRecord) {
        if let (Some(user_id), Some(name)) = (
            record.target_user_id.as_deref(),
            record.target_display_name.as_deref(),
        ) && !name.is_empty()
        {
            self.display_names
                .insert(user_id.to_string(), name.to_string());
        }

        let Some(event) = record.event() else {
            tracing::debug!(
                kind = %record.kind,
                at = %record.occurred_at,
                "record missing targets, skipped"
            );
            return;
        };

        match event {
            ChangeEvent::UserCreated { user_id } => {
                self.deleted.insert(user_id.to_string(), false);
            }
            ChangeEvent::UserDeleted { user_id } => {
                self.deleted.insert(user_id.to_string(), true);
            }
            ChangeEvent::UserJoinedRole { user_id, role_id } => {
                self.user_roles
                    .entry(user_id.to_string())
                    .or_default()
                    .insert(role_id.to_string());
            }
            ChangeEvent::UserLeftRole { user_id, role_id } => {
                if let Some(roles) = self.user_roles.get_mut(user_id) {
                    roles.remove(role_id);
                }
            }
            ChangeEvent::RoleGainedPermission {
                role_id,
                permission,
            } => {
                self.role_permissions
                    .entry(role_id.to_string())
                    .or_default()
                    .insert(permission.to_string());
            }
            ChangeEvent::RoleLostPermission {
                role_id,
                permission,
            } => {
                if let Some(permissions) = self.role_permissions.get_mut(role_id) {
                    permissions.remove(permission);
                }
            }
        }
    }

    /// Whether `user_id` was marked deleted.
    pub fn is_deleted(&self, user_id: &str) -> bool {
        self.deleted.get(user_id).copied().unwrap_or(false)
    }

    /// Whether the user is known to the log, deleted or not.
    pub fn is_known(&self, user_id: &str) -> bool {
        self.deleted.contains_key(user_id)
    }

    /// A user holds `permission` when they are not deleted and at least one
    /// of their roles grants it.
    pub fn holds(&self, user_id: &str, permission: &str) -> bool {
        if self.is_deleted(user_id) {
            return false;
        }
        self.user_roles.get(user_id).is_some_and(|roles| {
            roles.iter().any(|role| self.role_grants(role, permission))
        })
    }

    /// Whether `role_id` currently grants `permission`.
    pub fn role_grants(&self, role_id: &str, permission: &str) -> bool {
        self.role_permissions
            .get(role_id)
            .is_some_and(|p| p.contains(permission))
    }

    /// Whether `user_id` currently holds `role_id`.
    pub fn in_role(&self, user_id: &str, role_id: &str) -> bool {
        self.user_roles
            .get(user_id)
            .is_some_and(|roles| roles.contains(role_id))
    }

    /// Users currently holding `role_id`, in no particular order.
    pub fn members_of<'s>(&'s self, role_id: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.user_roles
            .iter()
            .filter(move |(_, roles)| roles.contains(role_id))
            .map(|(user, _)| user.as_str())
    }

    /// Consume the state, keeping only the display names.
    pub fn into_display_names(self) -> HashMap<String, String> {
        self.display_names
    }
}
