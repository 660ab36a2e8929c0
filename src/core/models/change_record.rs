use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in `ChangeRecord::details`.
pub const MAX_DETAILS_LEN: usize = 200;

/// Lifecycle events that get recorded in the change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    UserCreated,
    UserDeleted,
    UserJoinedRole,
    UserLeftRole,
    RoleGainedPermission,
    RoleLostPermission,
}

impl ChangeKind {
    /// Whether this kind changes what a role grants rather than who holds it.
    pub fn is_role_permission_change(self) -> bool {
        matches!(self, Self::RoleGainedPermission | Self::RoleLostPermission)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UserCreated => "user created",
            Self::UserDeleted => "user deleted",
            Self::UserJoinedRole => "joined role",
            Self::UserLeftRole => "left role",
            Self::RoleGainedPermission => "perm granted",
            Self::RoleLostPermission => "perm revoked",
        };
        f.pad(name)
    }
}

/// One immutable entry in the change log (JSON lines format).
///
/// The stored shape keeps every target as optional so that historical or
/// hand-edited records still load; `event()` gives the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_permission: Option<String>,
    #[serde(default)]
    pub details: String,
}

/// Typed view of a `ChangeRecord`, carrying only the fields its kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent<'a> {
    UserCreated { user_id: &'a str },
    UserDeleted { user_id: &'a str },
    UserJoinedRole { user_id: &'a str, role_id: &'a str },
    UserLeftRole { user_id: &'a str, role_id: &'a str },
    RoleGainedPermission { role_id: &'a str, permission: &'a str },
    RoleLostPermission { role_id: &'a str, permission: &'a str },
}

impl ChangeRecord {
    fn new(kind: ChangeKind, occurred_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            occurred_at,
            trigger_user_id: None,
            target_user_id: None,
            target_display_name: None,
            target_role_id: None,
            target_permission: None,
            details: String::new(),
        }
    }

    pub fn user_created(
        user_id: &str,
        display_name: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_user_id: Some(user_id.to_string()),
            target_display_name: display_name.map(str::to_string),
            ..Self::new(ChangeKind::UserCreated, occurred_at)
        }
    }

    pub fn user_deleted(
        user_id: &str,
        display_name: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_user_id: Some(user_id.to_string()),
            target_display_name: display_name.map(str::to_string),
            ..Self::new(ChangeKind::UserDeleted, occurred_at)
        }
    }

    pub fn user_joined_role(user_id: &str, role_id: &str, occurred_at: DateTime<Utc>) -> Self {
        Self {
            target_user_id: Some(user_id.to_string()),
            target_role_id: Some(role_id.to_string()),
            ..Self::new(ChangeKind::UserJoinedRole, occurred_at)
        }
    }

    pub fn user_left_role(user_id: &str, role_id: &str, occurred_at: DateTime<Utc>) -> Self {
        Self {
            target_user_id: Some(user_id.to_string()),
            target_role_id: Some(role_id.to_string()),
            ..Self::new(ChangeKind::UserLeftRole, occurred_at)
        }
    }

    pub fn role_gained_permission(
        role_id: &str,
        permission: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_role_id: Some(role_id.to_string()),
            target_permission: Some(permission.to_string()),
            ..Self::new(ChangeKind::RoleGainedPermission, occurred_at)
        }
    }

    pub fn role_lost_permission(
        role_id: &str,
        permission: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_role_id: Some(role_id.to_string()),
            target_permission: Some(permission.to_string()),
            ..Self::new(ChangeKind::RoleLostPermission, occurred_at)
        }
    }

    /// Attach the id of the user who caused this change.
    pub fn triggered_by(mut self, trigger_user_id: Option<&str>) -> Self {
        self.trigger_user_id = trigger_user_id.map(str::to_string);
        self
    }

    /// Attach a human-readable note, truncated to `MAX_DETAILS_LEN` characters.
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = details.chars().take(MAX_DETAILS_LEN).collect();
        self
    }

    /// The typed event for this record, or `None` when a field its kind
    /// requires is missing.
    pub fn event(&self) -> Option<ChangeEvent<'_>> {
        let user = self.target_user_id.as_deref();
        let role = self.target_role_id.as_deref();
        let permission = self.target_permission.as_deref();

        match self.kind {
            ChangeKind::UserCreated => Some(ChangeEvent::UserCreated { user_id: user? }),
            ChangeKind::UserDeleted => Some(ChangeEvent::UserDeleted { user_id: user? }),
            ChangeKind::UserJoinedRole => Some(ChangeEvent::UserJoinedRole {
                user_id: user?,
                role_id: role?,
            }),
            ChangeKind::UserLeftRole => Some(ChangeEvent::UserLeftRole {
                user_id: user?,
                role_id: role?,
            }),
            ChangeKind::RoleGainedPermission => Some(ChangeEvent::RoleGainedPermission {
                role_id: role?,
                permission: permission?,
            }),
            ChangeKind::RoleLostPermission => Some(ChangeEvent::RoleLostPermission {
                role_id: role?,
                permission: permission?,
            }),
        }
    }

    /// Whether this record names the given user as target or trigger.
    pub fn involves_user(&self, user_id: &str) -> bool {
        self.target_user_id.as_deref() == Some(user_id)
            || self.trigger_user_id.as_deref() == Some(user_id)
    }
}
