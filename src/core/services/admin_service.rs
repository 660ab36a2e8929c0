use crate::core::errors::{ExamTrailError, Result};
use crate::core::models::change_record::ChangeRecord;
use crate::core::models::user_profile::UserProfile;
use crate::core::services::change_message;
use crate::core::services::change_recorder::ChangeRecorder;
use crate::core::services::permission_state::PermissionState;
use crate::core::traits::change_log::ChangeLog;
use crate::core::traits::user_directory::UserDirectory;

/// User and role administration. Every successful action appends the
/// matching change record.
///
/// Role membership and role permissions live only in the change log, so
/// preconditions are checked against the replayed current state.
pub struct AdminService<L: ChangeLog, D: UserDirectory> {
    pub recorder: ChangeRecorder<L>,
    pub directory: D,
}

impl<L: ChangeLog, D: UserDirectory> AdminService<L, D> {
    fn current_state(&self) -> Result<PermissionState> {
        let records = self.recorder.log.records_until(chrono::Utc::now())?;
        Ok(PermissionState::from_records(&records))
    }

    fn existing_user(&self, user_id: &str) -> Result<UserProfile> {
        self.directory
            .find(user_id)?
            .ok_or_else(|| ExamTrailError::UserNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Add a user to the directory and record its creation.
    ///
    /// Ids already seen in the change log are refused even if the user was
    /// deleted, so history for one id always describes one person. If the
    /// record cannot be appended, the user is removed again.
    pub fn create_user(&self, user: &UserProfile) -> Result<ChangeRecord> {
        if self.directory.find(&user.id)?.is_some() || self.current_state()?.is_known(&user.id) {
            return Err(ExamTrailError::UserAlreadyExists {
                user_id: user.id.clone(),
            });
        }

        self.directory.add(user)?;
        let recorded = self.recorder.record(
            |at| ChangeRecord::user_created(&user.id, Some(&user.display_name), at),
            &change_message::user_created(&user.user_name),
        );

        if recorded.is_err()
            && let Err(e) = self.directory.remove(&user.id)
        {
            tracing::warn!(user_id = %user.id, error = %e, "could not roll back user creation");
        }
        recorded
    }

    /// Remove a user from the directory and record the deletion with a
    /// snapshot of their display name.
    ///
    /// The directory and the log change together: if the record cannot be
    /// appended, the profile is put back.
    pub fn delete_user(&self, user_id: &str) -> Result<ChangeRecord> {
        let removed = self.directory.remove(user_id)?;
        let recorded = self.recorder.record(
            |at| ChangeRecord::user_deleted(&removed.id, Some(&removed.display_name), at),
            &change_message::user_deleted(&removed.user_name),
        );

        if recorded.is_err()
            && let Err(e) = self.directory.add(&removed)
        {
            tracing::warn!(user_id = %removed.id, error = %e, "could not roll back user deletion");
        }
        recorded
    }

    pub fn join_role(&self, user_id: &str, role_id: &str) -> Result<ChangeRecord> {
        let user = self.existing_user(user_id)?;
        if self.current_state()?.in_role(user_id, role_id) {
            return Err(ExamTrailError::AlreadyInRole {
                user_id: user_id.to_string(),
                role_id: role_id.to_string(),
            });
        }

        self.recorder.record(
            |at| {
                let mut record = ChangeRecord::user_joined_role(user_id, role_id, at);
                record.target_display_name = Some(user.display_name.clone());
                record
            },
            &change_message::user_joined_role(&user.user_name, role_id),
        )
    }

    pub fn leave_role(&self, user_id: &str, role_id: &str) -> Result<ChangeRecord> {
        let user = self.existing_user(user_id)?;
        if !self.current_state()?.in_role(user_id, role_id) {
            return Err(ExamTrailError::NotInRole {
                user_id: user_id.to_string(),
                role_id: role_id.to_string(),
            });
        }

        self.recorder.record(
            |at| {
                let mut record = ChangeRecord::user_left_role(user_id, role_id, at);
                record.target_display_name = Some(user.display_name.clone());
                record
            },
            &change_message::user_left_role(&user.user_name, role_id),
        )
    }

    pub fn grant_permission(&self, role_id: &str, permission: &str) -> Result<ChangeRecord> {
        if self.current_state()?.role_grants(role_id, permission) {
            return Err(ExamTrailError::PermissionAlreadyGranted {
                role_id: role_id.to_string(),
                permission: permission.to_string(),
            });
        }

        self.recorder.record(
            |at| ChangeRecord::role_gained_permission(role_id, permission, at),
            &change_message::role_gained_permission(role_id, permission),
        )
    }

    pub fn revoke_permission(&self, role_id: &str, permission: &str) -> Result<ChangeRecord> {
        if !self.current_state()?.role_grants(role_id, permission) {
            return Err(ExamTrailError::PermissionNotGranted {
                role_id: role_id.to_string(),
                permission: permission.to_string(),
            });
        }

        self.recorder.record(
            |at| ChangeRecord::role_lost_permission(role_id, permission, at),
            &change_message::role_lost_permission(role_id, permission),
        )
    }
}
