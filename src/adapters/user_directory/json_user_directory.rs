use std::path::{Path, PathBuf};

use crate::config::app_config::StorageSection;
use crate::core::errors::{ExamTrailError, Result};
use crate::core::models::user_profile::UserProfile;
use crate::core::traits::user_directory::UserDirectory;

/// File-based user directory that keeps the current users as a JSON array.
///
/// Example `users.json`:
/// ```json
/// [
///   {
///     "id": "u-001",
///     "user_name": "alice",
///     "display_name": "Alice Liddell",
///     "avatar_relative_path": "/images/default-avatar.jpg"
///   }
/// ]
/// ```
#[derive(Clone)]
pub struct JsonUserDirectory {
    path: PathBuf,
}

impl JsonUserDirectory {
    /// Create a directory stored at `{examtrail_dir}/{users_file}`.
    pub fn new(examtrail_dir: &Path, users_file: &str) -> Self {
        Self {
            path: examtrail_dir.join(users_file),
        }
    }

    /// Create a directory from the `[storage]` section.
    pub fn from_config(examtrail_dir: &Path, storage: &StorageSection) -> Self {
        Self::new(examtrail_dir, &storage.users_file)
    }

    /// Return the file path this directory reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, users: &[UserProfile]) -> Result<()> {
        let content =
            serde_json::to_string_pretty(users).map_err(|e| ExamTrailError::UserDirectoryError {
                detail: format!("Failed to serialize users: {e}"),
            })?;
        std::fs::write(&self.path, content + "\n")?;
        Ok(())
    }
}

impl UserDirectory for JsonUserDirectory {
    fn add(&self, user: &UserProfile) -> Result<()> {
        let mut existing = self.list()?;

        if existing.iter().any(|u| u.id == user.id) {
            return Err(ExamTrailError::UserAlreadyExists {
                user_id: user.id.clone(),
            });
        }

        existing.push(user.clone());
        self.save(&existing)
    }

    fn list(&self) -> Result<Vec<UserProfile>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| ExamTrailError::UserDirectoryError {
            detail: format!("Malformed {}: {e}", self.path.display()),
        })
    }

    fn remove(&self, user_id: &str) -> Result<UserProfile> {
        let mut existing = self.list()?;

        let Some(pos) = existing.iter().position(|u| u.id == user_id) else {
            return Err(ExamTrailError::UserNotFound {
                user_id: user_id.to_string(),
            });
        };

        let removed = existing.remove(pos);
        self.save(&existing)?;
        Ok(removed)
    }
}
