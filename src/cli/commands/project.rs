use std::path::Path;

use crate::adapters::change_log::json_change_log::JsonChangeLog;
use crate::adapters::user_directory::json_user_directory::JsonUserDirectory;
use crate::cli::context;
use crate::config::app_config::AppConfig;
use crate::core::errors::{ExamTrailError, Result};
use crate::core::services::admin_service::AdminService;
use crate::core::services::change_recorder::ChangeRecorder;
use crate::core::services::change_service::ChangeService;

/// An initialized project: its directory and loaded configuration.
pub struct Project {
    pub config: AppConfig,
    dir: &'static Path,
}

impl Project {
    /// Open the project in the configured directory.
    pub fn open() -> Result<Self> {
        let dir = context::examtrail_dir();
        if !dir.exists() {
            return Err(ExamTrailError::InvalidConfig {
                detail: format!(
                    "examtrail not initialized ({} missing). Run 'examtrail init' first.",
                    dir.display()
                ),
            });
        }
        let config = AppConfig::load(dir)?;
        let project = Self { config, dir };
        tracing::debug!(
            version = %project.config.examtrail.version,
            log = %project.change_log().path().display(),
            users = %project.user_directory().path().display(),
            "project opened"
        );
        Ok(project)
    }

    pub fn change_log(&self) -> JsonChangeLog {
        JsonChangeLog::from_config(self.dir, &self.config.storage)
    }

    pub fn user_directory(&self) -> JsonUserDirectory {
        JsonUserDirectory::from_config(self.dir, &self.config.storage)
    }

    pub fn change_service(&self) -> ChangeService<JsonChangeLog, JsonUserDirectory> {
        ChangeService {
            log: self.change_log(),
            directory: self.user_directory(),
            tracked_permission: self.config.examtrail.tracked_permission.clone(),
        }
    }

    pub fn admin_service(
        &self,
        actor: Option<&str>,
    ) -> AdminService<JsonChangeLog, JsonUserDirectory> {
        AdminService {
            recorder: ChangeRecorder {
                log: self.change_log(),
                trigger_user_id: actor.map(str::to_string),
            },
            directory: self.user_directory(),
        }
    }
}
