use serde::Deserialize;
use std::path::Path;

use crate::cli::context::validate_simple_filename;
use crate::core::errors::{ExamTrailError, Result};
use crate::core::services::change_service::DEFAULT_REPORT_MONTHS;

/// Top-level configuration read from `.examtrail/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub examtrail: ExamTrailSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub reports: ReportsSection,
}

impl AppConfig {
    /// Load the configuration from `{examtrail_dir}/config.toml`.
    ///
    /// After parsing, validates the storage filenames to keep the log and
    /// user files inside the project directory.
    pub fn load(examtrail_dir: &Path) -> Result<Self> {
        let config_path = examtrail_dir.join("config.toml");
        if !config_path.exists() {
            return Err(ExamTrailError::InvalidConfig {
                detail: "config.toml not found. Run 'examtrail init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ExamTrailError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.examtrail.format_version > CURRENT_FORMAT_VERSION {
            return Err(ExamTrailError::FormatVersionTooNew {
                project_version: config.examtrail.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        validate_simple_filename(&config.storage.change_log, "change log file")?;
        validate_simple_filename(&config.storage.users_file, "users file")?;

        if config.examtrail.tracked_permission.trim().is_empty() {
            return Err(ExamTrailError::InvalidConfig {
                detail: "tracked_permission must not be empty".into(),
            });
        }

        Ok(config)
    }
}

/// Current format version supported by this build.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Permission whose holders are reported when not configured.
pub const DEFAULT_TRACKED_PERMISSION: &str = "CanTakeExam";

/// Config written by `examtrail init`.
pub const DEFAULT_CONFIG: &str = r#"[examtrail]
version = "0.1.0"
format_version = 1
tracked_permission = "CanTakeExam"

[storage]
change_log = "changes.log"
users_file = "users.json"

[reports]
default_months = 12
"#;

/// The `[examtrail]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamTrailSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default = "default_tracked_permission")]
    pub tracked_permission: String,
}

fn default_format_version() -> u32 {
    1
}

fn default_tracked_permission() -> String {
    DEFAULT_TRACKED_PERMISSION.to_string()
}

/// The `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_change_log")]
    pub change_log: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            change_log: default_change_log(),
            users_file: default_users_file(),
        }
    }
}

fn default_change_log() -> String {
    "changes.log".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

/// The `[reports]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsSection {
    #[serde(default = "default_months")]
    pub default_months: u32,
}

impl Default for ReportsSection {
    fn default() -> Self {
        Self {
            default_months: default_months(),
        }
    }
}

fn default_months() -> u32 {
    DEFAULT_REPORT_MONTHS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = AppConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.examtrail.tracked_permission, "CanTakeExam");
        assert_eq!(config.storage.change_log, "changes.log");
        assert_eq!(config.reports.default_months, 12);
    }

    #[test]
    fn optional_sections_default() {
        let config = AppConfig::parse("[examtrail]\nversion = \"0.1.0\"\n").unwrap();
        assert_eq!(config.examtrail.format_version, 1);
        assert_eq!(config.examtrail.tracked_permission, DEFAULT_TRACKED_PERMISSION);
        assert_eq!(config.storage.users_file, "users.json");
        assert_eq!(config.reports.default_months, DEFAULT_REPORT_MONTHS);
    }

    #[test]
    fn newer_format_version_rejected() {
        let err = AppConfig::parse("[examtrail]\nversion = \"9.0.0\"\nformat_version = 2\n")
            .unwrap_err();
        assert!(matches!(err, ExamTrailError::FormatVersionTooNew { .. }));
    }

    #[test]
    fn path_traversal_in_storage_rejected() {
        let content =
            "[examtrail]\nversion = \"0.1.0\"\n\n[storage]\nchange_log = \"../escape.log\"\n";
        let err = AppConfig::parse(content).unwrap_err();
        assert!(matches!(err, ExamTrailError::InvalidConfig { .. }));
    }

    #[test]
    fn empty_tracked_permission_rejected() {
        let content = "[examtrail]\nversion = \"0.1.0\"\ntracked_permission = \" \"\n";
        assert!(AppConfig::parse(content).is_err());
    }

    #[test]
    fn missing_config_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("examtrail init"));
    }
}
