/// All domain errors for examtrail.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum ExamTrailError {
    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Change log error: {detail}")]
    ChangeLogError { detail: String },

    #[error("Failed to render report: {detail}")]
    ReportRenderError { detail: String },

    #[error("User directory error: {detail}")]
    UserDirectoryError { detail: String },

    #[error(
        "User '{user_id}' not found\n\n  \
         Run 'examtrail users list' to see the users that currently exist."
    )]
    UserNotFound { user_id: String },

    #[error(
        "User '{user_id}' already exists\n\n  \
         User ids are never reused. Pick a different id."
    )]
    UserAlreadyExists { user_id: String },

    #[error("User '{user_id}' is already a member of role '{role_id}'")]
    AlreadyInRole { user_id: String, role_id: String },

    #[error("User '{user_id}' is not a member of role '{role_id}'")]
    NotInRole { user_id: String, role_id: String },

    #[error("Role '{role_id}' already has permission '{permission}'")]
    PermissionAlreadyGranted { role_id: String, permission: String },

    #[error("Role '{role_id}' does not have permission '{permission}'")]
    PermissionNotGranted { role_id: String, permission: String },

    #[error(
        "Invalid {what}: '{value}'\n\n  \
         Identifiers may contain letters, digits, '-', '_', '.' and '@' only."
    )]
    InvalidIdentifier { what: String, value: String },

    #[error(
        "Invalid month: '{value}'\n\n  \
         Expected YYYY-MM, e.g. 2026-01"
    )]
    InvalidMonth { value: String },

    #[error(
        "This project uses format version {project_version}, but your examtrail \
         only supports up to version {supported_version}.\n\n  \
         Solutions:\n    \
         → Install the latest release: cargo install examtrail --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExamTrailError>;
