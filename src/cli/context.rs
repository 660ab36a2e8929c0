use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};

use regex::Regex;

use crate::core::errors::{ExamTrailError, Result};

static EXAMTRAIL_DIR: OnceLock<PathBuf> = OnceLock::new();

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._@-]{0,127}$").expect("identifier pattern is valid")
});

static MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("month pattern is valid"));

/// Initialize the global project directory path.
/// If `custom` is provided, uses that path; otherwise defaults to `.examtrail`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".examtrail"));
    let _ = EXAMTRAIL_DIR.set(dir);
}

/// Get the current project directory path.
pub fn examtrail_dir() -> &'static Path {
    EXAMTRAIL_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(".examtrail"))
}

/// Reject user, role and permission ids that would be ambiguous in the log.
pub fn validate_identifier(value: &str, what: &str) -> Result<()> {
    if IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(ExamTrailError::InvalidIdentifier {
            what: what.to_string(),
            value: value.to_string(),
        })
    }
}

/// Accept only a bare file name: no separators, no parent references.
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..");
    if bad {
        return Err(ExamTrailError::InvalidConfig {
            detail: format!("{what} must be a plain file name, got '{name}'"),
        });
    }
    Ok(())
}

/// Parse a `YYYY-MM` argument into `(year, month)`.
pub fn parse_month(value: &str) -> Result<(i32, u32)> {
    let invalid = || ExamTrailError::InvalidMonth {
        value: value.to_string(),
    };
    let caps = MONTH.captures(value.trim()).ok_or_else(invalid)?;
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_identifier("user-1", "user id").is_ok());
        assert!(validate_identifier("alice@school.example", "user id").is_ok());
        assert!(validate_identifier("CanTakeExam", "permission").is_ok());
        assert!(validate_identifier("", "user id").is_err());
        assert!(validate_identifier("has space", "user id").is_err());
        assert!(validate_identifier("-leading", "role id").is_err());
    }

    #[test]
    fn simple_filenames() {
        assert!(validate_simple_filename("changes.log", "log").is_ok());
        assert!(validate_simple_filename("../x", "log").is_err());
        assert!(validate_simple_filename("a/b", "log").is_err());
        assert!(validate_simple_filename("", "log").is_err());
    }

    #[test]
    fn months() {
        assert_eq!(parse_month("2026-01").unwrap(), (2026, 1));
        assert_eq!(parse_month(" 2025-12 ").unwrap(), (2025, 12));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("2026-00").is_err());
        assert!(parse_month("2026-1").is_err());
        assert!(parse_month("January").is_err());
    }
}
