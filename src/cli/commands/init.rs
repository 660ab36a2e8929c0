use crate::cli::{context, output};
use crate::config::app_config::DEFAULT_CONFIG;
use crate::core::errors::{ExamTrailError, Result};

/// Execute the `examtrail init` command.
///
/// Creates the project directory with a default config, an empty change
/// log and an empty user directory.
pub fn execute(verbose: bool) -> Result<()> {
    let dir = context::examtrail_dir();

    if dir.exists() {
        return Err(ExamTrailError::InvalidConfig {
            detail: format!(
                "examtrail is already initialized here ({} exists)",
                dir.display()
            ),
        });
    }

    output::header("examtrail — Initializing project");

    std::fs::create_dir_all(dir)?;
    output::success(&format!("Created {}/", dir.display()));

    std::fs::write(dir.join("config.toml"), DEFAULT_CONFIG)?;
    output::success("Generated config.toml with defaults");

    std::fs::write(dir.join("changes.log"), "")?;
    std::fs::write(dir.join("users.json"), "[]\n")?;
    output::success("Created empty change log and user directory");

    output::success("Project ready.\n");
    print_next_steps(verbose);

    Ok(())
}

fn print_next_steps(verbose: bool) {
    output::header("Next steps");
    println!("  1. examtrail users add <id> --username <name> --display-name <name>");
    println!("  2. examtrail roles grant <role> CanTakeExam");
    println!("  3. examtrail roles join <id> <role>");
    println!("  4. examtrail active-users");
    if verbose {
        println!("\n  Set EXAMTRAIL_ACTOR to record who performed each change.");
    }
}
