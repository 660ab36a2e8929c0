use colored::Colorize;

use crate::cli::commands::project::Project;
use crate::cli::{UsersAction, context, output};
use crate::core::errors::Result;
use crate::core::models::user_profile::{DEFAULT_AVATAR_PATH, UserProfile};
use crate::core::traits::user_directory::UserDirectory;

/// Execute the `examtrail users` command.
pub fn execute(action: &UsersAction, actor: Option<&str>) -> Result<()> {
    let project = Project::open()?;
    match action {
        UsersAction::Add {
            id,
            username,
            display_name,
            avatar,
        } => {
            context::validate_identifier(id, "user id")?;
            let user = UserProfile {
                id: id.clone(),
                user_name: username.clone(),
                display_name: display_name.clone(),
                avatar_relative_path: avatar
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AVATAR_PATH.to_string()),
            };
            let record = project.admin_service(actor).create_user(&user)?;
            output::success(&record.details);
            Ok(())
        }
        UsersAction::Remove { id } => {
            let record = project.admin_service(actor).delete_user(id)?;
            output::success(&record.details);
            Ok(())
        }
        UsersAction::List => execute_list(&project),
    }
}

fn execute_list(project: &Project) -> Result<()> {
    let users = project.user_directory().list()?;

    if users.is_empty() {
        output::warning("No users yet");
        println!(
            "  Add one with: examtrail users add <id> --username <name> --display-name <name>"
        );
        return Ok(());
    }

    output::header(&format!("Users ({})", users.len()));
    for user in &users {
        println!(
            "  {} {} {}",
            user.id.cyan(),
            "│".dimmed(),
            user,
        );
    }
    Ok(())
}
