use crate::cli::commands::project::Project;
use crate::cli::{RolesAction, context, output};
use crate::core::errors::Result;

/// Execute the `examtrail roles` command.
pub fn execute(action: &RolesAction, actor: Option<&str>) -> Result<()> {
    let project = Project::open()?;
    let admin = project.admin_service(actor);

    let record = match action {
        RolesAction::Join { user, role } => {
            context::validate_identifier(role, "role id")?;
            admin.join_role(user, role)?
        }
        RolesAction::Leave { user, role } => admin.leave_role(user, role)?,
        RolesAction::Grant { role, permission } => {
            context::validate_identifier(role, "role id")?;
            context::validate_identifier(permission, "permission")?;
            admin.grant_permission(role, permission)?
        }
        RolesAction::Revoke { role, permission } => admin.revoke_permission(role, permission)?,
    };

    output::success(&record.details);
    Ok(())
}
