pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

/// Track who could take exams, and when.
#[derive(Parser, Debug)]
#[command(name = "examtrail", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Id of the administrator performing changes (recorded in the log)
    #[arg(long, global = true, env = "EXAMTRAIL_ACTOR")]
    pub actor: Option<String>,

    /// Verbose output (debug diagnostics on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the project directory (default: .examtrail)
    #[arg(long, global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize examtrail in the current directory
    Init,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage role membership and role permissions
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },

    /// Show change history, newest first
    History {
        /// Only changes targeting or triggered by this user
        #[arg(long)]
        user: Option<String>,
        /// Only changes since this date (ISO 8601)
        #[arg(long)]
        since: Option<String>,
        /// Show the last N changes
        #[arg(long)]
        last: Option<usize>,
    },

    /// Count active users per month, newest first
    ActiveUsers {
        /// Number of months to report (default from config)
        #[arg(long)]
        months: Option<u32>,
    },

    /// Show every active user of one month with their active times
    ActiveUsersDetails {
        /// Month to report (YYYY-MM)
        month: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// Create a user
    Add {
        /// Unique user id
        id: String,
        /// Login name
        #[arg(long)]
        username: String,
        /// Name shown in reports
        #[arg(long)]
        display_name: String,
        /// Avatar path
        #[arg(long)]
        avatar: Option<String>,
    },
    /// List current users
    List,
    /// Delete a user
    Remove {
        /// User id to delete
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RolesAction {
    /// Add a user to a role
    Join { user: String, role: String },
    /// Remove a user from a role
    Leave { user: String, role: String },
    /// Grant a permission to a role
    Grant { role: String, permission: String },
    /// Revoke a permission from a role
    Revoke { role: String, permission: String },
}
