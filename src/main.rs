mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "examtrail=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("EXAMTRAIL_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Cli::parse();

    init_tracing(args.verbose);
    cli::context::init(args.dir.as_deref());
    cli::output::set_quiet(args.quiet);

    let actor = args.actor.as_deref();

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(args.verbose),
        Commands::Users { action } => cli::commands::users::execute(action, actor),
        Commands::Roles { action } => cli::commands::roles::execute(action, actor),
        Commands::History { user, since, last } => {
            cli::commands::history::execute(user.as_deref(), since.as_deref(), *last)
        }
        Commands::ActiveUsers { months } => cli::commands::active_users::execute(*months),
        Commands::ActiveUsersDetails { month, json } => {
            cli::commands::active_users::execute_details(month, *json)
        }
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
