//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Edusync - school management service
#[derive(Parser, Debug)]
#[command(name = "edusync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create the roles and optionally an Admin account
    Seed(SeedArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Username of the Admin account to create or promote
    #[arg(long, env = "ADMIN_USERNAME", requires_all = ["admin_email", "admin_password"])]
    pub admin_username: Option<String>,

    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_admin_flags_go_together() {
        let parsed = Cli::try_parse_from([
            "edusync",
            "seed",
            "--admin-username",
            "principal",
            "--admin-email",
            "principal@example.com",
            "--admin-password",
            "Secret123",
        ])
        .unwrap();
        assert!(matches!(parsed.command, Commands::Seed(ref a) if a.admin_username.is_some()));

        let partial = Cli::try_parse_from(["edusync", "seed", "--admin-username", "principal"]);
        assert!(partial.is_err());
    }

    #[test]
    fn test_migrate_actions() {
        let parsed = Cli::try_parse_from(["edusync", "-v", "migrate", "status"]).unwrap();
        assert!(parsed.verbose);
        assert!(matches!(
            parsed.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }
}
