//! Migrate command - Schema migrations plus the role rows the schema needs.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Manual control: nothing is applied until the action says so
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            tracing::info!("Migrations applied");
            seed_roles(&db, config).await?;
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &status {
                println!("{}: {}", name, if *applied { "applied" } else { "pending" });
            }
            println!("{} migrations, {} pending", status.len(), pending);
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.fresh_migrations().await?;
            seed_roles(&db, config).await?;
        }
    }

    Ok(())
}

/// Role rows are reference data; a schema without them cannot register users.
async fn seed_roles(db: &Database, config: Config) -> AppResult<()> {
    let services = Services::from_connection(db.get_connection(), config);
    let created = services.roles().seed_roles().await?;
    tracing::info!(created = ?created, "Roles checked");
    Ok(())
}
