//! Seed command - Roles and the first Admin account.

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let created = services.roles().seed_roles().await?;
    if created.is_empty() {
        println!("Roles already present");
    } else {
        println!("Created roles: {}", created.join(", "));
    }

    if let (Some(username), Some(email), Some(password)) =
        (args.admin_username, args.admin_email, args.admin_password)
    {
        let admin = services
            .roles()
            .ensure_admin(username, email, password)
            .await?;
        println!("Admin account ready: {} ({})", admin.username, admin.id);
    }

    Ok(())
}
