//! User command implementations

use anyhow::Result;
use tracing::info;
use traevo_core::db::Database;
use traevo_core::models::NewUser;

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users registered. Add one with:");
        println!("  traevo users add --name NAME --email EMAIL --password PASSWORD");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────────────────────");

    for user in users {
        println!(
            "   [{}] {} <{}> since {}",
            user.id,
            user.name,
            user.email,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, name: &str, email: &str, password: &str) -> Result<()> {
    let user = db.create_user(&NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })?;

    db.log_audit(user.id, "register", Some("user"), Some(user.id), Some("cli"))?;
    info!(user_id = user.id, "Registered user from CLI");

    println!("✅ Registered {} <{}> (id {})", user.name, user.email, user.id);

    Ok(())
}
