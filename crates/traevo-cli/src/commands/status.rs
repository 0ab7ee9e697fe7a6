//! Status command implementation

use std::path::Path;

use anyhow::Result;
use traevo_core::db::Database;

use super::open_db;

/// Count users and their transactions, failing on the first query error
pub fn database_counts(db: &Database) -> Result<(usize, i64)> {
    let users = db.list_users()?;
    let mut transactions = 0;
    for user in &users {
        transactions += db.count_transactions(user.id)?;
    }
    Ok((users.len(), transactions))
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;
    use traevo_core::db::DB_KEY_ENV;

    println!();
    println!("📊 Traevo Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    // Check encryption status
    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    // Try to open the database and show stats
    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => match database_counts(&db) {
                Ok((users, transactions)) => {
                    println!();
                    println!("   Users: {}", users);
                    println!("   Transactions: {}", transactions);
                }
                Err(e) => {
                    println!();
                    println!("   ❌ Error reading database: {}", e);
                }
            },
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}
