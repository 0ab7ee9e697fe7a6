//! Server command implementation

use std::path::Path;

use anyhow::Result;
use traevo_server::{auth::JWT_SECRET_ENV, ServerConfig};

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, no_encrypt: bool) -> Result<()> {
    let config = ServerConfig::from_env().ok_or_else(|| {
        anyhow::anyhow!(
            "Token signing requires a secret. Set {} before starting the server.",
            JWT_SECRET_ENV
        )
    })?;

    println!("🚀 Starting Traevo web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   🔐 Authentication: bearer tokens (access {} min, refresh {} days)",
        config.tokens.access_ttl.num_minutes(),
        config.tokens.refresh_ttl.num_days()
    );
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;
    traevo_server::serve(db, host, port, config).await?;

    Ok(())
}
