//! roster-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the directory API over HTTP.
//!
//! # Bootstrapping an admin
//!
//! Registration only ever creates students. Create the first admin with:
//!
//! ```
//! cargo run -p roster-server -- --create-admin admin@example.edu
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::Parser;
use roster_api::{ApiState, auth::hash_password};
use roster_core::{
  identity::{NewUser, Role},
  store::IdentityStore,
};
use roster_server::{ServerConfig, app, expand_tilde};
use roster_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster student directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create an admin account with this email (password read from stdin)
  /// and exit.
  #[arg(long, value_name = "EMAIL")]
  create_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(email) = cli.create_admin {
    return create_admin(&store, email).await;
  }

  let state = ApiState::new(store, server_cfg.api_config());
  let address = server_cfg.address();

  tracing::info!(store = ?store_path, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(state)).await.context("server error")?;

  Ok(())
}

async fn create_admin(store: &SqliteStore, email: String) -> anyhow::Result<()> {
  let password = read_password()?;
  if password.is_empty() {
    bail!("password must not be empty");
  }
  let password_hash =
    hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;

  let Some(user) = store
    .create_user(NewUser { email: email.clone(), password_hash, role: Role::Admin })
    .await
    .context("failed to create admin")?
  else {
    bail!("{email} is already registered");
  };

  tracing::info!(user_id = %user.id, "admin created");
  println!("created admin {} ({})", user.email, user.id);
  Ok(())
}

/// Read a password line from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
