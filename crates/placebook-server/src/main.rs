//! Placebook server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the places API over HTTP.
//!
//! # Provisioning users
//!
//! Users are owned by the auth service. To make a user's name resolve in
//! place listings on a standalone deployment:
//!
//! ```text
//! cargo run -p placebook-server -- --add-user alice
//! ```

mod settings;

use anyhow::Context as _;
use clap::Parser;
use placebook_api::{AppState, JwtResolver};
use placebook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Placebook places API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,

  /// Register a user with this username, print its id, and exit.
  #[arg(long, value_name = "USERNAME")]
  add_user: Option<String>,
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

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: provision a user and exit.
  if let Some(username) = cli.add_user {
    let user = store
      .add_user(username)
      .await
      .context("failed to add user")?;
    println!("{}", user.id);
    return Ok(());
  }

  let resolver = JwtResolver::new(server_cfg.auth_secret()?);
  let state = AppState::new(store, resolver);
  let app = placebook_api::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
