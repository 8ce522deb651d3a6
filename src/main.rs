//! Kickin weekly login service
//!
//! Architecture:
//! - `weekly` holds the pure week numbering, login bookkeeping and stats
//! - SeaORM persists user records (SQLite)
//! - Axum serves the HTTP API, a cron plugin closes finished weeks
//! - Tokio for async runtime

mod clock;
mod entity;
mod error;
mod migration;
mod plugins;
mod prelude;
mod state;
mod sv;
mod weekly;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::Supervisor,
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "kickin=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  info!(
    "Starting kickin v{} in {}",
    env!("CARGO_PKG_VERSION"),
    config.timezone
  );

  let app = Arc::new(AppState::new(config).await?);
  info!("Current week is {}", app.calendar.current_week_key());

  let handles = Supervisor::default()
    .register(plugins::server::Plugin)
    .register(plugins::cron::Plugin)
    .spawn(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down...");

  for handle in handles {
    handle.abort();
  }

  Ok(())
}
