use std::env;

use chrono_tz::Tz;

use crate::{
  clock::{Clock, SystemClock},
  migration::Migrator,
  prelude::*,
  sv,
  weekly::Calendar,
};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub timezone: Tz,
  pub port: u16,
  /// How often the rollover job checks for a closed week.
  pub rollover_interval: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:kickin.db?mode=rwc"),
      timezone: chrono_tz::Asia::Ho_Chi_Minh,
      port: 3000,
      rollover_interval: Duration::from_secs(60),
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let mut config = Self::default();

    if let Ok(url) = env::var("DATABASE_URL") {
      config.database_url = url;
    }

    if let Ok(tz) = env::var("TIMEZONE") {
      config.timezone = tz
        .parse()
        .map_err(|err| anyhow::anyhow!("Invalid TIMEZONE `{tz}`: {err}"))?;
    }

    if let Ok(port) = env::var("PORT") {
      config.port = port.parse().context("Invalid PORT")?;
    }

    if let Ok(interval) = env::var("ROLLOVER_INTERVAL") {
      config.rollover_interval = humantime::parse_duration(&interval)
        .context("Invalid ROLLOVER_INTERVAL")?;
      anyhow::ensure!(
        !config.rollover_interval.is_zero(),
        "ROLLOVER_INTERVAL must be positive"
      );
    }

    Ok(config)
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub calendar: Calendar,
  pub config: Config,
  locks: sv::Locks,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let clock = SystemClock::new(config.timezone);
    Self::with_clock(config, Arc::new(clock)).await
  }

  pub async fn with_clock(
    config: Config,
    clock: Arc<dyn Clock>,
  ) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self {
      db,
      calendar: Calendar::new(clock),
      config,
      locks: sv::Locks::new(),
    })
  }

  pub fn sv(&self) -> Services<'_> {
    Services { user: sv::User::new(&self.db, &self.calendar, &self.locks) }
  }
}
