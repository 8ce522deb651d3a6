//! Weekly rollover job

use async_trait::async_trait;
use tokio::time::{MissedTickBehavior, interval};

use crate::{prelude::*, state::AppState};

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "rollover"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut ticker = interval(app.config.rollover_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      ticker.tick().await;

      let closed = app
        .sv()
        .user
        .roll_over_all()
        .await
        .context("Weekly rollover failed")?;

      if closed > 0 {
        info!(
          "Closed {closed} weeks, now in {}",
          app.calendar.current_week_key()
        );
      }
    }
  }
}
