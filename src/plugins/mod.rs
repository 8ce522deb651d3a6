pub mod cron;
pub mod server;

use tokio::{task::JoinHandle, time::sleep};

use crate::{prelude::*, state::AppState};

const RESTART_BACKOFF: Duration = Duration::from_secs(5);

/// Long-running part of the service, restarted whenever it returns.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str;

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct Supervisor {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl Supervisor {
  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub fn spawn(self, app: Arc<AppState>) -> Vec<JoinHandle<()>> {
    self
      .plugins
      .into_iter()
      .map(|plugin| tokio::spawn(supervise(plugin, app.clone())))
      .collect()
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("Plugin `{name}` started");

  loop {
    let run = {
      let (plugin, app) = (plugin.clone(), app.clone());
      tokio::spawn(async move { plugin.start(app).await })
    };

    match run.await {
      Ok(Ok(())) => warn!("Plugin `{name}` stopped unexpectedly"),
      Ok(Err(err)) => error!("Plugin `{name}` failed: {err:#}"),
      Err(join_err) if join_err.is_cancelled() => {
        info!("Plugin `{name}` shut down");
        return;
      }
      Err(_) => error!("Plugin `{name}` panicked"),
    }

    sleep(RESTART_BACKOFF).await;
    info!("Restarting plugin `{name}`...");
  }
}
