mod handlers;

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
  Router,
  routing::{get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub fn router(app: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(handlers::health))
    .route("/api/weeks/current", get(handlers::current_week))
    .route("/api/weeks/{key}/dates", get(handlers::week_dates))
    .route("/api/users/{id}/login", post(handlers::login))
    .route("/api/users/{id}/weekly-stats", get(handlers::weekly_stats))
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
      ),
    )
    .with_state(app)
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();
    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));

    let router = router(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on {addr}");

    let limiter = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => result,
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}
