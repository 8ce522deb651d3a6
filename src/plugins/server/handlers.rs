use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  prelude::*,
  state::AppState,
  weekly::{self, UserWeeklyState, WeekKey, WeekSummary},
};

pub async fn health() -> &'static str {
  "OK"
}

#[derive(Debug, Serialize)]
pub struct CurrentWeekRes {
  pub week: WeekKey,
}

pub async fn current_week(
  State(app): State<Arc<AppState>>,
) -> Json<CurrentWeekRes> {
  Json(CurrentWeekRes { week: app.calendar.current_week_key() })
}

pub async fn week_dates(Path(key): Path<String>) -> Result<Json<[NaiveDate; 7]>> {
  Ok(Json(weekly::dates_in_week(&key)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginReq {
  #[serde(default)]
  pub points: i64,
}

pub async fn login(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<i64>,
  Json(req): Json<LoginReq>,
) -> Result<Json<UserWeeklyState>> {
  let state = app.sv().user.login(user_id, req.points).await?;
  Ok(Json(state))
}

pub async fn weekly_stats(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<i64>,
) -> Result<Json<Vec<WeekSummary>>> {
  Ok(Json(app.sv().user.weekly_stats(user_id).await?))
}
