//! Weekly login bookkeeping over a single user's record.
//!
//! Everything here is a pure transformation of [`UserWeeklyState`]; loading
//! and persisting the record is left to [`crate::sv::User`].

pub mod stats;
pub mod tracker;
pub mod week;

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

pub use stats::{WeekSummary, weekly_stats};
pub use tracker::{record_login, roll_over};
pub use week::{Calendar, ParseError, WeekKey, dates_in_week};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLogin {
  pub login: bool,
  pub points: i64,
}

pub type WeeklyLogins = BTreeMap<WeekKey, BTreeMap<NaiveDate, DayLogin>>;

/// Snapshot of a week taken when it was closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekHistoryEntry {
  pub week: WeekKey,
  /// Points earned during `week`.
  pub point: i64,
  /// Points across every closed week up to and including `week`.
  pub total_point: i64,
  pub reset_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserWeeklyState {
  #[serde(default)]
  pub weekly_logins: WeeklyLogins,
  #[serde(default)]
  pub week_history: Vec<WeekHistoryEntry>,
  /// Live total of the open week.
  #[serde(default)]
  pub total_point: i64,
  /// Week `total_point` accrues into, unset until the first rollover.
  #[serde(default)]
  pub open_week: Option<WeekKey>,
}
