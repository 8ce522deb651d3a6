use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::{Calendar, ParseError, UserWeeklyState, WeekKey};

/// Weeks covered by [`weekly_stats`].
pub const STATS_WEEKS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayFlag {
  pub date: NaiveDate,
  pub has_login: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
  pub week: WeekKey,
  pub dates: Vec<DayFlag>,
  pub total_points: i64,
}

/// Login days and points of the last five weeks, oldest first.
///
/// Only the newest week is open, so it reports the live `total_point`.
/// Older weeks read their snapshot from `week_history` and report 0 when
/// none was taken.
pub fn weekly_stats(
  calendar: &Calendar,
  state: &UserWeeklyState,
) -> Result<Vec<WeekSummary>, ParseError> {
  let weeks = calendar.last_n_week_keys(STATS_WEEKS);
  let history: HashMap<WeekKey, i64> =
    state.week_history.iter().map(|entry| (entry.week, entry.point)).collect();

  weeks
    .iter()
    .enumerate()
    .map(|(idx, &week)| -> Result<WeekSummary, ParseError> {
      let logins = state.weekly_logins.get(&week);
      let dates = week
        .dates()?
        .into_iter()
        .map(|date| DayFlag {
          date,
          has_login: logins.is_some_and(|days| days.contains_key(&date)),
        })
        .collect();

      let total_points = if idx == weeks.len() - 1 {
        state.total_point
      } else {
        history.get(&week).copied().unwrap_or(0)
      };

      Ok(WeekSummary { week, dates, total_points })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use chrono::{Datelike, TimeZone, Weekday};
  use chrono_tz::Asia::Ho_Chi_Minh;

  use super::*;
  use crate::{
    clock::FixedClock,
    weekly::{WeekHistoryEntry, record_login},
  };

  fn calendar(y: i32, m: u32, d: u32) -> Calendar {
    Calendar::new(Arc::new(FixedClock::at(Ho_Chi_Minh, y, m, d, 12)))
  }

  fn snapshot(week: WeekKey, point: i64) -> WeekHistoryEntry {
    WeekHistoryEntry {
      week,
      point,
      total_point: point,
      reset_at: Ho_Chi_Minh
        .with_ymd_and_hms(2024, 1, 8, 0, 0, 0)
        .unwrap()
        .fixed_offset(),
    }
  }

  #[test]
  fn test_live_and_historical_totals() {
    let state = UserWeeklyState {
      week_history: vec![snapshot(WeekKey::new(2024, 1), 50)],
      total_point: 7,
      ..Default::default()
    };

    let stats = weekly_stats(&calendar(2024, 1, 10), &state).unwrap();
    let weeks: Vec<_> = stats.iter().map(|s| s.week.to_string()).collect();
    let points: Vec<_> = stats.iter().map(|s| s.total_points).collect();

    assert_eq!(weeks, ["2023-50", "2023-51", "2023-52", "2024-01", "2024-02"]);
    assert_eq!(points, [0, 0, 0, 50, 7]);
  }

  #[test]
  fn test_open_week_ignores_its_own_snapshot() {
    let current = WeekKey::new(2024, 2);
    let state = UserWeeklyState {
      week_history: vec![snapshot(current, 99)],
      total_point: 1,
      ..Default::default()
    };

    let stats = weekly_stats(&calendar(2024, 1, 10), &state).unwrap();
    assert_eq!(stats[4].week, current);
    assert_eq!(stats[4].total_points, 1);
  }

  #[test]
  fn test_later_snapshot_wins() {
    let week = WeekKey::new(2024, 1);
    let state = UserWeeklyState {
      week_history: vec![snapshot(week, 5), snapshot(week, 8)],
      ..Default::default()
    };

    let stats = weekly_stats(&calendar(2024, 1, 10), &state).unwrap();
    assert_eq!(stats[3].total_points, 8);
  }

  #[test]
  fn test_login_flags_follow_buckets() {
    let state = record_login(&calendar(2024, 1, 2), Default::default(), 3);
    let state = record_login(&calendar(2024, 1, 9), state, 4);

    let stats = weekly_stats(&calendar(2024, 1, 10), &state).unwrap();
    assert_eq!(stats.len(), STATS_WEEKS);

    for summary in &stats {
      assert_eq!(summary.dates.len(), 7);
      assert_eq!(summary.dates[0].date.weekday(), Weekday::Mon);
    }

    let logged: Vec<_> = stats
      .iter()
      .flat_map(|s| s.dates.iter().filter(|d| d.has_login).map(|d| d.date))
      .collect();
    assert_eq!(
      logged,
      [
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
      ]
    );
  }

  #[test]
  fn test_current_week_zero_stays_last() {
    let now = calendar(2025, 1, 2);
    let mut state = record_login(&now, Default::default(), 3);
    state.total_point = 3;

    let stats = weekly_stats(&now, &state).unwrap();
    let current = &stats[4];
    assert_eq!(current.week, WeekKey::new(2025, 0));
    assert_eq!(current.week.to_string(), "2025-00");
    assert_eq!(current.dates[0].date, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    assert_eq!(current.dates[3].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    assert!(current.dates[3].has_login);
    assert_eq!(current.total_points, 3);
  }

  #[test]
  fn test_current_week_53_stays_last() {
    let now = calendar(2024, 12, 31);
    let mut state = record_login(&now, Default::default(), 6);
    state.total_point = 6;

    let stats = weekly_stats(&now, &state).unwrap();
    let weeks: Vec<_> = stats.iter().map(|s| s.week.to_string()).collect();
    assert_eq!(weeks, ["2024-49", "2024-50", "2024-51", "2024-52", "2024-53"]);
    assert_eq!(stats[4].dates[0].date, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    assert!(stats[4].dates[1].has_login);
    assert_eq!(stats[4].total_points, 6);
  }

  #[test]
  fn test_window_after_long_year_skips_week_53() {
    let state = record_login(&calendar(2024, 12, 31), Default::default(), 2);
    let mut state = record_login(&calendar(2025, 1, 7), state, 4);
    state.week_history = vec![snapshot(WeekKey::new(2024, 52), 11)];
    state.total_point = 4;

    let stats = weekly_stats(&calendar(2025, 1, 7), &state).unwrap();
    let weeks: Vec<_> = stats.iter().map(|s| s.week.to_string()).collect();
    let points: Vec<_> = stats.iter().map(|s| s.total_points).collect();

    assert_eq!(weeks, ["2024-49", "2024-50", "2024-51", "2024-52", "2025-01"]);
    assert_eq!(points, [0, 0, 0, 11, 4]);
    assert!(stats[4].dates[1].has_login);

    // 2024-12-31 sits in week 53, which the window steps over
    let logged: Vec<_> = stats
      .iter()
      .flat_map(|s| s.dates.iter().filter(|d| d.has_login).map(|d| d.date))
      .collect();
    assert_eq!(logged, [NaiveDate::from_ymd_opt(2025, 1, 7).unwrap()]);
  }

  #[test]
  fn test_empty_state() {
    let stats =
      weekly_stats(&calendar(2024, 6, 1), &UserWeeklyState::default()).unwrap();

    assert!(stats.iter().all(|s| s.total_points == 0));
    assert!(stats.iter().flat_map(|s| &s.dates).all(|d| !d.has_login));
  }

  #[test]
  fn test_serializes_for_display() {
    let stats =
      weekly_stats(&calendar(2024, 1, 10), &UserWeeklyState::default()).unwrap();
    let value = json::to_value(&stats[4]).unwrap();

    assert_eq!(value["week"], "2024-02");
    assert_eq!(value["dates"][0]["date"], "2024-01-08");
    assert_eq!(value["dates"][0]["has_login"], false);
    assert_eq!(value["total_points"], 0);
  }
}
