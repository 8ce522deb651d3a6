use tracing::debug;

use super::{Calendar, DayLogin, UserWeeklyState, WeekHistoryEntry};

/// Marks today as a login day worth `points` under the current week.
///
/// Any entry for today filed under another week is dropped first, so a date
/// never lives in two buckets. A second login on the same day overwrites the
/// first. `total_point` and `week_history` are left alone.
pub fn record_login(
  calendar: &Calendar,
  mut state: UserWeeklyState,
  points: i64,
) -> UserWeeklyState {
  let now = calendar.now();
  let today = now.date_naive();
  let week = calendar.week_key_for(&now);

  state.weekly_logins.retain(|key, days| {
    if days.remove(&today).is_some() && *key != week {
      debug!("Moved {today} out of stale week {key}");
    }
    !days.is_empty()
  });

  state
    .weekly_logins
    .entry(week)
    .or_default()
    .insert(today, DayLogin { login: true, points });

  state
}

/// Closes the open week into `week_history` once the calendar has moved on.
///
/// Returns the appended snapshot, if any.
pub fn roll_over(
  calendar: &Calendar,
  state: &mut UserWeeklyState,
) -> Option<WeekHistoryEntry> {
  let now = calendar.now();
  let current = calendar.week_key_for(&now);

  let open = match state.open_week {
    Some(open) if open != current => open,
    Some(_) => return None,
    None => {
      state.open_week = Some(current);
      return None;
    }
  };

  let carried = state.week_history.last().map_or(0, |last| last.total_point);
  let entry = WeekHistoryEntry {
    week: open,
    point: state.total_point,
    total_point: carried + state.total_point,
    reset_at: now.fixed_offset(),
  };

  state.week_history.push(entry.clone());
  state.total_point = 0;
  state.open_week = Some(current);

  Some(entry)
}
