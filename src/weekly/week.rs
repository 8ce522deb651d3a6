//! Monday-start week numbering anchored on each year's first Monday.
//!
//! Week `01` starts on the first Monday on or after January 1. Days before
//! that Monday belong to week `00` of the same year, and a year whose last
//! days run past week 52 yields week `53`.

use std::{fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Year length assumed when stepping backwards across a year boundary.
pub const WEEKS_PER_YEAR: i64 = 52;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("malformed week key `{0}`, expected `YYYY-WW`")]
  Malformed(String),
  #[error("week key `{0}` is outside the representable calendar")]
  OutOfRange(String),
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
  year: i32,
  week: u32,
}

fn monday_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
  let ahead = (7 - date.weekday().num_days_from_monday()) % 7;
  date.checked_add_signed(TimeDelta::days(ahead.into()))
}

/// First Monday on or after January 1 of `year`.
pub fn anchor_monday(year: i32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, 1, 1).and_then(monday_on_or_after)
}

impl WeekKey {
  pub fn new(year: i32, week: u32) -> Self {
    Self { year, week }
  }

  /// Week containing the calendar date `date`.
  pub fn of(date: NaiveDate) -> Self {
    let year = date.year();
    let jan1 = date - TimeDelta::days(date.ordinal0().into());
    // at most six days past January 1, always representable
    let anchor = monday_on_or_after(jan1).unwrap_or(jan1);

    let week = (date - anchor).num_days().div_euclid(7) + 1;
    if week > WEEKS_PER_YEAR
      && let Some(next) = anchor_monday(year + 1)
      && date >= next
    {
      return Self::new(year + 1, 1);
    }

    Self::new(year, week as u32)
  }

  fn first_day(&self) -> Option<NaiveDate> {
    let offset = TimeDelta::try_days((i64::from(self.week) - 1) * 7)?;
    let start = anchor_monday(self.year)?.checked_add_signed(offset)?;
    start.checked_add_signed(TimeDelta::days(6))?;
    Some(start)
  }

  /// The seven consecutive dates of this week, Monday first.
  pub fn dates(&self) -> Result<[NaiveDate; 7], ParseError> {
    let start =
      self.first_day().ok_or_else(|| ParseError::OutOfRange(self.to_string()))?;
    Ok(std::array::from_fn(|day| start + TimeDelta::days(day as i64)))
  }

  /// Steps `weeks` back by week-number arithmetic only. Crossing into the
  /// previous year always lands in a 52-week year, so a real week 53 is
  /// never produced here.
  pub fn stepped_back(&self, weeks: usize) -> Self {
    let mut year = self.year;
    let mut week = i64::from(self.week) - weeks as i64;
    while week <= 0 {
      year -= 1;
      week += WEEKS_PER_YEAR;
    }
    Self::new(year, week as u32)
  }
}

impl fmt::Display for WeekKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{:02}", self.year, self.week)
  }
}

impl FromStr for WeekKey {
  type Err = ParseError;

  fn from_str(key: &str) -> Result<Self, Self::Err> {
    let malformed = || ParseError::Malformed(key.to_string());

    let mut parts = key.split('-');
    let (Some(year), Some(week), None) =
      (parts.next(), parts.next(), parts.next())
    else {
      return Err(malformed());
    };

    Ok(Self {
      year: year.parse().map_err(|_| malformed())?,
      week: week.parse().map_err(|_| malformed())?,
    })
  }
}

impl TryFrom<String> for WeekKey {
  type Error = ParseError;

  fn try_from(key: String) -> Result<Self, Self::Error> {
    key.parse()
  }
}

impl From<WeekKey> for String {
  fn from(key: WeekKey) -> Self {
    key.to_string()
  }
}

/// Dates covered by the stored week key `key`.
pub fn dates_in_week(key: &str) -> Result<[NaiveDate; 7], ParseError> {
  key.parse::<WeekKey>()?.dates()
}

/// Week numbering bound to an injected clock and its timezone.
#[derive(Clone)]
pub struct Calendar {
  clock: Arc<dyn Clock>,
}

impl Calendar {
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self { clock }
  }

  pub fn timezone(&self) -> Tz {
    self.clock.timezone()
  }

  pub fn now(&self) -> DateTime<Tz> {
    self.clock.now()
  }

  pub fn week_key_for<T: TimeZone>(&self, instant: &DateTime<T>) -> WeekKey {
    WeekKey::of(instant.with_timezone(&self.timezone()).date_naive())
  }

  pub fn current_week_key(&self) -> WeekKey {
    self.week_key_for(&self.now())
  }

  /// The `n` most recent weeks, oldest first, ending at the current week.
  ///
  /// The current key is kept as is, including week `00` and `53`.
  pub fn last_n_week_keys(&self, n: usize) -> Vec<WeekKey> {
    let current = self.current_week_key();
    (0..n)
      .rev()
      .map(|back| if back == 0 { current } else { current.stepped_back(back) })
      .collect()
  }
}
