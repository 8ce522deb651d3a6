//! Time source pinned to the deployment timezone

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
  fn timezone(&self) -> Tz;

  fn now(&self) -> DateTime<Tz>;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
  tz: Tz,
}

impl SystemClock {
  pub fn new(tz: Tz) -> Self {
    Self { tz }
  }
}

impl Clock for SystemClock {
  fn timezone(&self) -> Tz {
    self.tz
  }

  fn now(&self) -> DateTime<Tz> {
    Utc::now().with_timezone(&self.tz)
  }
}

/// Always reports the same instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
  at: DateTime<Tz>,
}

#[cfg(test)]
impl FixedClock {
  pub fn new(at: DateTime<Tz>) -> Self {
    Self { at }
  }

  /// Local midnight of `y-m-d` plus `hour` hours, in `tz`.
  pub fn at(tz: Tz, y: i32, m: u32, d: u32, hour: u32) -> Self {
    use chrono::TimeZone;

    Self::new(tz.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap())
  }
}

#[cfg(test)]
impl Clock for FixedClock {
  fn timezone(&self) -> Tz {
    self.at.timezone()
  }

  fn now(&self) -> DateTime<Tz> {
    self.at
  }
}
