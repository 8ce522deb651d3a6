use dashmap::DashMap;
use sea_orm::{ColumnTrait, QueryFilter};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
  entity::user,
  prelude::*,
  weekly::{self, Calendar, UserWeeklyState, WeekSummary},
};

/// Per-user mutexes serializing read-modify-write of a record.
pub type Locks = DashMap<i64, Arc<Mutex<()>>>;

struct Held<'a> {
  locks: &'a Locks,
  user_id: i64,
  guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for Held<'_> {
  fn drop(&mut self) {
    drop(self.guard.take());
    self.locks.remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
  }
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
  calendar: &'a Calendar,
  locks: &'a Locks,
}

impl<'a> User<'a> {
  pub fn new(
    db: &'a DatabaseConnection,
    calendar: &'a Calendar,
    locks: &'a Locks,
  ) -> Self {
    Self { db, calendar, locks }
  }

  async fn hold(&self, user_id: i64) -> Held<'a> {
    let lock = self.locks.entry(user_id).or_default().clone();
    let guard = lock.lock_owned().await;
    Held { locks: self.locks, user_id, guard: Some(guard) }
  }

  async fn fetch_or_insert<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    now: DateTime,
  ) -> Result<user::Model> {
    if let Some(user) = user::Entity::find_by_id(user_id).one(conn).await? {
      return Ok(user);
    }

    let user = user::ActiveModel {
      user_id: Set(user_id),
      total_point: Set(0),
      open_week: Set(None),
      weekly_logins: Set(None),
      week_history: Set(None),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(user.insert(conn).await?)
  }

  #[allow(dead_code)]
  pub async fn get_or_create(&self, user_id: i64) -> Result<user::Model> {
    Self::fetch_or_insert(self.db, user_id, Utc::now().naive_utc()).await
  }

  pub async fn by_id(&self, user_id: i64) -> Result<Option<user::Model>> {
    let user = user::Entity::find_by_id(user_id).one(self.db).await?;
    Ok(user)
  }

  pub async fn state(&self, user_id: i64) -> Result<UserWeeklyState> {
    self.by_id(user_id).await?.ok_or(Error::UserNotFound)?.weekly_state()
  }

  /// Records a login worth `points` and accrues them into the open week.
  pub async fn login(
    &self,
    user_id: i64,
    points: i64,
  ) -> Result<UserWeeklyState> {
    let _held = self.hold(user_id).await;
    let now = self.calendar.now().naive_utc();

    let txn = self.db.begin().await?;
    let model = Self::fetch_or_insert(&txn, user_id, now).await?;
    let mut state = model.weekly_state()?;

    if let Some(closed) = weekly::roll_over(self.calendar, &mut state) {
      info!("User {user_id}: closed week {} with {} points", closed.week, closed.point);
    }

    let mut state = weekly::record_login(self.calendar, state, points);
    state.total_point += points;

    user::ActiveModel::from(model).store(&state, now)?.update(&txn).await?;
    txn.commit().await?;

    debug!("User {user_id}: login recorded, {} points this week", state.total_point);
    Ok(state)
  }

  pub async fn weekly_stats(&self, user_id: i64) -> Result<Vec<WeekSummary>> {
    let state = self.state(user_id).await?;
    Ok(weekly::weekly_stats(self.calendar, &state)?)
  }

  /// Closes the open week of every user the calendar has moved past.
  ///
  /// Returns how many weeks were written to history.
  pub async fn roll_over_all(&self) -> Result<u64> {
    let current = self.calendar.current_week_key().to_string();
    let stale = user::Entity::find()
      .filter(
        user::Column::OpenWeek
          .ne(current)
          .or(user::Column::OpenWeek.is_null()),
      )
      .order_by_asc(user::Column::UserId)
      .all(self.db)
      .await?;

    let mut closed = 0;
    for candidate in stale {
      let user_id = candidate.user_id;
      let _held = self.hold(user_id).await;

      let txn = self.db.begin().await?;
      let Some(model) = user::Entity::find_by_id(user_id).one(&txn).await?
      else {
        continue;
      };

      let mut state = model.weekly_state().inspect_err(|err| {
        error!("User {user_id}: cannot roll over, {err}");
      })?;

      let before = state.open_week;
      let entry = weekly::roll_over(self.calendar, &mut state);
      if entry.is_none() && before == state.open_week {
        continue;
      }

      let now = self.calendar.now().naive_utc();
      user::ActiveModel::from(model).store(&state, now)?.update(&txn).await?;
      txn.commit().await?;

      if let Some(entry) = entry {
        debug!("User {user_id}: closed week {} with {} points", entry.week, entry.point);
        closed += 1;
      }
    }

    Ok(closed)
  }
}
