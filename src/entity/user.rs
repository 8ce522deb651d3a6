//! User record holding weekly login bookkeeping

use sea_orm::{Set, entity::prelude::*};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::weekly::{UserWeeklyState, WeekKey};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: i64,
  /// live points of `open_week`
  pub total_point: i64,
  pub open_week: Option<String>,
  pub weekly_logins: Option<Json>,
  pub week_history: Option<Json>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn decode<T: DeserializeOwned + Default>(
  value: &Option<Json>,
) -> crate::error::Result<T> {
  match value {
    Some(value) if !value.is_null() => Ok(json::from_value(value.clone())?),
    _ => Ok(T::default()),
  }
}

impl Model {
  /// Decodes the stored columns, treating missing containers as empty.
  pub fn weekly_state(&self) -> crate::error::Result<UserWeeklyState> {
    Ok(UserWeeklyState {
      weekly_logins: decode(&self.weekly_logins)?,
      week_history: decode(&self.week_history)?,
      total_point: self.total_point,
      open_week: self.open_week.as_deref().map(str::parse::<WeekKey>).transpose()?,
    })
  }
}

impl ActiveModel {
  /// Copies `state` onto the row, stamping `updated_at`.
  pub fn store(
    mut self,
    state: &UserWeeklyState,
    now: DateTime,
  ) -> crate::error::Result<Self> {
    self.total_point = Set(state.total_point);
    self.open_week = Set(state.open_week.map(|week| week.to_string()));
    self.weekly_logins = Set(Some(json::to_value(&state.weekly_logins)?));
    self.week_history = Set(Some(json::to_value(&state.week_history)?));
    self.updated_at = Set(now);
    Ok(self)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::weekly::DayLogin;

  fn blank() -> Model {
    let now = NaiveDate::from_ymd_opt(2024, 1, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    Model {
      user_id: 1,
      total_point: 3,
      open_week: None,
      weekly_logins: None,
      week_history: Some(Json::Null),
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn test_missing_columns_default_to_empty() {
    let state = blank().weekly_state().unwrap();

    assert!(state.weekly_logins.is_empty());
    assert!(state.week_history.is_empty());
    assert_eq!(state.total_point, 3);
    assert_eq!(state.open_week, None);
  }

  #[test]
  fn test_decodes_stored_documents() {
    let row = Model {
      open_week: Some("2024-02".into()),
      weekly_logins: Some(json::json!({
        "2024-02": { "2024-01-09": { "login": true, "points": 4 } }
      })),
      week_history: Some(json::json!([{
        "week": "2024-01",
        "point": 50,
        "total_point": 50,
        "reset_at": "2024-01-08T00:00:00+07:00"
      }])),
      ..blank()
    };

    let state = row.weekly_state().unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();

    assert_eq!(state.open_week, Some(WeekKey::new(2024, 2)));
    assert_eq!(
      state.weekly_logins[&WeekKey::new(2024, 2)][&day],
      DayLogin { login: true, points: 4 }
    );
    assert_eq!(state.week_history[0].point, 50);
  }

  #[test]
  fn test_corrupted_week_key_is_an_error() {
    let row = Model {
      weekly_logins: Some(json::json!({ "abc": {} })),
      ..blank()
    };
    assert!(matches!(row.weekly_state(), Err(crate::error::Error::Record(_))));

    let row = Model { open_week: Some("abc".into()), ..blank() };
    assert!(matches!(row.weekly_state(), Err(crate::error::Error::Week(_))));
  }
}
