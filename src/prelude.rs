pub use std::{sync::Arc, time::Duration};

pub use anyhow::Context;
pub use chrono::{NaiveDateTime as DateTime, Utc};
pub use sea_orm::{
  ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
  QueryOrder, Set, TransactionTrait,
};
pub use sea_orm_migration::MigratorTrait;
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Result};
