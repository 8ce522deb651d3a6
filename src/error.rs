//! Error types for the weekly login service

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use derive_more::{Display, From};

use crate::weekly;

#[derive(Debug, Display, From)]
pub enum Error {
  #[display("Database error: {_0}")]
  #[from]
  Database(sea_orm::DbErr),

  #[display("Week error: {_0}")]
  #[from]
  Week(weekly::ParseError),

  #[display("Corrupted user record: {_0}")]
  #[from]
  Record(json::Error),

  #[display("User not found")]
  UserNotFound,
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Week(_) => StatusCode::BAD_REQUEST,
      Error::UserNotFound => StatusCode::NOT_FOUND,
      Error::Database(_) | Error::Record(_) => {
        tracing::error!("Request failed: {self}");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    let message = match &self {
      Error::Database(_) => "Database error".to_string(),
      Error::Record(_) => "Corrupted user record".to_string(),
      other => other.to_string(),
    };

    let body = json::json!({
      "success": false,
      "error": message
    });

    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
