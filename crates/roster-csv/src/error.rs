//! Error types for the roster-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("output is not valid UTF-8")]
  Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
