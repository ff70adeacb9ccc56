//! Error types for `roster-core`.

use thiserror::Error;

use crate::{contact::ContactId, field::ContactField};

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact not found: {0}")]
  ContactNotFound(ContactId),

  #[error("required field is blank: {}", .0.label())]
  MissingRequiredField(ContactField),

  #[error("unknown field: {0:?}")]
  UnknownField(String),

  #[error("no contact ids left to assign")]
  IdsExhausted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
