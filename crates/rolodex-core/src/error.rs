//! Error types for `rolodex-core`.
//!
//! Every variant is a validation failure: the caller sent something the
//! data model cannot accept. Storage failures belong to the backend's own
//! error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid date in {field}: {value:?} (expected YYYY-MM-DD)")]
  InvalidDate { field: &'static str, value: String },

  #[error("skill names must not be empty")]
  EmptySkillName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
