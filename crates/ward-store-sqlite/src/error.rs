//! Error type for `ward-store-sqlite`.

use thiserror::Error;
use ward_core::{account::AccountId, error::UniqueField};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ward_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value the domain types cannot represent.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("an account with this {0} already exists")]
  UniquenessViolation(UniqueField),

  #[error("account not found: {0}")]
  AccountNotFound(AccountId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for ward_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::UniquenessViolation(field) => Self::UniquenessViolation(field),
      Error::AccountNotFound(id) => Self::AccountNotFound(id),
      other => Self::Store(Box::new(other)),
    }
  }
}
