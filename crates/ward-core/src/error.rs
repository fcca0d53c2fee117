//! Error types for `ward-core`.

use std::fmt;

use thiserror::Error;

use crate::account::AccountId;

/// A field that must be present for an account to be provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
  /// First and last name are checked together.
  Names,
  RegNo,
  Phone,
  Secret,
}

impl fmt::Display for RequiredField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Names => "both first and last name are required",
      Self::RegNo => "a staff/patient registration number is required",
      Self::Phone => "a phone number is required",
      Self::Secret => "a password is required",
    })
  }
}

/// A column that carries a uniqueness constraint in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
  RegNo,
  Email,
  Phone,
}

impl UniqueField {
  /// The column name used by storage backends.
  pub fn column(&self) -> &'static str {
    match self {
      Self::RegNo => "reg_no",
      Self::Email => "email",
      Self::Phone => "phone",
    }
  }

  pub fn from_column(column: &str) -> Option<Self> {
    match column {
      "reg_no" => Some(Self::RegNo),
      "email" => Some(Self::Email),
      "phone" => Some(Self::Phone),
      _ => None,
    }
  }
}

impl fmt::Display for UniqueField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::RegNo => "registration number",
      Self::Email => "email address",
      Self::Phone => "phone number",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing field: {0}")]
  MissingField(RequiredField),

  #[error("phone number must be exactly {expected_digits} digits")]
  InvalidPhone { expected_digits: usize },

  #[error("administrator accounts must also be staff")]
  AdminWithoutStaff,

  #[error("an account with this {0} already exists")]
  UniquenessViolation(UniqueField),

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("credential error: {0}")]
  Credential(String),

  #[error("account not found: {0}")]
  AccountNotFound(AccountId),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
