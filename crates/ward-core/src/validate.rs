//! Field validation for account creation requests.
//!
//! Runs strictly before any credential is derived or anything is written, so a
//! rejected request leaves the store untouched.

use crate::{
  Result,
  account::NewAccount,
  error::{Error, RequiredField},
};

/// Reject a request with an empty required field.
///
/// Names are checked jointly, then registration number, phone, and secret.
/// Gender and email are optional and never checked here.
pub fn validate_required(input: &NewAccount) -> Result<()> {
  if input.first_name.is_empty() || input.last_name.is_empty() {
    return Err(Error::MissingField(RequiredField::Names));
  }
  if input.reg_no.is_empty() {
    return Err(Error::MissingField(RequiredField::RegNo));
  }
  if input.phone.is_empty() {
    return Err(Error::MissingField(RequiredField::Phone));
  }
  if input.secret.is_empty() {
    return Err(Error::MissingField(RequiredField::Secret));
  }
  Ok(())
}

/// Require `phone` to be exactly `digits` ASCII digits.
pub fn validate_phone(phone: &str, digits: usize) -> Result<()> {
  if phone.len() == digits && phone.bytes().all(|b| b.is_ascii_digit()) {
    Ok(())
  } else {
    Err(Error::InvalidPhone { expected_digits: digits })
  }
}
