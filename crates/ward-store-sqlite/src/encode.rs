//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, flags as 0/1 integers, and
//! gender as its display name.

use chrono::{DateTime, Utc};
use ward_core::{
  account::{Account, AccountId, Gender},
  credential::CredentialHash,
  error::UniqueField,
  profile::{ImageRef, Profile},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.as_str() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "Male" => Ok(Gender::Male),
    "Female" => Ok(Gender::Female),
    other => Err(Error::Decode(format!("unknown gender: {other:?}"))),
  }
}

// ─── Constraint errors ───────────────────────────────────────────────────────

/// If `err` is a UNIQUE constraint failure on the `accounts` table, name the
/// offending column.
pub fn unique_violation(err: &rusqlite::Error) -> Option<UniqueField> {
  let rusqlite::Error::SqliteFailure(e, Some(msg)) = err else {
    return None;
  };
  if e.extended_code != rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
    return None;
  }
  // "UNIQUE constraint failed: accounts.reg_no"
  msg
    .strip_prefix("UNIQUE constraint failed: accounts.")
    .and_then(UniqueField::from_column)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawAccount::from_row`].
pub const ACCOUNT_COLUMNS: &str = "account_id, first_name, last_name, email, \
   reg_no, phone, gender, active, staff, admin, credential, date_joined, \
   last_login";

/// Raw values read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:  i64,
  pub first_name:  String,
  pub last_name:   String,
  pub email:       Option<String>,
  pub reg_no:      String,
  pub phone:       String,
  pub gender:      Option<String>,
  pub active:      bool,
  pub staff:       bool,
  pub admin:       bool,
  pub credential:  String,
  pub date_joined: String,
  pub last_login:  Option<String>,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:  row.get(0)?,
      first_name:  row.get(1)?,
      last_name:   row.get(2)?,
      email:       row.get(3)?,
      reg_no:      row.get(4)?,
      phone:       row.get(5)?,
      gender:      row.get(6)?,
      active:      row.get(7)?,
      staff:       row.get(8)?,
      admin:       row.get(9)?,
      credential:  row.get(10)?,
      date_joined: row.get(11)?,
      last_login:  row.get(12)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:  AccountId(self.account_id),
      first_name:  self.first_name,
      last_name:   self.last_name,
      email:       self.email,
      reg_no:      self.reg_no,
      phone:       self.phone,
      gender:      self.gender.as_deref().map(decode_gender).transpose()?,
      active:      self.active,
      staff:       self.staff,
      admin:       self.admin,
      credential:  CredentialHash::from_phc(self.credential),
      date_joined: decode_dt(&self.date_joined)?,
      last_login:  self.last_login.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub account_id:   i64,
  pub image_path:   String,
  pub content_hash: String,
  pub media_type:   String,
  pub updated_at:   String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:   row.get(0)?,
      image_path:   row.get(1)?,
      content_hash: row.get(2)?,
      media_type:   row.get(3)?,
      updated_at:   row.get(4)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      account_id: AccountId(self.account_id),
      image:      ImageRef {
        path:         self.image_path,
        content_hash: self.content_hash,
        media_type:   self.media_type,
      },
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
