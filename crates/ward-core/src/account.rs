//! Identity records, the persisted principals of the registry.
//!
//! An account is created only through
//! [`AccountFactory`](crate::provision::AccountFactory); its role flags are
//! fixed by one of the role presets and its secret is held only as an opaque
//! [`CredentialHash`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, credential::CredentialHash};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Store-assigned primary key. Never reused once allocated.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Male => "Male",
      Self::Female => "Female",
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Gender {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "male" => Ok(Self::Male),
      "female" => Ok(Self::Female),
      _ => Err(Error::UnknownGender(s.to_owned())),
    }
  }
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// The role an account was provisioned with, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Standard,
  Staff,
  Administrator,
}

impl Role {
  /// The preset flag combination for this role.
  pub fn flags(&self) -> RoleFlags {
    match self {
      Self::Standard => RoleFlags::STANDARD,
      Self::Staff => RoleFlags::STAFF,
      Self::Administrator => RoleFlags::ADMINISTRATOR,
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Standard => "standard",
      Self::Staff => "staff",
      Self::Administrator => "administrator",
    })
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "standard" => Ok(Self::Standard),
      "staff" => Ok(Self::Staff),
      "administrator" | "admin" => Ok(Self::Administrator),
      other => Err(format!("unknown role: {other:?}")),
    }
  }
}

/// The three stored flags that drive authorization decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
  pub active: bool,
  pub staff:  bool,
  pub admin:  bool,
}

impl RoleFlags {
  pub const STANDARD: Self = Self { active: true, staff: false, admin: false };
  pub const STAFF: Self = Self { active: true, staff: true, admin: false };
  pub const ADMINISTRATOR: Self = Self { active: true, staff: true, admin: true };

  /// The role these flags correspond to. An admin flag wins over staff.
  pub fn role(&self) -> Role {
    if self.admin {
      Role::Administrator
    } else if self.staff {
      Role::Staff
    } else {
      Role::Standard
    }
  }
}

impl Default for RoleFlags {
  fn default() -> Self { Self::STANDARD }
}

// ─── NewAccount ──────────────────────────────────────────────────────────────

/// A creation request, as supplied by a caller of the factory.
///
/// Empty strings count as absent for the required fields.
#[derive(Clone)]
pub struct NewAccount {
  pub first_name: String,
  pub last_name:  String,
  pub reg_no:     String,
  pub phone:      String,
  pub gender:     Option<Gender>,
  pub email:      Option<String>,
  /// Plaintext secret. Consumed by the credential subsystem and dropped.
  pub secret:     String,
}

impl NewAccount {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    reg_no: impl Into<String>,
    phone: impl Into<String>,
    secret: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name:  last_name.into(),
      reg_no:     reg_no.into(),
      phone:      phone.into(),
      gender:     None,
      email:      None,
      secret:     secret.into(),
    }
  }

  pub fn with_gender(mut self, gender: Gender) -> Self {
    self.gender = Some(gender);
    self
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }
}

impl fmt::Debug for NewAccount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NewAccount")
      .field("first_name", &self.first_name)
      .field("last_name", &self.last_name)
      .field("reg_no", &self.reg_no)
      .field("phone", &self.phone)
      .field("gender", &self.gender)
      .field("email", &self.email)
      .field("secret", &"<redacted>")
      .finish()
  }
}

// ─── AccountDraft ────────────────────────────────────────────────────────────

/// Input to [`crate::store::AccountStore::insert_account`]: a validated
/// request whose secret has already been replaced by its credential hash.
/// `account_id` and `date_joined` are always set by the store.
#[derive(Debug, Clone)]
pub struct AccountDraft {
  pub first_name: String,
  pub last_name:  String,
  pub email:      Option<String>,
  pub reg_no:     String,
  pub phone:      String,
  pub gender:     Option<Gender>,
  pub flags:      RoleFlags,
  pub credential: CredentialHash,
}

// ─── Account ─────────────────────────────────────────────────────────────────

/// A persisted identity record.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
  pub account_id:  AccountId,
  pub first_name:  String,
  pub last_name:   String,
  pub email:       Option<String>,
  /// The login identifier.
  pub reg_no:      String,
  pub phone:       String,
  pub gender:      Option<Gender>,
  pub active:      bool,
  pub staff:       bool,
  pub admin:       bool,
  #[serde(skip)]
  pub credential:  CredentialHash,
  pub date_joined: DateTime<Utc>,
  pub last_login:  Option<DateTime<Utc>>,
}

impl Account {
  pub fn is_active(&self) -> bool { self.active }

  pub fn is_staff_member(&self) -> bool { self.staff }

  pub fn is_administrator(&self) -> bool { self.admin }

  pub fn flags(&self) -> RoleFlags {
    RoleFlags { active: self.active, staff: self.staff, admin: self.admin }
  }

  pub fn role(&self) -> Role { self.flags().role() }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  pub fn short_name(&self) -> &str { &self.first_name }
}

impl fmt::Display for Account {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.reg_no)
  }
}
