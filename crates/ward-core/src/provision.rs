//! Account provisioning: the account factory and its role presets.
//!
//! Every account enters the registry through [`AccountFactory::create_account`]
//! or one of the presets built on it. The presets are the only sanctioned way
//! to obtain staff or administrator accounts.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  account::{Account, AccountDraft, NewAccount, RoleFlags},
  credential::CredentialHasher,
  store::AccountStore,
  validate::{validate_phone, validate_required},
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Tunable provisioning rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RolePolicy {
  /// Reject `admin && !staff` combinations passed to
  /// [`AccountFactory::create_account`]. Off by default: an administrator need
  /// not be staff unless the deployment says so.
  pub admin_requires_staff: bool,
  /// Exact number of digits a phone number must have. `None` disables the
  /// format check.
  pub phone_digits:         Option<usize>,
}

impl Default for RolePolicy {
  fn default() -> Self {
    Self { admin_requires_staff: false, phone_digits: Some(10) }
  }
}

// ─── Factory ─────────────────────────────────────────────────────────────────

/// Builds accounts from creation requests and persists them.
pub struct AccountFactory<S, H> {
  store:  Arc<S>,
  hasher: Arc<H>,
  policy: RolePolicy,
}

impl<S, H> Clone for AccountFactory<S, H> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      hasher: Arc::clone(&self.hasher),
      policy: self.policy.clone(),
    }
  }
}

impl<S, H> AccountFactory<S, H>
where
  S: AccountStore,
  H: CredentialHasher,
{
  pub fn new(store: Arc<S>, hasher: Arc<H>) -> Self {
    Self { store, hasher, policy: RolePolicy::default() }
  }

  pub fn with_policy(mut self, policy: RolePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn policy(&self) -> &RolePolicy { &self.policy }

  /// Validate `input`, derive its credential, and persist it with `flags`.
  ///
  /// Nothing is written unless validation passes. A collision on a unique
  /// field surfaces as [`Error::UniquenessViolation`].
  pub async fn create_account(
    &self,
    input: NewAccount,
    flags: RoleFlags,
  ) -> Result<Account> {
    validate_required(&input)?;
    if let Some(digits) = self.policy.phone_digits {
      validate_phone(&input.phone, digits)?;
    }
    if self.policy.admin_requires_staff && flags.admin && !flags.staff {
      return Err(Error::AdminWithoutStaff);
    }

    let NewAccount { first_name, last_name, reg_no, phone, gender, email, secret } =
      input;

    let credential = self.hasher.derive(&secret)?;
    drop(secret);

    let draft = AccountDraft {
      first_name,
      last_name,
      email: email.as_deref().and_then(normalize_email),
      reg_no,
      phone,
      gender,
      flags,
      credential,
    };
    debug!(reg_no = %draft.reg_no, role = %flags.role(), "inserting account");

    match self.store.insert_account(draft).await.map_err(Into::<Error>::into) {
      Ok(account) => {
        info!(
          account_id = %account.account_id,
          reg_no = %account.reg_no,
          role = %account.role(),
          "account created"
        );
        Ok(account)
      }
      Err(Error::UniquenessViolation(field)) => {
        warn!(%field, "account rejected: duplicate value");
        Err(Error::UniquenessViolation(field))
      }
      Err(e) => Err(e),
    }
  }

  // ── Role presets ──────────────────────────────────────────────────────────

  /// A regular (patient) account: neither staff nor administrator.
  pub async fn create_standard_account(&self, input: NewAccount) -> Result<Account> {
    self.create_account(input, RoleFlags::STANDARD).await
  }

  /// A staff account, e.g. doctors and nurses.
  pub async fn create_staff_account(&self, input: NewAccount) -> Result<Account> {
    self.create_account(input, RoleFlags::STAFF).await
  }

  /// An administrator account, e.g. IT and senior staff. Always staff too.
  pub async fn create_administrator_account(
    &self,
    input: NewAccount,
  ) -> Result<Account> {
    self.create_account(input, RoleFlags::ADMINISTRATOR).await
  }
}

/// Trim and lowercase the domain part. Blank addresses are treated as absent.
fn normalize_email(email: &str) -> Option<String> {
  let email = email.trim();
  if email.is_empty() {
    return None;
  }
  Some(match email.rsplit_once('@') {
    Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
    None => email.to_owned(),
  })
}
