//! Authentication and authorization capabilities.
//!
//! These are injected alongside an account rather than inherited by it: a
//! front door wires an [`Authenticator`] (who is this?) to an [`Authorizer`]
//! (may they do this?) and consults both per request.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::{
  Error, Result, account::Account, credential::CredentialHasher,
  store::AccountStore,
};

// ─── Authentication ──────────────────────────────────────────────────────────

/// Logs accounts in by registration number and secret.
pub struct Authenticator<S, H> {
  store:  Arc<S>,
  hasher: Arc<H>,
}

impl<S, H> Authenticator<S, H>
where
  S: AccountStore,
  H: CredentialHasher,
{
  pub fn new(store: Arc<S>, hasher: Arc<H>) -> Self { Self { store, hasher } }

  /// Return the account if `secret` matches and the account is active.
  ///
  /// Unknown registration numbers, wrong secrets, and deactivated accounts all
  /// yield `None`; only store failures are errors. A successful login stamps
  /// `last_login`.
  pub async fn authenticate(
    &self,
    reg_no: &str,
    secret: &str,
  ) -> Result<Option<Account>> {
    let Some(mut account) = self
      .store
      .find_by_reg_no(reg_no)
      .await
      .map_err(Into::<Error>::into)?
    else {
      debug!(%reg_no, "login rejected: unknown registration number");
      return Ok(None);
    };

    if !self.hasher.verify(secret, &account.credential) {
      debug!(%reg_no, "login rejected: credential mismatch");
      return Ok(None);
    }
    if !account.is_active() {
      debug!(%reg_no, "login rejected: account inactive");
      return Ok(None);
    }

    let now = Utc::now();
    self
      .store
      .record_login(account.account_id, now)
      .await
      .map_err(Into::<Error>::into)?;
    account.last_login = Some(now);

    info!(account_id = %account.account_id, %reg_no, "login succeeded");
    Ok(Some(account))
  }
}

// ─── Authorization ───────────────────────────────────────────────────────────

/// Decides what an authenticated account may do.
pub trait Authorizer: Send + Sync {
  /// Whether `account` holds the named permission, e.g. `"records.view"`.
  fn has_permission(&self, account: &Account, permission: &str) -> bool;

  /// Whether `account` may use any part of the named module.
  fn has_module_access(&self, account: &Account, module: &str) -> bool;
}

/// Grants every permission and every module to every account.
///
/// Placeholder only; never the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantAll;

impl Authorizer for GrantAll {
  fn has_permission(&self, _account: &Account, _permission: &str) -> bool { true }

  fn has_module_access(&self, _account: &Account, _module: &str) -> bool { true }
}
