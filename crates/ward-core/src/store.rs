//! The `AccountStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `ward-store-sqlite`).
//! The factory and the access capabilities depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  account::{Account, AccountDraft, AccountId, Role},
  profile::{ImageRef, Profile},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`AccountStore::list_accounts`].
#[derive(Debug, Clone, Default)]
pub struct AccountQuery {
  /// Restrict to accounts whose flags derive this role.
  pub role:   Option<Role>,
  /// Restrict to active (`true`) or deactivated (`false`) accounts.
  pub active: Option<bool>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the persistent account registry.
///
/// Backends must enforce uniqueness of registration number, phone, and email
/// atomically on insert, and report a collision as
/// [`crate::Error::UniquenessViolation`] once converted. Deleting an account
/// must cascade to its profile.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Persist a new account in a single atomic write. The store assigns
  /// `account_id` and `date_joined`.
  fn insert_account(
    &self,
    draft: AccountDraft,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    id: AccountId,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Look an account up by its login identifier.
  fn find_by_reg_no<'a>(
    &'a self,
    reg_no: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  /// List accounts in id order.
  fn list_accounts<'a>(
    &'a self,
    query: &'a AccountQuery,
  ) -> impl Future<Output = Result<Vec<Account>, Self::Error>> + Send + 'a;

  /// Soft-delete: clear the active flag and return the updated account.
  fn deactivate_account(
    &self,
    id: AccountId,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Stamp the account's `last_login`.
  fn record_login(
    &self,
    id: AccountId,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove an account and, by cascade, its profile. Returns `false` if no
  /// such account existed.
  fn delete_account(
    &self,
    id: AccountId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Attach `image` to the account, replacing any previous profile.
  fn set_profile(
    &self,
    account_id: AccountId,
    image: ImageRef,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    account_id: AccountId,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;
}
