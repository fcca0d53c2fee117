//! Management commands, independent of argument parsing and terminal I/O so
//! they can be exercised against an in-memory store.

use std::{path::Path, sync::Arc};

use anyhow::{Context as _, anyhow};
use tracing::info;
use ward_core::{
  access::{Authenticator, Authorizer},
  account::{Account, NewAccount, Role},
  credential::Argon2Hasher,
  profile::{ImageRef, Profile},
  provision::{AccountFactory, RolePolicy},
  store::{AccountQuery, AccountStore},
};

/// The registry as seen by an administrator: provisioning, lookup, login.
pub struct Registry<S, A> {
  store:   Arc<S>,
  factory: AccountFactory<S, Argon2Hasher>,
  auth:    Authenticator<S, Argon2Hasher>,
  authz:   A,
}

impl<S, A> Registry<S, A>
where
  S: AccountStore,
  A: Authorizer,
{
  pub fn new(store: Arc<S>, policy: RolePolicy, authz: A) -> Self {
    let hasher = Arc::new(Argon2Hasher::new());
    Self {
      factory: AccountFactory::new(Arc::clone(&store), Arc::clone(&hasher))
        .with_policy(policy),
      auth: Authenticator::new(Arc::clone(&store), hasher),
      store,
      authz,
    }
  }

  /// Provision an account through the preset for `role`.
  pub async fn create(&self, role: Role, input: NewAccount) -> anyhow::Result<Account> {
    let account = match role {
      Role::Standard => self.factory.create_standard_account(input).await,
      Role::Staff => self.factory.create_staff_account(input).await,
      Role::Administrator => self.factory.create_administrator_account(input).await,
    }?;
    Ok(account)
  }

  pub async fn list(&self, query: &AccountQuery) -> anyhow::Result<Vec<Account>> {
    Ok(self.store.list_accounts(query).await.map_err(Into::<ward_core::Error>::into)?)
  }

  pub async fn deactivate(&self, reg_no: &str) -> anyhow::Result<Account> {
    let account = self.require(reg_no).await?;
    let account = self
      .store
      .deactivate_account(account.account_id)
      .await
      .map_err(Into::<ward_core::Error>::into)?;
    info!(account_id = %account.account_id, %reg_no, "account deactivated");
    Ok(account)
  }

  /// Hash the image at `path` and attach the reference to the account.
  pub async fn set_profile(&self, reg_no: &str, path: &Path) -> anyhow::Result<Profile> {
    let account = self.require(reg_no).await?;
    let bytes = tokio::fs::read(path)
      .await
      .with_context(|| format!("failed to read image {}", path.display()))?;
    let profile = self
      .store
      .set_profile(account.account_id, ImageRef::from_bytes(path, &bytes))
      .await
      .map_err(Into::<ward_core::Error>::into)?;
    info!(account_id = %account.account_id, hash = %profile.image.content_hash, "profile image set");
    Ok(profile)
  }

  pub async fn login(&self, reg_no: &str, secret: &str) -> anyhow::Result<Option<Account>> {
    Ok(self.auth.authenticate(reg_no, secret).await?)
  }

  pub fn may_access(&self, account: &Account, module: &str) -> bool {
    self.authz.has_module_access(account, module)
  }

  async fn require(&self, reg_no: &str) -> anyhow::Result<Account> {
    self
      .store
      .find_by_reg_no(reg_no)
      .await
      .map_err(Into::<ward_core::Error>::into)?
      .ok_or_else(|| anyhow!("no account with registration number {reg_no:?}"))
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// One line per account: id, reg. number, role, status, name.
pub fn render_table(accounts: &[Account]) -> String {
  let mut out = format!(
    "{:>6}  {:<12}  {:<13}  {:<8}  {}\n",
    "ID", "REG NO", "ROLE", "STATUS", "NAME"
  );
  for a in accounts {
    out.push_str(&format!(
      "{:>6}  {:<12}  {:<13}  {:<8}  {}\n",
      a.account_id,
      a.reg_no,
      a.role(),
      if a.is_active() { "active" } else { "inactive" },
      a.full_name(),
    ));
  }
  out
}

pub fn render_json(accounts: &[Account]) -> anyhow::Result<String> {
  serde_json::to_string_pretty(accounts).context("failed to serialise accounts")
}
