//! In-memory `AccountStore` for unit tests in this crate.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  account::{Account, AccountDraft, AccountId},
  error::UniqueField,
  profile::{ImageRef, Profile},
  store::{AccountQuery, AccountStore},
};

#[derive(Default)]
pub struct MemStore {
  accounts:     Mutex<Vec<Account>>,
  profiles:     Mutex<Vec<Profile>>,
  next_id:      Mutex<i64>,
  insert_calls: AtomicUsize,
}

impl MemStore {
  pub fn insert_calls(&self) -> usize { self.insert_calls.load(Ordering::SeqCst) }
}

impl AccountStore for MemStore {
  type Error = Error;

  async fn insert_account(&self, draft: AccountDraft) -> Result<Account> {
    self.insert_calls.fetch_add(1, Ordering::SeqCst);
    let mut accounts = self.accounts.lock().unwrap();
    for existing in accounts.iter() {
      if existing.reg_no == draft.reg_no {
        return Err(Error::UniquenessViolation(UniqueField::RegNo));
      }
      if existing.phone == draft.phone {
        return Err(Error::UniquenessViolation(UniqueField::Phone));
      }
      if draft.email.is_some() && existing.email == draft.email {
        return Err(Error::UniquenessViolation(UniqueField::Email));
      }
    }
    let mut next_id = self.next_id.lock().unwrap();
    *next_id += 1;
    let account = Account {
      account_id:  AccountId(*next_id),
      first_name:  draft.first_name,
      last_name:   draft.last_name,
      email:       draft.email,
      reg_no:      draft.reg_no,
      phone:       draft.phone,
      gender:      draft.gender,
      active:      draft.flags.active,
      staff:       draft.flags.staff,
      admin:       draft.flags.admin,
      credential:  draft.credential,
      date_joined: Utc::now(),
      last_login:  None,
    };
    accounts.push(account.clone());
    Ok(account)
  }

  async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
    let accounts = self.accounts.lock().unwrap();
    Ok(accounts.iter().find(|a| a.account_id == id).cloned())
  }

  async fn find_by_reg_no(&self, reg_no: &str) -> Result<Option<Account>> {
    let accounts = self.accounts.lock().unwrap();
    Ok(accounts.iter().find(|a| a.reg_no == reg_no).cloned())
  }

  async fn list_accounts(&self, query: &AccountQuery) -> Result<Vec<Account>> {
    let accounts = self.accounts.lock().unwrap();
    Ok(
      accounts
        .iter()
        .filter(|a| query.role.is_none_or(|r| a.role() == r))
        .filter(|a| query.active.is_none_or(|act| a.active == act))
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect(),
    )
  }

  async fn deactivate_account(&self, id: AccountId) -> Result<Account> {
    let mut accounts = self.accounts.lock().unwrap();
    let account = accounts
      .iter_mut()
      .find(|a| a.account_id == id)
      .ok_or(Error::AccountNotFound(id))?;
    account.active = false;
    Ok(account.clone())
  }

  async fn record_login(&self, id: AccountId, at: DateTime<Utc>) -> Result<()> {
    let mut accounts = self.accounts.lock().unwrap();
    let account = accounts
      .iter_mut()
      .find(|a| a.account_id == id)
      .ok_or(Error::AccountNotFound(id))?;
    account.last_login = Some(at);
    Ok(())
  }

  async fn delete_account(&self, id: AccountId) -> Result<bool> {
    let mut accounts = self.accounts.lock().unwrap();
    let before = accounts.len();
    accounts.retain(|a| a.account_id != id);
    self.profiles.lock().unwrap().retain(|p| p.account_id != id);
    Ok(accounts.len() != before)
  }

  async fn set_profile(&self, account_id: AccountId, image: ImageRef) -> Result<Profile> {
    let profile = Profile { account_id, image, updated_at: Utc::now() };
    let mut profiles = self.profiles.lock().unwrap();
    profiles.retain(|p| p.account_id != account_id);
    profiles.push(profile.clone());
    Ok(profile)
  }

  async fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>> {
    let profiles = self.profiles.lock().unwrap();
    Ok(profiles.iter().find(|p| p.account_id == account_id).cloned())
  }
}
