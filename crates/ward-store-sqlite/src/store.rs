//! [`SqliteStore`]: the SQLite implementation of [`AccountStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use ward_core::{
  account::{Account, AccountDraft, AccountId},
  profile::{ImageRef, Profile},
  store::{AccountQuery, AccountStore},
};

use crate::{
  Error, Result,
  encode::{
    ACCOUNT_COLUMNS, RawAccount, RawProfile, encode_dt, encode_gender,
    unique_violation,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Ward account registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn insert_account(&self, draft: AccountDraft) -> Result<Account> {
    let date_joined = Utc::now();

    let first_name     = draft.first_name.clone();
    let last_name      = draft.last_name.clone();
    let email          = draft.email.clone();
    let reg_no         = draft.reg_no.clone();
    let phone          = draft.phone.clone();
    let gender_str     = draft.gender.map(encode_gender);
    let credential_str = draft.credential.as_str().to_owned();
    let joined_str     = encode_dt(date_joined);
    let flags          = draft.flags;

    // The closure reports a uniqueness collision as `Ok(Err(field))` so it can
    // be told apart from every other database failure.
    let outcome = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO accounts (
             first_name, last_name, email, reg_no, phone, gender,
             active, staff, admin, credential, date_joined
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            first_name,
            last_name,
            email,
            reg_no,
            phone,
            gender_str,
            flags.active,
            flags.staff,
            flags.admin,
            credential_str,
            joined_str,
          ],
        );
        match inserted {
          Ok(_) => Ok(Ok(conn.last_insert_rowid())),
          Err(e) => match unique_violation(&e) {
            Some(field) => Ok(Err(field)),
            None => Err(e.into()),
          },
        }
      })
      .await?;

    let account_id = AccountId(outcome.map_err(Error::UniquenessViolation)?);
    debug!(%account_id, "inserted account row");

    Ok(Account {
      account_id,
      first_name: draft.first_name,
      last_name: draft.last_name,
      email: draft.email,
      reg_no: draft.reg_no,
      phone: draft.phone,
      gender: draft.gender,
      active: flags.active,
      staff: flags.staff,
      admin: flags.admin,
      credential: draft.credential,
      date_joined,
      last_login: None,
    })
  }

  async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"),
            rusqlite::params![id.0],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn find_by_reg_no(&self, reg_no: &str) -> Result<Option<Account>> {
    let reg_no = reg_no.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE reg_no = ?1"),
            rusqlite::params![reg_no],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn list_accounts(&self, query: &AccountQuery) -> Result<Vec<Account>> {
    let role_str   = query.role.map(|r| r.to_string());
    let active     = query.active;
    // A negative LIMIT means "no limit" to SQLite.
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawAccount> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOUNT_COLUMNS}
           FROM accounts
           WHERE (?1 IS NULL OR active = ?1)
             AND (?2 IS NULL OR
                  CASE WHEN admin THEN 'administrator'
                       WHEN staff THEN 'staff'
                       ELSE 'standard' END = ?2)
           ORDER BY account_id
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![active, role_str, limit_val, offset_val],
            RawAccount::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccount::into_account).collect()
  }

  async fn deactivate_account(&self, id: AccountId) -> Result<Account> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET active = 0 WHERE account_id = ?1",
          rusqlite::params![id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::AccountNotFound(id));
    }
    self.get_account(id).await?.ok_or(Error::AccountNotFound(id))
  }

  async fn record_login(&self, id: AccountId, at: DateTime<Utc>) -> Result<()> {
    let at_str = encode_dt(at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET last_login = ?2 WHERE account_id = ?1",
          rusqlite::params![id.0, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::AccountNotFound(id));
    }
    Ok(())
  }

  async fn delete_account(&self, id: AccountId) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM accounts WHERE account_id = ?1",
          rusqlite::params![id.0],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn set_profile(&self, account_id: AccountId, image: ImageRef) -> Result<Profile> {
    let profile = Profile { account_id, image, updated_at: Utc::now() };

    let path_str   = profile.image.path.clone();
    let hash_str   = profile.image.content_hash.clone();
    let media_str  = profile.image.media_type.clone();
    let at_str     = encode_dt(profile.updated_at);

    let attached = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM accounts WHERE account_id = ?1",
            rusqlite::params![account_id.0],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO profiles (account_id, image_path, content_hash, media_type, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (account_id) DO UPDATE SET
             image_path   = excluded.image_path,
             content_hash = excluded.content_hash,
             media_type   = excluded.media_type,
             updated_at   = excluded.updated_at",
          rusqlite::params![account_id.0, path_str, hash_str, media_str, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !attached {
      return Err(Error::AccountNotFound(account_id));
    }
    Ok(profile)
  }

  async fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>> {
    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT account_id, image_path, content_hash, media_type, updated_at
             FROM profiles WHERE account_id = ?1",
            rusqlite::params![account_id.0],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}
