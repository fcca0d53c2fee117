//! Integration tests for `SqliteStore` against an in-memory database, driven
//! through the account factory the way callers use it.

use std::sync::Arc;

use ward_core::{
  account::{AccountId, Gender, NewAccount, Role, RoleFlags},
  credential::{Argon2Hasher, CredentialHasher},
  error::{RequiredField, UniqueField},
  profile::ImageRef,
  provision::AccountFactory,
  store::{AccountQuery, AccountStore},
};

use crate::SqliteStore;

async fn store() -> Arc<SqliteStore> {
  Arc::new(
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store"),
  )
}

fn factory(store: &Arc<SqliteStore>) -> AccountFactory<SqliteStore, Argon2Hasher> {
  AccountFactory::new(Arc::clone(store), Arc::new(Argon2Hasher::new()))
}

fn jane() -> NewAccount {
  NewAccount::new("Jane", "Doe", "REG100", "0712345678", "pw123")
    .with_gender("Female".parse().unwrap())
}

// ─── Creation defaults ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_account_defaults_to_active_standard() {
  let s = store().await;
  let account = factory(&s)
    .create_account(jane(), RoleFlags::default())
    .await
    .unwrap();

  assert!(account.is_active());
  assert!(!account.is_staff_member());
  assert!(!account.is_administrator());
  assert_eq!(account.role(), Role::Standard);
}

#[tokio::test]
async fn staff_preset_is_staff_not_admin() {
  let s = store().await;
  let account = factory(&s).create_staff_account(jane()).await.unwrap();
  let stored = s.get_account(account.account_id).await.unwrap().unwrap();
  assert!(stored.is_staff_member());
  assert!(!stored.is_administrator());
}

#[tokio::test]
async fn administrator_preset_is_staff_and_admin() {
  let s = store().await;
  let account = factory(&s).create_administrator_account(jane()).await.unwrap();
  let stored = s.get_account(account.account_id).await.unwrap().unwrap();
  assert!(stored.is_staff_member());
  assert!(stored.is_administrator());
  assert!(stored.is_active());
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_fields_write_nothing() {
  let s = store().await;
  let f = factory(&s);

  let cases = [
    (NewAccount { first_name: String::new(), ..jane() }, RequiredField::Names),
    (NewAccount { last_name: String::new(), ..jane() }, RequiredField::Names),
    (NewAccount { reg_no: String::new(), ..jane() }, RequiredField::RegNo),
    (NewAccount { phone: String::new(), ..jane() }, RequiredField::Phone),
    (NewAccount { secret: String::new(), ..jane() }, RequiredField::Secret),
  ];

  for (input, field) in cases {
    let err = f.create_standard_account(input).await.unwrap_err();
    assert!(
      matches!(err, ward_core::Error::MissingField(got) if got == field),
      "expected {field:?}, got {err:?}"
    );
  }

  let all = s.list_accounts(&AccountQuery::default()).await.unwrap();
  assert!(all.is_empty());
}

// ─── Uniqueness ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_reg_no_is_rejected() {
  let s = store().await;
  let f = factory(&s);

  f.create_standard_account(NewAccount::new("Ann", "One", "REG001", "0700000001", "a"))
    .await
    .unwrap();

  let err = f
    .create_staff_account(
      NewAccount::new("Bob", "Two", "REG001", "0700000002", "b")
        .with_gender(Gender::Male)
        .with_email("bob@example.com"),
    )
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    ward_core::Error::UniquenessViolation(UniqueField::RegNo)
  ));

  let all = s.list_accounts(&AccountQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn duplicate_phone_and_email_are_rejected() {
  let s = store().await;
  let f = factory(&s);

  f.create_standard_account(jane().with_email("jane@example.com"))
    .await
    .unwrap();

  let same_phone = NewAccount::new("Ann", "One", "REG001", "0712345678", "a");
  let err = f.create_standard_account(same_phone).await.unwrap_err();
  assert!(matches!(
    err,
    ward_core::Error::UniquenessViolation(UniqueField::Phone)
  ));

  let same_email = NewAccount::new("Ann", "One", "REG001", "0700000001", "a")
    .with_email("jane@EXAMPLE.com");
  let err = f.create_standard_account(same_email).await.unwrap_err();
  assert!(matches!(
    err,
    ward_core::Error::UniquenessViolation(UniqueField::Email)
  ));
}

#[tokio::test]
async fn accounts_without_email_do_not_collide() {
  let s = store().await;
  let f = factory(&s);
  f.create_standard_account(NewAccount::new("Ann", "One", "REG001", "0700000001", "a"))
    .await
    .unwrap();
  f.create_standard_account(NewAccount::new("Bob", "Two", "REG002", "0700000002", "b"))
    .await
    .unwrap();
}

// ─── Round-trip ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_account_round_trips_and_verifies() {
  let s = store().await;
  let created = factory(&s).create_standard_account(jane()).await.unwrap();

  let fetched = s.get_account(created.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.first_name, "Jane");
  assert_eq!(fetched.last_name, "Doe");
  assert_eq!(fetched.reg_no, "REG100");
  assert_eq!(fetched.phone, "0712345678");
  assert_eq!(fetched.gender, Some(Gender::Female));
  assert_eq!(fetched.full_name(), "Jane Doe");
  assert_eq!(fetched.to_string(), "REG100");

  let hasher = Argon2Hasher::new();
  assert!(hasher.verify("pw123", &fetched.credential));
  assert!(!hasher.verify("wrongpw", &fetched.credential));
}

#[tokio::test]
async fn find_by_reg_no_uses_login_identifier() {
  let s = store().await;
  let created = factory(&s).create_standard_account(jane()).await.unwrap();

  let found = s.find_by_reg_no("REG100").await.unwrap().unwrap();
  assert_eq!(found.account_id, created.account_id);
  assert!(s.find_by_reg_no("REG404").await.unwrap().is_none());
}

#[tokio::test]
async fn get_account_missing_returns_none() {
  let s = store().await;
  assert!(s.get_account(AccountId(42)).await.unwrap().is_none());
}

// ─── Listing and soft delete ─────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_role_and_active() {
  let s = store().await;
  let f = factory(&s);

  let patient = f
    .create_standard_account(NewAccount::new("Pat", "Ient", "P001", "0700000001", "x"))
    .await
    .unwrap();
  f.create_staff_account(NewAccount::new("Nur", "Se", "S001", "0700000002", "x"))
    .await
    .unwrap();
  f.create_administrator_account(NewAccount::new("Ad", "Min", "A001", "0700000003", "x"))
    .await
    .unwrap();

  let staff = s
    .list_accounts(&AccountQuery { role: Some(Role::Staff), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(staff.len(), 1);
  assert_eq!(staff[0].reg_no, "S001");

  s.deactivate_account(patient.account_id).await.unwrap();
  let inactive = s
    .list_accounts(&AccountQuery { active: Some(false), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(inactive.len(), 1);
  assert_eq!(inactive[0].reg_no, "P001");

  let page = s
    .list_accounts(&AccountQuery { limit: Some(1), offset: Some(1), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].reg_no, "S001");
}

#[tokio::test]
async fn deactivate_is_a_soft_delete() {
  let s = store().await;
  let created = factory(&s).create_standard_account(jane()).await.unwrap();

  let updated = s.deactivate_account(created.account_id).await.unwrap();
  assert!(!updated.is_active());

  let fetched = s.get_account(created.account_id).await.unwrap().unwrap();
  assert!(!fetched.is_active());
}

#[tokio::test]
async fn deactivate_missing_account_errors() {
  let s = store().await;
  let err = s.deactivate_account(AccountId(7)).await.unwrap_err();
  assert!(matches!(err, crate::Error::AccountNotFound(AccountId(7))));
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_is_replaced_not_duplicated() {
  let s = store().await;
  let created = factory(&s).create_standard_account(jane()).await.unwrap();

  s.set_profile(created.account_id, ImageRef::from_bytes("a.png", b"one"))
    .await
    .unwrap();
  let second = s
    .set_profile(created.account_id, ImageRef::from_bytes("b.jpg", b"two"))
    .await
    .unwrap();

  let fetched = s.get_profile(created.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.image, second.image);
  assert_eq!(fetched.image.media_type, "image/jpeg");
}

#[tokio::test]
async fn profile_for_missing_account_errors() {
  let s = store().await;
  let err = s
    .set_profile(AccountId(9), ImageRef::from_bytes("a.png", b""))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::AccountNotFound(_)));
}

#[tokio::test]
async fn deleting_account_cascades_to_profile() {
  let s = store().await;
  let created = factory(&s).create_standard_account(jane()).await.unwrap();
  s.set_profile(created.account_id, ImageRef::from_bytes("jane.png", b"img"))
    .await
    .unwrap();

  assert!(s.delete_account(created.account_id).await.unwrap());
  assert!(s.get_account(created.account_id).await.unwrap().is_none());
  assert!(s.get_profile(created.account_id).await.unwrap().is_none());
  assert!(!s.delete_account(created.account_id).await.unwrap());
}

#[tokio::test]
async fn account_ids_are_never_reused() {
  let s = store().await;
  let f = factory(&s);

  let first = f.create_standard_account(jane()).await.unwrap();
  s.delete_account(first.account_id).await.unwrap();
  let second = f.create_standard_account(jane()).await.unwrap();
  assert!(second.account_id > first.account_id);
}

// ─── Error conversion ────────────────────────────────────────────────────────

#[test]
fn store_errors_keep_identity_in_core() {
  let core: ward_core::Error =
    crate::Error::UniquenessViolation(UniqueField::Email).into();
  assert!(matches!(core, ward_core::Error::UniquenessViolation(UniqueField::Email)));

  let core: ward_core::Error = crate::Error::Decode("bad".into()).into();
  assert!(matches!(core, ward_core::Error::Store(_)));
}
