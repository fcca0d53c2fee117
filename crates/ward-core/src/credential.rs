//! The credential subsystem: one-way derivation and verification of secrets.
//!
//! Callers hand a plaintext secret to a [`CredentialHasher`] and keep only the
//! returned [`CredentialHash`]. Nothing in this crate stores or logs the
//! plaintext.

use std::fmt;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// An opaque PHC-format hash, e.g. `$argon2id$v=19$…`.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
  /// Wrap a PHC string read back from storage.
  pub fn from_phc(phc: impl Into<String>) -> Self { Self(phc.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Debug for CredentialHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("CredentialHash(<redacted>)")
  }
}

/// Derives and verifies one-way credential hashes.
pub trait CredentialHasher: Send + Sync {
  /// Derive a fresh hash for `secret`.
  fn derive(&self, secret: &str) -> Result<CredentialHash>;

  /// Check `secret` against a previously derived hash. A malformed hash never
  /// verifies.
  fn verify(&self, secret: &str, hash: &CredentialHash) -> bool;
}

/// Argon2id with the crate's default parameters and a random salt per hash.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
  argon2: Argon2<'static>,
}

impl Argon2Hasher {
  pub fn new() -> Self { Self::default() }
}

impl CredentialHasher for Argon2Hasher {
  fn derive(&self, secret: &str) -> Result<CredentialHash> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = self
      .argon2
      .hash_password(secret.as_bytes(), &salt)
      .map_err(|e| Error::Credential(e.to_string()))?
      .to_string();
    Ok(CredentialHash(hash))
  }

  fn verify(&self, secret: &str, hash: &CredentialHash) -> bool {
    let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
      return false;
    };
    self.argon2.verify_password(secret.as_bytes(), &parsed).is_ok()
  }
}
