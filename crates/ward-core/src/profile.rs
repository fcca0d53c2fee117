//! Profile attachments: one image reference per account.
//!
//! No binary data lives in the store; the image stays on disk and the profile
//! records where it is and what its bytes hash to. Deleting an account removes
//! its profile with it.

use std::{fmt, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::account::AccountId;

/// A reference to an image file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
  pub path:         String,
  /// SHA-256 hex digest of the file contents.
  pub content_hash: String,
  pub media_type:   String,
}

impl ImageRef {
  /// Build a reference for `bytes` read from `path`, guessing the media type
  /// from the file extension.
  pub fn from_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> Self {
    let path = path.as_ref();
    Self {
      path:         path.to_string_lossy().into_owned(),
      content_hash: hex::encode(Sha256::digest(bytes)),
      media_type:   media_type_for(path).to_owned(),
    }
  }
}

fn media_type_for(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase);
  match ext.as_deref() {
    Some("jpg" | "jpeg") => "image/jpeg",
    Some("png") => "image/png",
    Some("gif") => "image/gif",
    Some("webp") => "image/webp",
    _ => "application/octet-stream",
  }
}

/// The one-to-one side record attached to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub account_id: AccountId,
  pub image:      ImageRef,
  pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Profile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "profile of account {}", self.account_id)
  }
}
