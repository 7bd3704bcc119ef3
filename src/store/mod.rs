//! File-backed credential store.
//!
//! The store owns the persisted session: access token, refresh token and the
//! cached user profile, kept in a single JSON document so a save or clear is
//! observed by readers either fully or not at all. Saves go through a
//! temporary file in the same directory followed by a rename.
//!
//! Expiry is not tracked here. A stored token may be long dead; the server's
//! `401` is the only expiry signal and is handled by the HTTP client.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cached projection of the user returned by the last successful login or
/// refresh. Display only; never used for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

/// An authenticated session as returned by `/auth/login` and `/auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

/// Persistent session storage at a fixed path.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a session, overwriting any previous one unconditionally.
    ///
    /// The session is written to a sibling temporary file and renamed into
    /// place, so a concurrent `load` sees either the old or the new session.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written or renamed.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(session)?;
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("renaming into {}", self.path.display()))?;

        debug!("session saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored session. Clearing an already-empty store is a no-op
    /// success.
    ///
    /// # Errors
    /// Returns an error only if the file exists and cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("session cleared from {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }

    /// Load the stored session, or `None` if absent or undecodable. A corrupt
    /// file must not error out of here; it reads as an empty store.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("ignoring corrupt credential file {}: {e}", self.path.display());
                None
            }
        }
    }

    /// True iff an access token is present, regardless of expiry.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.load()
            .map(|s| s.access_token)
            .filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.load()
            .map(|s| s.refresh_token)
            .filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.load().map(|s| s.user)
    }
}
