//! Pre-flight authentication checks for protected actions.
//!
//! The guard only looks at the store: a missing token fails fast before any
//! work happens, with nothing protected ever executed. It deliberately does
//! not ask the server whether the token is still good — the first
//! authenticated call does that, and the HTTP client's 401 handling tears the
//! session down if the answer is no.

use crate::auth::error::Error;
use crate::store::{CredentialStore, User};

/// Require an authenticated session before a protected action runs.
///
/// Returns the cached user for display when one is stored; the cached profile
/// may be stale and is never used for authorization decisions.
///
/// # Errors
/// [`Error::Unauthenticated`] when no access token is stored.
pub fn require_authenticated(store: &CredentialStore) -> Result<Option<User>, Error> {
    if !store.is_authenticated() {
        return Err(Error::Unauthenticated);
    }
    Ok(store.current_user())
}
