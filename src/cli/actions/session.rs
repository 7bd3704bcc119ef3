//! Handlers for the session lifecycle.

use crate::auth::AuthService;
use crate::flow::{self, LoginOutcome};
use crate::guard;
use anyhow::{bail, Result};
use secrecy::SecretString;
use tracing::{info_span, Instrument};

pub async fn login(auth: &AuthService, email: &str, password: &SecretString) -> Result<()> {
    let outcome = flow::login(auth, email, password)
        .instrument(info_span!("login", email = %email))
        .await?;

    match outcome {
        LoginOutcome::Authenticated(session) => {
            println!("Signed in as {} <{}>.", session.user.name, session.user.email);
            Ok(())
        }
        LoginOutcome::NeedsEmailVerification { message } => {
            eprintln!("{message}");
            bail!(
                "email not verified yet; run `testai await-verification --email {email}` \
                 or `testai resend-email --email {email}`"
            )
        }
        LoginOutcome::NeedsPhoneVerification { message } => {
            eprintln!("{message}");
            bail!(
                "phone not verified yet; run `testai verify-phone --email {email} \
                 --code <sms-code>` or `testai resend-phone --email {email}`"
            )
        }
        LoginOutcome::Rejected { message } => bail!("login failed: {message}"),
    }
}

pub fn logout(auth: &AuthService) -> Result<()> {
    auth.logout();
    println!("Signed out.");
    Ok(())
}

pub async fn refresh(auth: &AuthService) -> Result<()> {
    guard::require_authenticated(auth.store())?;
    let session = auth.refresh_token().await?;
    println!("Session refreshed for {}.", session.user.email);
    Ok(())
}

pub fn whoami(auth: &AuthService) -> Result<()> {
    let user = guard::require_authenticated(auth.store())?;
    match user {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            println!("role: {}", user.role);
            println!("active: {}", user.is_active);
        }
        // Token present but no cached profile; the session predates it.
        None => println!("Signed in (no cached profile)."),
    }
    Ok(())
}
