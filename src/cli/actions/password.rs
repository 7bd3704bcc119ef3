//! Handlers for password recovery.

use crate::auth::AuthService;
use anyhow::Result;
use secrecy::SecretString;

pub async fn forgot(auth: &AuthService, email: &str) -> Result<()> {
    let response = auth.forgot_password(email).await?;
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("If the account exists, a reset email is on its way.")
    );
    Ok(())
}

pub async fn reset(
    auth: &AuthService,
    token: &str,
    new_password: &SecretString,
    confirm_password: &SecretString,
) -> Result<()> {
    // Check the token first so an expired link is reported before the new
    // password is sent anywhere.
    auth.validate_reset_token(token).await?;
    let response = auth
        .reset_password(token, new_password, confirm_password)
        .await?;
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("Password updated. Run `testai login` to sign in.")
    );
    Ok(())
}
