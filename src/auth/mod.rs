//! Typed façade over the auth endpoints.
//!
//! One request/response pair per operation; no retries, no backoff. The only
//! operations with local side effects are `login` and `refresh` (persist the
//! returned session) and `logout` (clear it). Everything else changes state
//! on the server only.

pub mod error;
pub mod types;

use crate::client::ApiClient;
use crate::store::{CredentialStore, Session, User};
use error::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use types::{
    MessageResponse, RegisterDraft, VerificationStatus, VerifyEmailResponse, DEFAULT_ROLE,
};

pub struct AuthService {
    client: ApiClient,
    store: Arc<CredentialStore>,
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::UnexpectedResponse(e.to_string()))
}

impl AuthService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let store = Arc::clone(client.store());
        Self { client, store }
    }

    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Create an account. No session is established; the server sends the
    /// verification email.
    ///
    /// # Errors
    /// Fails on validation before any request, otherwise on the server's
    /// rejection (e.g. `EMAIL_TAKEN`) or transport failure.
    pub async fn register(&self, draft: &RegisterDraft) -> Result<MessageResponse, Error> {
        draft.validate()?;

        let body = json!({
            "name": draft.name,
            "email": draft.email,
            "password": draft.password.expose_secret(),
            "phoneNumber": draft.phone_number,
            "company": draft.company,
            "role": draft.role.as_deref().unwrap_or(DEFAULT_ROLE),
        });

        let response = self.client.post("/auth/register", &body).await?;
        info!("registration submitted for {}", draft.email);
        decode(response)
    }

    /// Authenticate and persist the returned session atomically.
    ///
    /// # Errors
    /// Rejections carry a structured code: `INVALID_CREDENTIALS`,
    /// `UNVERIFIED_EMAIL` or `UNVERIFIED_PHONE`.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, Error> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let response = self.client.post("/auth/login", &body).await?;
        let session: Session = decode(response)?;
        self.store
            .save(&session)
            .map_err(|e| Error::Store(e.to_string()))?;
        info!("logged in as {}", session.user.email);
        Ok(session)
    }

    /// Confirm an email address with the emailed token.
    ///
    /// # Errors
    /// `INVALID_TOKEN` / `EXPIRED_TOKEN` on rejection.
    pub async fn verify_email(&self, token: &str) -> Result<VerifyEmailResponse, Error> {
        let response = self
            .client
            .get("/auth/verify-email", &[("token", token)])
            .await?;
        decode(response)
    }

    /// Confirm the phone number with the 6-digit SMS code.
    ///
    /// # Errors
    /// Validation failure for a malformed code (no request is made),
    /// `INCORRECT_CODE` on server rejection.
    pub async fn verify_phone(&self, email: &str, code: &str) -> Result<MessageResponse, Error> {
        types::validate_phone_code(code)?;
        let body = json!({ "email": email, "code": code });
        let response = self.client.post("/auth/verify-phone", &body).await?;
        decode(response)
    }

    /// Ask the server to send the verification email again.
    ///
    /// # Errors
    /// `RATE_LIMITED` or not-found on rejection.
    pub async fn resend_email_verification(&self, email: &str) -> Result<MessageResponse, Error> {
        let body = json!({ "email": email });
        let response = self
            .client
            .post("/auth/resend-email-verification", &body)
            .await?;
        decode(response)
    }

    /// Ask the server to send a fresh SMS code.
    ///
    /// # Errors
    /// `RATE_LIMITED` or not-found on rejection.
    pub async fn resend_phone_verification(&self, email: &str) -> Result<MessageResponse, Error> {
        let body = json!({ "email": email });
        let response = self
            .client
            .post("/auth/resend-phone-verification", &body)
            .await?;
        decode(response)
    }

    /// Request a password-reset email. The server reports success regardless
    /// of whether the account exists, so only transport failures surface.
    ///
    /// # Errors
    /// Transport failure only.
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, Error> {
        let body = json!({ "email": email });
        let response = self.client.post("/auth/forgot-password", &body).await?;
        decode(response)
    }

    /// Check a reset token before submitting a new password, so the user is
    /// told about an expired link up front.
    ///
    /// # Errors
    /// `INVALID_TOKEN` / `EXPIRED_TOKEN` on rejection.
    pub async fn validate_reset_token(&self, token: &str) -> Result<MessageResponse, Error> {
        let response = self
            .client
            .get("/auth/validate-reset-token", &[("token", token)])
            .await?;
        decode(response)
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    /// Validation failure before any request, `EXPIRED_TOKEN` /
    /// `INVALID_TOKEN` on server rejection.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<MessageResponse, Error> {
        types::validate_new_password(new_password, confirm_password)?;
        let body = json!({
            "token": token,
            "newPassword": new_password.expose_secret(),
            "confirmPassword": confirm_password.expose_secret(),
        });
        let response = self.client.post("/auth/reset-password", &body).await?;
        decode(response)
    }

    /// Exchange the stored refresh token for a fresh session and persist it.
    ///
    /// # Errors
    /// [`Error::MissingRefreshToken`] when nothing is stored — a local
    /// precondition failure, no request is made.
    pub async fn refresh_token(&self) -> Result<Session, Error> {
        let refresh = self
            .store
            .refresh_token()
            .ok_or(Error::MissingRefreshToken)?;

        let body = json!({ "refreshToken": refresh });
        let response = self.client.post("/auth/refresh", &body).await?;
        let session: Session = decode(response)?;
        self.store
            .save(&session)
            .map_err(|e| Error::Store(e.to_string()))?;
        debug!("session refreshed for {}", session.user.email);
        Ok(session)
    }

    /// Poll the server for the email-verification flag.
    ///
    /// # Errors
    /// Transport failure; callers in the polling loop swallow it and retry.
    pub async fn check_verification_status(&self, email: &str) -> Result<bool, Error> {
        let response = self
            .client
            .get("/auth/check-verification-status", &[("email", email)])
            .await?;
        let status: VerificationStatus = decode(response)?;
        Ok(status.email_verified)
    }

    /// Drop the local session. Always succeeds; clearing an empty store is a
    /// no-op.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            // Nothing actionable for the caller; the tokens on disk are
            // already unusable from the server's point of view.
            tracing::warn!("logout could not clear credential store: {e}");
        }
    }

    /// True iff an access token is stored. Expiry is only discovered through
    /// a 401 on the next call.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.store.current_user()
    }
}
