//! Onboarding funnel: register → email verification → phone verification →
//! login.
//!
//! The funnel is driven by whoever fronts it (here, CLI actions); this module
//! owns the transitions and the two pieces of real control flow:
//!
//! - polling the email-verification flag until it flips, swallowing errors on
//!   the way (verification is only ever positively confirmed through this
//!   channel, never negatively concluded);
//! - latching the outcome of an email-token submission so a duplicate
//!   submission of the same token re-yields the first outcome instead of
//!   hitting the server again.

use crate::auth::error::{Error, ErrorCode};
use crate::auth::types::VerifyEmailResponse;
use crate::auth::AuthService;
use crate::store::Session;
use secrecy::SecretString;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// How often the pending page asks whether the email was verified.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Progress through the two-factor onboarding gate. The email address is the
/// correlation key; no session token exists at this stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStage {
    EmailPending,
    PhonePending,
    Verified,
}

/// Where a login attempt leaves the user.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Session established and persisted.
    Authenticated(Session),
    /// Account exists but the email step is still open; re-enter the
    /// email-pending stage.
    NeedsEmailVerification { message: String },
    /// Email done, phone step still open.
    NeedsPhoneVerification { message: String },
    /// Anything else the server rejected (wrong password included). Shown to
    /// the user; no redirect.
    Rejected { message: String },
}

/// Attempt a login and classify the result by the server's structured code.
///
/// # Errors
/// Transport failures and non-rejection errors propagate; every rejection
/// the funnel knows how to route becomes a [`LoginOutcome`].
pub async fn login(
    auth: &AuthService,
    email: &str,
    password: &SecretString,
) -> Result<LoginOutcome, Error> {
    match auth.login(email, password).await {
        Ok(session) => Ok(LoginOutcome::Authenticated(session)),
        Err(Error::Api { code, message, .. }) => Ok(match code {
            Some(ErrorCode::UnverifiedEmail) => LoginOutcome::NeedsEmailVerification { message },
            Some(ErrorCode::UnverifiedPhone) => LoginOutcome::NeedsPhoneVerification { message },
            _ => LoginOutcome::Rejected { message },
        }),
        Err(e) => Err(e),
    }
}

/// Poll until the server reports the email as verified.
///
/// Each tick issues one `check-verification-status` call. Any failure is
/// logged and swallowed; the loop only ends on a positive answer. Callers
/// that need a way out race this future against cancellation
/// (`tokio::select!`), which stops the timer with it — there is no detached
/// task to leak.
pub async fn await_email_verification(auth: &AuthService, email: &str, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so the first check happens
    // one interval after the email was sent, like the original pending page.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match auth.check_verification_status(email).await {
            Ok(true) => {
                debug!("email verified for {email}");
                return;
            }
            Ok(false) => {}
            Err(e) => {
                // Not yet verified as far as we know; keep polling.
                debug!("verification status check failed, retrying: {e}");
            }
        }
    }
}

/// Final word on one email-token submission.
#[derive(Debug, Clone)]
pub enum EmailVerificationOutcome {
    Verified(VerifyEmailResponse),
    /// The server rejected the token (invalid, expired, already consumed).
    Rejected { message: String },
}

impl EmailVerificationOutcome {
    /// Next stage of the funnel after this outcome, or `None` when the entry
    /// point is terminal and the user has to restart via resend.
    #[must_use]
    pub fn next_stage(&self) -> Option<VerificationStage> {
        match self {
            Self::Verified(response) if response.needs_phone_verification() => {
                Some(VerificationStage::PhonePending)
            }
            Self::Verified(_) => Some(VerificationStage::Verified),
            Self::Rejected { .. } => None,
        }
    }
}

/// One-shot guard around the email-verification entry point.
///
/// The emailed link can be followed (or machine-prefetched) more than once;
/// verifying an already-consumed token again would read as a fresh failure
/// and confuse the user. The first definitive outcome — success or server
/// rejection — is latched and re-yielded without another request. Transport
/// failures are not latched, so a retry after a dropped connection is still
/// possible.
#[derive(Debug, Default)]
pub struct EmailVerification {
    outcome: OnceCell<EmailVerificationOutcome>,
}

impl EmailVerification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit the token, or replay the latched outcome.
    ///
    /// # Errors
    /// Transport failures only; rejections become a latched
    /// [`EmailVerificationOutcome::Rejected`].
    pub async fn submit(
        &self,
        auth: &AuthService,
        token: &str,
    ) -> Result<&EmailVerificationOutcome, Error> {
        self.outcome
            .get_or_try_init(|| async {
                match auth.verify_email(token).await {
                    Ok(response) => Ok(EmailVerificationOutcome::Verified(response)),
                    Err(Error::Api { message, .. }) => {
                        Ok(EmailVerificationOutcome::Rejected { message })
                    }
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// The latched outcome, if a submission already concluded.
    #[must_use]
    pub fn outcome(&self) -> Option<&EmailVerificationOutcome> {
        self.outcome.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{ApiClient, DEFAULT_TIMEOUT};
    use crate::store::CredentialStore;
    use serde_json::json;
    use std::net::TcpListener;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn service_for(server: &MockServer, dir: &tempfile::TempDir) -> AuthService {
        let store = Arc::new(CredentialStore::new(dir.path().join("credentials.json")));
        let client = ApiClient::new(&server.uri(), store, DEFAULT_TIMEOUT).unwrap();
        AuthService::new(client)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn polling_stops_once_verified() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        // Two "not yet" answers, then a positive one.
        Mock::given(method("GET"))
            .and(path("/auth/check-verification-status"))
            .and(query_param("email", "a@b.com"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"emailVerified": false})),
            )
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/check-verification-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"emailVerified": true})))
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        await_email_verification(&service, "a@b.com", Duration::from_millis(20)).await;

        let calls = server.received_requests().await.unwrap().len();
        assert_eq!(calls, 3);

        // No dangling timer keeps polling after the positive answer.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(server.received_requests().await.unwrap().len(), calls);
    }

    #[tokio::test]
    async fn polling_swallows_errors_and_continues() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/auth/check-verification-status"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/check-verification-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"emailVerified": true})))
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        await_email_verification(&service, "a@b.com", Duration::from_millis(20)).await;
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn polling_is_cancellable() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/auth/check-verification-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"emailVerified": false})),
            )
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        tokio::select! {
            () = await_email_verification(&service, "a@b.com", Duration::from_millis(20)) => {
                panic!("should not complete while unverified");
            }
            () = tokio::time::sleep(Duration::from_millis(90)) => {}
        }
    }

    #[tokio::test]
    async fn duplicate_email_verification_replays_first_outcome() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/auth/verify-email"))
            .and(query_param("token", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Email vérifié avec succès !",
                "phoneVerified": false,
                "requiresPhoneVerification": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        let verification = EmailVerification::new();

        let first = verification.submit(&service, "abc").await.unwrap();
        assert!(matches!(first, EmailVerificationOutcome::Verified(_)));
        assert_eq!(first.next_stage(), Some(VerificationStage::PhonePending));

        // Second submission of the same token: no second request, same answer.
        let second = verification.submit(&service, "abc").await.unwrap();
        assert!(matches!(second, EmailVerificationOutcome::Verified(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_token_is_latched_too() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/auth/verify-email"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "EXPIRED_TOKEN",
                "message": "Lien expiré"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        let verification = EmailVerification::new();

        let first = verification.submit(&service, "stale").await.unwrap();
        assert!(matches!(first, EmailVerificationOutcome::Rejected { .. }));
        assert_eq!(first.next_stage(), None);

        let second = verification.submit(&service, "stale").await.unwrap();
        assert!(matches!(second, EmailVerificationOutcome::Rejected { .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fully_verified_account_skips_phone_stage() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/auth/verify-email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Compte activé",
                "phoneVerified": true,
                "requiresPhoneVerification": true
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        let verification = EmailVerification::new();
        let outcome = verification.submit(&service, "abc").await.unwrap();
        assert_eq!(outcome.next_stage(), Some(VerificationStage::Verified));
    }

    #[tokio::test]
    async fn login_branches_on_structured_codes() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": "UNVERIFIED_PHONE",
                "message": "Veuillez vérifier votre téléphone"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        let outcome = login(&service, "a@b.com", &secret("longenough1"))
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            LoginOutcome::NeedsPhoneVerification { .. }
        ));
        // The rejection left no session behind.
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_without_redirect_target() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "INVALID_CREDENTIALS",
                "message": "Invalid credentials"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, &dir);
        let outcome = login(&service, "a@b.com", &secret("wrongpassword"))
            .await
            .unwrap();
        match outcome {
            LoginOutcome::Rejected { message } => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
