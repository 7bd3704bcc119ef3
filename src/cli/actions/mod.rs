pub mod onboarding;
pub mod password;
pub mod session;

use crate::auth::types::RegisterDraft;
use crate::auth::AuthService;
use crate::cli::globals::GlobalArgs;
use crate::client::ApiClient;
use crate::store::CredentialStore;
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

/// Everything the CLI can do, one variant per routed entry point.
#[derive(Debug)]
pub enum Action {
    Register {
        draft: RegisterDraft,
    },
    VerifyEmail {
        token: String,
    },
    VerifyPhone {
        email: String,
        code: String,
    },
    AwaitVerification {
        email: String,
        interval: Duration,
    },
    ResendEmail {
        email: String,
    },
    ResendPhone {
        email: String,
    },
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Refresh,
    Whoami,
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        new_password: SecretString,
        confirm_password: SecretString,
    },
}

/// Execute an action against the configured API.
///
/// The unauthenticated signal from the HTTP client is checked once the
/// action is done: if any request tore the session down, the user is steered
/// back to `login` regardless of which action was running.
///
/// # Errors
/// Returns an error if the client cannot be built or the action fails.
pub async fn run(action: Action, globals: &GlobalArgs) -> Result<()> {
    let store = Arc::new(CredentialStore::new(globals.credentials_path.clone()));
    let client = ApiClient::new(&globals.api_url, store, globals.timeout)?;
    let mut unauthenticated = client.subscribe_unauthenticated();
    let auth = AuthService::new(client);

    let result = match action {
        Action::Register { draft } => onboarding::register(&auth, &draft).await,
        Action::VerifyEmail { token } => onboarding::verify_email(&auth, &token).await,
        Action::VerifyPhone { email, code } => onboarding::verify_phone(&auth, &email, &code).await,
        Action::AwaitVerification { email, interval } => {
            onboarding::await_verification(&auth, &email, interval).await
        }
        Action::ResendEmail { email } => onboarding::resend_email(&auth, &email).await,
        Action::ResendPhone { email } => onboarding::resend_phone(&auth, &email).await,
        Action::Login { email, password } => session::login(&auth, &email, &password).await,
        Action::Logout => session::logout(&auth),
        Action::Refresh => session::refresh(&auth).await,
        Action::Whoami => session::whoami(&auth),
        Action::ForgotPassword { email } => password::forgot(&auth, &email).await,
        Action::ResetPassword {
            token,
            new_password,
            confirm_password,
        } => password::reset(&auth, &token, &new_password, &confirm_password).await,
    };

    if unauthenticated.has_changed().unwrap_or(false) {
        eprintln!("Your session has expired. Run `testai login` to sign in again.");
    }

    result
}
