//! Handlers for the onboarding funnel.

use crate::auth::types::RegisterDraft;
use crate::auth::AuthService;
use crate::flow::{self, EmailVerification, EmailVerificationOutcome, VerificationStage};
use anyhow::{bail, Result};
use std::time::Duration;
use tracing::{info_span, Instrument};

fn print_message(message: Option<String>, fallback: &str) {
    println!("{}", message.as_deref().unwrap_or(fallback));
}

pub async fn register(auth: &AuthService, draft: &RegisterDraft) -> Result<()> {
    let response = auth
        .register(draft)
        .instrument(info_span!("register", email = %draft.email))
        .await?;
    print_message(response.message, "Account created.");
    println!(
        "Check your inbox, then run `testai await-verification --email {}` \
         or `testai verify-email --token <token>`.",
        draft.email
    );
    Ok(())
}

pub async fn verify_email(auth: &AuthService, token: &str) -> Result<()> {
    let verification = EmailVerification::new();
    let outcome = verification
        .submit(auth, token)
        .instrument(info_span!("verify_email"))
        .await?;

    match outcome {
        EmailVerificationOutcome::Verified(response) => {
            print_message(response.message.clone(), "Email verified.");
            match outcome.next_stage() {
                Some(VerificationStage::PhonePending) => {
                    println!(
                        "One step left: run `testai verify-phone --email <email> \
                         --code <sms-code>`."
                    );
                }
                _ => println!("Your account is active. Run `testai login` to sign in."),
            }
            Ok(())
        }
        EmailVerificationOutcome::Rejected { message } => {
            bail!("email verification failed: {message}")
        }
    }
}

pub async fn verify_phone(auth: &AuthService, email: &str, code: &str) -> Result<()> {
    let response = auth.verify_phone(email, code).await?;
    print_message(response.message, "Phone number verified.");
    println!("Your account is active. Run `testai login` to sign in.");
    Ok(())
}

/// Block until the verification email is acted on, or Ctrl-C.
pub async fn await_verification(
    auth: &AuthService,
    email: &str,
    interval: Duration,
) -> Result<()> {
    println!("Waiting for {email} to be verified (Ctrl-C to stop)...");
    tokio::select! {
        () = flow::await_email_verification(auth, email, interval) => {
            println!("Email verified. Run `testai login` to sign in.");
            Ok(())
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            println!();
            println!("Stopped waiting; the verification link stays valid.");
            Ok(())
        }
    }
}

pub async fn resend_email(auth: &AuthService, email: &str) -> Result<()> {
    let response = auth.resend_email_verification(email).await?;
    print_message(response.message, "Verification email sent.");
    Ok(())
}

pub async fn resend_phone(auth: &AuthService, email: &str) -> Result<()> {
    let response = auth.resend_phone_verification(email).await?;
    print_message(response.message, "SMS code sent.");
    Ok(())
}
