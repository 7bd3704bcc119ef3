//! Map validated CLI matches to the action to execute.

use crate::auth::types::RegisterDraft;
use crate::cli::actions::Action;
use crate::cli::commands::{onboarding, session};
use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::time::Duration;

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn optional(matches: &clap::ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

/// Translate the matched subcommand into an [`Action`].
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let Some((subcommand, sub)) = matches.subcommand() else {
        bail!("a subcommand is required");
    };

    let action = match subcommand {
        onboarding::CMD_REGISTER => {
            let password = required(sub, onboarding::ARG_PASSWORD)?;
            // An omitted confirmation means "same as the password"; the
            // mismatch check still runs on explicit values.
            let confirm = optional(sub, onboarding::ARG_CONFIRM_PASSWORD)
                .unwrap_or_else(|| password.clone());
            Action::Register {
                draft: RegisterDraft {
                    name: required(sub, onboarding::ARG_NAME)?,
                    email: required(sub, onboarding::ARG_EMAIL)?,
                    password: SecretString::from(password),
                    confirm_password: SecretString::from(confirm),
                    phone_number: optional(sub, onboarding::ARG_PHONE_NUMBER),
                    company: optional(sub, onboarding::ARG_COMPANY),
                    role: optional(sub, onboarding::ARG_ROLE),
                },
            }
        }
        onboarding::CMD_VERIFY_EMAIL => Action::VerifyEmail {
            token: required(sub, onboarding::ARG_TOKEN)?,
        },
        onboarding::CMD_VERIFY_PHONE => Action::VerifyPhone {
            email: required(sub, onboarding::ARG_EMAIL)?,
            code: required(sub, onboarding::ARG_CODE)?,
        },
        onboarding::CMD_AWAIT_VERIFICATION => Action::AwaitVerification {
            email: required(sub, onboarding::ARG_EMAIL)?,
            interval: sub
                .get_one::<u64>(onboarding::ARG_INTERVAL)
                .copied()
                .map_or(crate::flow::DEFAULT_POLL_INTERVAL, Duration::from_secs),
        },
        onboarding::CMD_RESEND_EMAIL => Action::ResendEmail {
            email: required(sub, onboarding::ARG_EMAIL)?,
        },
        onboarding::CMD_RESEND_PHONE => Action::ResendPhone {
            email: required(sub, onboarding::ARG_EMAIL)?,
        },
        session::CMD_LOGIN => Action::Login {
            email: required(sub, session::ARG_EMAIL)?,
            password: SecretString::from(required(sub, session::ARG_PASSWORD)?),
        },
        session::CMD_LOGOUT => Action::Logout,
        session::CMD_REFRESH => Action::Refresh,
        session::CMD_WHOAMI => Action::Whoami,
        session::CMD_FORGOT_PASSWORD => Action::ForgotPassword {
            email: required(sub, session::ARG_EMAIL)?,
        },
        session::CMD_RESET_PASSWORD => {
            let new_password = required(sub, session::ARG_NEW_PASSWORD)?;
            let confirm = optional(sub, session::ARG_CONFIRM_PASSWORD)
                .unwrap_or_else(|| new_password.clone());
            Action::ResetPassword {
                token: required(sub, session::ARG_TOKEN)?,
                new_password: SecretString::from(new_password),
                confirm_password: SecretString::from(confirm),
            }
        }
        other => bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn register_defaults_confirmation_to_password() {
        temp_env::with_var("TESTAI_PASSWORD", None::<&str>, || {
            let action = dispatch(&[
                "testai",
                "register",
                "--name",
                "Alice",
                "--email",
                "alice@example.com",
                "--password",
                "longenough1",
            ])
            .unwrap();

            match action {
                Action::Register { draft } => {
                    assert_eq!(
                        draft.confirm_password.expose_secret(),
                        draft.password.expose_secret()
                    );
                    assert!(draft.role.is_none());
                }
                other => panic!("expected Register, got {other:?}"),
            }
        });
    }

    #[test]
    fn password_can_come_from_the_environment() {
        temp_env::with_var("TESTAI_PASSWORD", Some("longenough1"), || {
            let action = dispatch(&[
                "testai",
                "login",
                "--email",
                "alice@example.com",
            ])
            .unwrap();

            match action {
                Action::Login { password, .. } => {
                    assert_eq!(password.expose_secret(), "longenough1");
                }
                other => panic!("expected Login, got {other:?}"),
            }
        });
    }

    #[test]
    fn await_verification_converts_interval_to_duration() {
        let action = dispatch(&[
            "testai",
            "await-verification",
            "--email",
            "alice@example.com",
            "--interval",
            "7",
        ])
        .unwrap();

        match action {
            Action::AwaitVerification { interval, .. } => {
                assert_eq!(interval, Duration::from_secs(7));
            }
            other => panic!("expected AwaitVerification, got {other:?}"),
        }
    }
}
