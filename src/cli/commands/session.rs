//! Subcommands for the session lifecycle and password recovery.

use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_REFRESH: &str = "refresh";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_TOKEN: &str = "token";
pub const ARG_NEW_PASSWORD: &str = "new-password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and store the session")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("TESTAI_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Drop the stored session"))
        .subcommand(
            Command::new(CMD_REFRESH)
                .about("Exchange the stored refresh token for a fresh session"),
        )
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in user"))
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Request a password-reset email")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password using a reset token")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .short('t')
                        .long("token")
                        .help("Reset token from the email link")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_NEW_PASSWORD)
                        .long("new-password")
                        .help("New password (at least 8 characters)")
                        .env("TESTAI_NEW_PASSWORD")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_CONFIRM_PASSWORD)
                        .long("confirm-password")
                        .help("New password confirmation; defaults to --new-password"),
                ),
        )
}
