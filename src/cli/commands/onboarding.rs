//! Subcommands for the onboarding funnel: registration and the two
//! verification steps.

use clap::{Arg, Command};

pub const CMD_REGISTER: &str = "register";
pub const CMD_VERIFY_EMAIL: &str = "verify-email";
pub const CMD_VERIFY_PHONE: &str = "verify-phone";
pub const CMD_AWAIT_VERIFICATION: &str = "await-verification";
pub const CMD_RESEND_EMAIL: &str = "resend-email";
pub const CMD_RESEND_PHONE: &str = "resend-phone";

pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_PHONE_NUMBER: &str = "phone-number";
pub const ARG_COMPANY: &str = "company";
pub const ARG_ROLE: &str = "role";
pub const ARG_TOKEN: &str = "token";
pub const ARG_CODE: &str = "code";
pub const ARG_INTERVAL: &str = "interval";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Email address used at registration")
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account; the server sends a verification email")
                .arg(
                    Arg::new(ARG_NAME)
                        .short('n')
                        .long("name")
                        .help("Full name")
                        .required(true),
                )
                .arg(email_arg())
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long("password")
                        .help("Password (at least 8 characters)")
                        .env("TESTAI_PASSWORD")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_CONFIRM_PASSWORD)
                        .long("confirm-password")
                        .help("Password confirmation; defaults to --password"),
                )
                .arg(
                    Arg::new(ARG_PHONE_NUMBER)
                        .long("phone-number")
                        .help("Phone number for SMS verification (at least 10 digits)"),
                )
                .arg(
                    Arg::new(ARG_COMPANY)
                        .long("company")
                        .help("Company name"),
                )
                .arg(
                    Arg::new(ARG_ROLE)
                        .long("role")
                        .help("Account role (default: MANAGER)"),
                ),
        )
        .subcommand(
            Command::new(CMD_VERIFY_EMAIL)
                .about("Confirm an email address with the token from the emailed link")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .short('t')
                        .long("token")
                        .help("Verification token from the email link")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_AWAIT_VERIFICATION)
                .about("Wait until the verification email has been acted on (Ctrl-C to stop)")
                .arg(email_arg())
                .arg(
                    Arg::new(ARG_INTERVAL)
                        .long("interval")
                        .help("Seconds between checks")
                        .default_value("3")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                ),
        )
        .subcommand(
            Command::new(CMD_VERIFY_PHONE)
                .about("Confirm the phone number with the 6-digit SMS code")
                .arg(email_arg())
                .arg(
                    Arg::new(ARG_CODE)
                        .short('c')
                        .long("code")
                        .help("6-digit code received by SMS")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RESEND_EMAIL)
                .about("Send the verification email again")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(CMD_RESEND_PHONE)
                .about("Send a fresh SMS code")
                .arg(email_arg()),
        )
}
