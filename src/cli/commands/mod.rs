pub mod logging;
pub mod onboarding;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_CREDENTIALS: &str = "credentials";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("testai")
        .about("TestAI account and onboarding client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the TestAI API")
                .env("TESTAI_API_URL")
                .default_value("http://localhost:8081/api")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("TESTAI_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS)
                .long("credentials")
                .help("Path to the credential file (default: $TESTAI_HOME or ~/.testai)")
                .env("TESTAI_CREDENTIALS")
                .global(true),
        );

    let command = onboarding::with_subcommands(command);
    let command = session::with_subcommands(command);
    logging::with_args(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "testai");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("TestAI account and onboarding client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn register_parses_full_draft() {
        let matches = new().get_matches_from(vec![
            "testai",
            "register",
            "--name",
            "Alice Martin",
            "--email",
            "alice@example.com",
            "--password",
            "longenough1",
            "--confirm-password",
            "longenough1",
            "--phone-number",
            "+33612345678",
            "--company",
            "ACME",
        ]);

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, onboarding::CMD_REGISTER);
        assert_eq!(
            sub.get_one::<String>(onboarding::ARG_NAME).cloned(),
            Some("Alice Martin".to_string())
        );
        assert_eq!(
            sub.get_one::<String>(onboarding::ARG_PHONE_NUMBER).cloned(),
            Some("+33612345678".to_string())
        );
        assert!(sub.get_one::<String>(onboarding::ARG_ROLE).is_none());
    }

    #[test]
    fn global_args_reach_subcommands() {
        let matches = new().get_matches_from(vec![
            "testai",
            "login",
            "--email",
            "alice@example.com",
            "--password",
            "longenough1",
            "--api-url",
            "https://api.testai.dev/api",
            "--timeout",
            "5",
        ]);

        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(
            sub.get_one::<String>(ARG_API_URL).cloned(),
            Some("https://api.testai.dev/api".to_string())
        );
        assert_eq!(sub.get_one::<u64>(ARG_TIMEOUT).copied(), Some(5));
    }

    #[test]
    fn await_verification_defaults_interval() {
        let matches = new().get_matches_from(vec![
            "testai",
            "await-verification",
            "--email",
            "alice@example.com",
        ]);

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, onboarding::CMD_AWAIT_VERIFICATION);
        assert_eq!(
            sub.get_one::<u64>(onboarding::ARG_INTERVAL).copied(),
            Some(3)
        );
    }

    #[test]
    fn verify_phone_requires_email_and_code() {
        let result = new().try_get_matches_from(vec!["testai", "verify-phone", "--code", "123456"]);
        assert!(result.is_err());
    }
}
