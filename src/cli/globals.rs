use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::commands::{ARG_API_URL, ARG_CREDENTIALS, ARG_TIMEOUT};

/// Connection settings shared by every action.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub timeout: Duration,
    pub credentials_path: PathBuf,
}

impl GlobalArgs {
    /// Build the globals from parsed matches, computing the default
    /// credential path when none was given.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or no home
    /// directory can be determined for the default credential path.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .context("missing required argument: --api-url")?;

        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .map_or(crate::client::DEFAULT_TIMEOUT, Duration::from_secs);

        let credentials_path = match matches.get_one::<String>(ARG_CREDENTIALS) {
            Some(path) => PathBuf::from(path),
            None => default_credentials_path()?,
        };

        Ok(Self {
            api_url,
            timeout,
            credentials_path,
        })
    }
}

/// `$TESTAI_HOME/credentials.json`, falling back to
/// `$HOME/.testai/credentials.json`.
///
/// # Errors
/// Returns an error when neither `TESTAI_HOME` nor `HOME` is set.
pub fn default_credentials_path() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("TESTAI_HOME") {
        return Ok(PathBuf::from(home).join("credentials.json"));
    }
    let home = std::env::var_os("HOME")
        .context("cannot locate the credential file: neither TESTAI_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".testai").join("credentials.json"))
}
