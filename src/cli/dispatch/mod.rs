//! Maps validated CLI arguments to the action to run.

use crate::cli::actions::{terminal::Args, Action};
use crate::cli::commands::provider;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use secrecy::SecretString;
use url::Url;

/// Map validated CLI matches to the terminal action.
///
/// # Errors
/// Returns an error if required arguments are missing or a URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let opts = provider::Options::parse(matches)?;

    let config = AppConfig::new(&opts.provider_url, SecretString::from(opts.anon_key))?
        .with_site_url(&opts.site_url)?;

    let link = opts
        .link
        .as_deref()
        .map(Url::parse)
        .transpose()
        .context("invalid --link")?;

    Ok(Action::Terminal(Args { config, link }))
}
