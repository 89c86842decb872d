//! Runtime configuration for the identity provider connection and the redirect
//! targets embedded in verification and recovery emails. The anon key is a
//! public API key but is still held as a secret so it never shows up in logs.

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use url::Url;

/// Fragment marker the provider appends to recovery links.
pub const RECOVERY_FRAGMENT: &str = "update_password";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    provider_url: Url,
    anon_key: SecretString,
    site_url: Url,
}

impl AppConfig {
    /// Builds the config from raw values, normalizing both URLs.
    ///
    /// # Errors
    /// Returns an error if a URL does not parse or is not http(s).
    pub fn new(provider_url: &str, anon_key: SecretString) -> Result<Self> {
        Ok(Self {
            provider_url: parse_base_url(provider_url).context("invalid provider URL")?,
            anon_key,
            site_url: parse_base_url(DEFAULT_SITE_URL)?,
        })
    }

    /// # Errors
    /// Returns an error if `site_url` does not parse or is not http(s).
    pub fn with_site_url(mut self, site_url: &str) -> Result<Self> {
        self.site_url = parse_base_url(site_url).context("invalid site URL")?;
        Ok(self)
    }

    #[must_use]
    pub fn provider_url(&self) -> &Url {
        &self.provider_url
    }

    #[must_use]
    pub fn anon_key(&self) -> &SecretString {
        &self.anon_key
    }

    #[must_use]
    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    #[must_use]
    pub fn redirects(&self) -> Redirects {
        Redirects::for_site(&self.site_url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where the provider sends users back to after following an email link.
pub struct Redirects {
    pub email_verification: Url,
    pub password_recovery: Url,
}

impl Redirects {
    #[must_use]
    pub fn for_site(site_url: &Url) -> Self {
        let email_verification = site_url.clone();
        let mut password_recovery = site_url.clone();
        password_recovery.set_fragment(Some(RECOVERY_FRAGMENT));

        Self {
            email_verification,
            password_recovery,
        }
    }
}

/// Parses an http(s) URL and strips query and fragment so it can serve as an
/// origin or API base.
fn parse_base_url(value: &str) -> Result<Url> {
    let mut url = Url::parse(value.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("unsupported scheme {scheme}")),
    }

    if url.host_str().is_none() {
        return Err(anyhow!("no host specified"));
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
