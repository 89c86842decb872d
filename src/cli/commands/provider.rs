use clap::{Arg, ArgMatches, Command};

pub const ARG_PROVIDER_URL: &str = "provider-url";
pub const ARG_ANON_KEY: &str = "anon-key";
pub const ARG_SITE_URL: &str = "site-url";
pub const ARG_LINK: &str = "link";

#[derive(Debug, Clone)]
pub struct Options {
    pub provider_url: String,
    pub anon_key: String,
    pub site_url: String,
    pub link: Option<String>,
}

impl Options {
    /// Parse identity provider arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        // Env vars set to "" come through as empty values
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let Some(provider_url) = get_non_empty(ARG_PROVIDER_URL) else {
            anyhow::bail!("missing required argument: --{ARG_PROVIDER_URL}");
        };
        let Some(anon_key) = get_non_empty(ARG_ANON_KEY) else {
            anyhow::bail!("missing required argument: --{ARG_ANON_KEY}");
        };

        Ok(Self {
            provider_url,
            anon_key,
            site_url: get_non_empty(ARG_SITE_URL)
                .unwrap_or_else(|| crate::config::DEFAULT_SITE_URL.to_string()),
            link: get_non_empty(ARG_LINK),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_URL)
                .long(ARG_PROVIDER_URL)
                .help("Identity provider base URL, example: https://<project>.supabase.co")
                .env("NEXUS_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ANON_KEY)
                .long(ARG_ANON_KEY)
                .help("Public API key sent as the `apikey` header")
                .env("NEXUS_ANON_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_SITE_URL)
                .long(ARG_SITE_URL)
                .help("Site URL used for verification and recovery redirects")
                .env("NEXUS_SITE_URL")
                .default_value(crate::config::DEFAULT_SITE_URL),
        )
        .arg(
            Arg::new(ARG_LINK)
                .long(ARG_LINK)
                .help("Email link to complete at startup (verification or password recovery)")
                .long_help(
                    "Email link to complete at startup. Paste the full URL the verification or\nrecovery email sent you to; a recovery link opens the update password form.",
                )
                .env("NEXUS_LINK"),
        )
}
