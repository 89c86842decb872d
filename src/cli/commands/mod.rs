pub mod logging;
pub mod provider;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("nexus")
        .about("Client-side authentication front end")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles);

    let command = provider::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use provider::{ARG_ANON_KEY, ARG_LINK, ARG_PROVIDER_URL, ARG_SITE_URL};

    // Keeps the developer's shell from leaking into env-driven tests.
    fn with_cleared_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("NEXUS_PROVIDER_URL", None::<&str>),
                ("NEXUS_ANON_KEY", None::<&str>),
                ("NEXUS_SITE_URL", None::<&str>),
                ("NEXUS_LINK", None::<&str>),
                ("NEXUS_LOG_LEVEL", None::<&str>),
            ],
            f,
        )
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "nexus");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Client-side authentication front end".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        with_cleared_env(|| {
            let matches = new().get_matches_from(vec![
                "nexus",
                "--provider-url",
                "https://project.supabase.co",
                "--anon-key",
                "anon",
                "--link",
                "http://localhost:3000/#access_token=t&type=recovery",
            ]);

            assert_eq!(
                matches.get_one::<String>(ARG_PROVIDER_URL).cloned(),
                Some("https://project.supabase.co".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(ARG_ANON_KEY).cloned(),
                Some("anon".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(ARG_SITE_URL).cloned(),
                Some("http://localhost:3000".to_string())
            );
            assert!(matches.get_one::<String>(ARG_LINK).is_some());
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("NEXUS_PROVIDER_URL", Some("https://project.supabase.co")),
                ("NEXUS_ANON_KEY", Some("anon")),
                ("NEXUS_SITE_URL", Some("https://app.example.com")),
                ("NEXUS_LINK", None),
                ("NEXUS_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["nexus"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_SITE_URL).cloned(),
                    Some("https://app.example.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("NEXUS_LOG_LEVEL", Some(level)),
                    ("NEXUS_PROVIDER_URL", Some("https://project.supabase.co")),
                    ("NEXUS_ANON_KEY", Some("anon")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["nexus"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5 {
            with_cleared_env(|| {
                let mut args = vec![
                    "nexus".to_string(),
                    "--provider-url".to_string(),
                    "https://project.supabase.co".to_string(),
                    "--anon-key".to_string(),
                    "anon".to_string(),
                ];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_missing_provider_fails() {
        with_cleared_env(|| {
            let result = new().try_get_matches_from(vec!["nexus", "--anon-key", "anon"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }
}
