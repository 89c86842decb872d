use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted in `NEXUS_LOG_LEVEL`, indexed by verbosity count.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a verbosity count (`0`..=`4`) or a level name from [`LEVELS`].
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> std::result::Result<u8, String> {
        let level = level.trim();
        if let Ok(count) = level.parse::<u8>() {
            return if usize::from(count) < LEVELS.len() {
                Ok(count)
            } else {
                Err(format!("log level count must be 0-{}", LEVELS.len() - 1))
            };
        }

        LEVELS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(level))
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level, expected one of: {}", LEVELS.join(", ")))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log verbosity, repeat for more (-vvv). Logs go to stderr; RUST_LOG overrides")
            .long_help(
                "Log verbosity. Each -v raises the level: WARN, INFO, DEBUG, TRACE (default: ERROR).\n\
                 NEXUS_LOG_LEVEL takes a level name or count. Logs are written to stderr so they \
                 never mix with the screen on stdout; RUST_LOG directives take precedence.",
            )
            .env("NEXUS_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_level(value: &str) -> Result<u8, clap::Error> {
        Command::new("nexus")
            .arg(Arg::new("level").value_parser(validator_log_level()))
            .try_get_matches_from(["nexus", value])
            .map(|matches| matches.get_one::<u8>("level").copied().unwrap_or_default())
    }

    #[test]
    fn level_names_map_to_counts() {
        assert_eq!(parse_level("error").unwrap(), 0);
        assert_eq!(parse_level("INFO").unwrap(), 2);
        assert_eq!(parse_level("trace").unwrap(), 4);
    }

    #[test]
    fn counts_are_bounded() {
        assert_eq!(parse_level("3").unwrap(), 3);
        assert!(parse_level("5").is_err());
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn repeated_flag_counts() {
        temp_env::with_var("NEXUS_LOG_LEVEL", None::<&str>, || {
            let matches = with_args(Command::new("nexus")).get_matches_from(["nexus", "-vv"]);
            assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(2));
        });
    }
}
