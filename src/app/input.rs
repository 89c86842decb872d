//! Line commands read from the terminal.

use crate::auth::{forms::Field, types::View};
use thiserror::Error;
use url::Url;

pub const HELP: &str = "\
Commands:
  email <address>     fill in the email field
  password <value>    fill in the password field
  submit              submit the current form
  go <view>           follow a link (sign_in, sign_up, forgot_password)
  link <url>          complete an email link (verification or recovery)
  refresh             ask the provider for the current session
  signout             end the session
  help                show this help
  quit                exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Submit,
    Go(View),
    Link(Url),
    Refresh,
    SignOut,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command `{0}`. Type `help` for the list of commands.")]
    UnknownCommand(String),
    #[error("`{0}` needs a value.")]
    MissingArgument(&'static str),
    #[error("{0}")]
    InvalidView(String),
    #[error("Not a valid link: {0}")]
    InvalidLink(String),
}

/// Parses one input line. Blank lines yield `None`.
///
/// Passwords keep inner and trailing spaces; every other argument is trimmed.
///
/// # Errors
/// Returns an error for unknown commands or missing and malformed arguments.
pub fn parse(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim_start()));
    let argument = rest.trim();

    let command = match name.to_lowercase().as_str() {
        "email" => Command::Set(Field::Email, required("email", argument)?.to_string()),
        "password" => {
            required("password", argument)?;
            Command::Set(Field::Password, rest.to_string())
        }
        "submit" => Command::Submit,
        "go" => Command::Go(
            required("go", argument)?
                .parse()
                .map_err(InputError::InvalidView)?,
        ),
        "link" => Command::Link(
            Url::parse(required("link", argument)?)
                .map_err(|err| InputError::InvalidLink(err.to_string()))?,
        ),
        "refresh" => Command::Refresh,
        "signout" | "sign_out" | "logout" => Command::SignOut,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn required<'a>(command: &'static str, argument: &'a str) -> Result<&'a str, InputError> {
    if argument.is_empty() {
        Err(InputError::MissingArgument(command))
    } else {
        Ok(argument)
    }
}
