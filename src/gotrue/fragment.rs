//! Decoding of the URL fragment GoTrue appends to email links.
//!
//! A followed link lands on the redirect target with either session tokens
//! (`#access_token=...&type=recovery`) or an error
//! (`#error=access_denied&error_description=...`). The recovery redirect itself
//! carries an `#update_password` marker, so only the last `#` segment is read.

use crate::auth::errors::ProviderError;
use secrecy::SecretString;
use url::{form_urlencoded, Url};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkType {
    Recovery,
    /// Sign-up confirmation, magic link, invite or email change.
    Other,
}

#[derive(Debug)]
pub enum RedirectFragment {
    Session {
        access_token: SecretString,
        link_type: LinkType,
    },
    Error(ProviderError),
}

/// Parses the fragment of `link`. Returns `None` when it carries neither tokens
/// nor an error.
#[must_use]
pub fn parse(link: &Url) -> Option<RedirectFragment> {
    let fragment = link.fragment()?.rsplit('#').next()?;

    let mut access_token = None;
    let mut link_type = LinkType::Other;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
        match &*key {
            "access_token" if !value.is_empty() => {
                access_token = Some(SecretString::from(value.into_owned()));
            }
            "type" if value == "recovery" => link_type = LinkType::Recovery,
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(message) = error_description.or(error) {
        return Some(RedirectFragment::Error(ProviderError::new(message)));
    }

    access_token.map(|access_token| RedirectFragment::Session {
        access_token,
        link_type,
    })
}
