//! # Nexus (client-side authentication front end)
//!
//! `nexus` collects credentials and delegates every real authentication
//! operation to a remote identity provider. Password checks, token issuance,
//! session storage and reset emails all happen on the provider; this crate only
//! decides which view to show and what to tell the user.
//!
//! ## View State Machine
//!
//! The [`auth::state::ControllerState`] derives the screen (loading, workspace or
//! one of the credential forms) from an asynchronous stream of session-change
//! events. A `PasswordRecovery` event forces the update-password view even though
//! the recovery link also authenticates the user; the workspace only appears once
//! the new password is set.
//!
//! ## Providers
//!
//! The core consumes providers through [`auth::provider::IdentityProvider`]. The
//! [`gotrue`] module implements it for GoTrue-compatible (Supabase Auth) servers,
//! including the redirect-link fragments that signal recovery.
//!
//! Passwords and access tokens are held as `SecretString` and must never be
//! logged.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod gotrue;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_user_agent() {
        assert!(APP_USER_AGENT.starts_with("nexus/"));
    }
}
