//! Plain-text rendering of the three screens.

use crate::auth::{
    forms::CredentialForm,
    state::Screen,
    types::{MessageKind, UserIdentity, View},
};
use std::fmt::Write;

const BRAND: &str = "NEXUS";
const TAGLINE: &str = "Enterprise Identity Management";

/// Static demo rows; they are not derived from real session events.
const SECURITY_HISTORY: [(&str, &str, &str); 2] = [
    ("New Session Started", "Chrome / macOS", "Just now"),
    ("Profile Initialized", "System Trace", "2 mins ago"),
];

/// Renders `screen`. `form` is the mounted credential form, if any, and
/// `notice` a one-line status shown under every screen.
#[must_use]
pub fn screen(screen: &Screen, form: Option<&dyn CredentialForm>, notice: Option<&str>) -> String {
    let mut out = match (screen, form) {
        (Screen::Loading, _) => "Loading...\n".to_string(),
        (Screen::Workspace(user), _) => workspace(user),
        (Screen::CredentialForm(_), Some(form)) => credential_form(form),
        (Screen::CredentialForm(view), None) => format!("{BRAND}\n\n[{view}]\n"),
    };

    if let Some(notice) = notice {
        let _ = writeln!(out, "\n* {notice}");
    }

    out
}

#[must_use]
pub fn credential_form(form: &dyn CredentialForm) -> String {
    let mut out = format!("{BRAND}\n{TAGLINE}\n\n");
    let confirming = form.confirmation();

    let (title, subtitle) = heading(form.view(), confirming.is_some());
    let _ = writeln!(out, "{title}");
    if let Some(subtitle) = subtitle {
        let _ = writeln!(out, "{subtitle}");
    }
    out.push('\n');

    if let Some(email) = confirming {
        let _ = writeln!(
            out,
            "We've sent a verification link to {email}. Please check your inbox.\n"
        );
    }

    if let Some(message) = form.status().message() {
        let marker = match message.kind {
            MessageKind::Success => "ok",
            MessageKind::Error => "error",
        };
        let _ = writeln!(out, "  [{marker}] {}\n", message.text);
    }

    for field in form.fields() {
        let value = form.field_display(*field).unwrap_or_default();
        let _ = writeln!(out, "  {:<15} {value}", format!("{}:", field.label()));
    }

    if !form.fields().is_empty() {
        let _ = writeln!(out, "\n  [ {} ]  (submit)", form.submit_label());
    }

    let links = form.links();
    if !links.is_empty() {
        out.push('\n');
        for target in links {
            let _ = writeln!(
                out,
                "  {}  (go {target})",
                link_label(form.view(), *target, confirming.is_some())
            );
        }
    }

    out
}

#[must_use]
pub fn workspace(user: &UserIdentity) -> String {
    let email = user.email.as_deref().unwrap_or("");
    let name = user.display_name().unwrap_or("");

    let mut out = format!("{BRAND:<40}{name} <{email}>\n\n");
    out.push_str("Dashboard\nWelcome to your secure identity workspace.\n\n");

    out.push_str("AUTH STATUS\n  Secure & Verified\n  Authenticated via provider session token\n\n");

    let _ = writeln!(
        out,
        "INTERNAL UUID\n  {}\n  Your unique system identifier\n",
        user.id
    );

    out.push_str("Security History\n");
    let _ = writeln!(out, "  {:<24}{:<18}{:>10}", "EVENT", "SOURCE", "TIME");
    for (event, source, time) in SECURITY_HISTORY {
        let _ = writeln!(out, "  {event:<24}{source:<18}{time:>10}");
    }

    out.push_str("\n  [ Sign Out ]  (signout)\n");
    out
}

fn heading(view: View, confirming: bool) -> (&'static str, Option<&'static str>) {
    match view {
        View::SignIn => ("Welcome back", Some("Sign in to your Nexus account")),
        View::SignUp if confirming => ("Verify your email", None),
        View::SignUp => ("Create account", Some("Join thousands of teams on Nexus")),
        View::ForgotPassword => (
            "Reset Password",
            Some("Enter your email to receive a recovery link"),
        ),
        View::UpdatePassword => (
            "Update Password",
            Some("Choose a strong new password for your account"),
        ),
    }
}

fn link_label(from: View, to: View, confirming: bool) -> &'static str {
    match (from, to) {
        (View::SignIn, View::SignUp) => "Don't have an account? Create account",
        (View::SignIn, View::ForgotPassword) => "Forgot Password?",
        (View::SignUp, View::SignIn) if confirming => "Back to login",
        (View::SignUp, View::SignIn) => "Already have an account? Sign in",
        (View::ForgotPassword, View::SignIn) => "Remember your password? Sign in",
        _ => to.as_str(),
    }
}
