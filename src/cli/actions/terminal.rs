use crate::{
    app::{input::Command, App},
    auth::provider::IdentityProvider,
    config::AppConfig,
    gotrue::GoTrueClient,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub link: Option<Url>,
}

/// Execute the terminal action.
/// # Errors
/// Returns an error if the provider client cannot be built or terminal I/O fails.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        provider_url = %args.config.provider_url(),
        site_url = %args.config.site_url(),
        "starting"
    );

    let client = GoTrueClient::new(args.config).context("failed to build provider client")?;
    let redirects = client.config().redirects();
    let provider: Arc<dyn IdentityProvider> = Arc::new(client);

    // Attach first so the session change from the link is observed.
    let mut app = App::new(provider, redirects);

    if let Some(link) = args.link {
        debug!("completing startup link");
        app.handle_command(Command::Link(link));
    }

    app.run(BufReader::new(io::stdin()), io::stdout()).await
}
