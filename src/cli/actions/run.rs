use crate::cli::actions::{terminal, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Terminal(args) => terminal::execute(args).await,
    }
}
