pub mod terminal;

// Keeps the match over actions out of `mod.rs`.
mod run;

#[derive(Debug)]
pub enum Action {
    Terminal(terminal::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
