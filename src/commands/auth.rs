use anyhow::Result;
use owo_colors::OwoColorize;
use reschedule_google::{app_config, authenticate};

use crate::config::Settings;

/// Run the browser consent flow and store the resulting tokens, replacing any
/// existing session.
pub async fn run(settings: &Settings) -> Result<()> {
    let paths = settings.auth_paths();
    let credentials = app_config::load(&paths.credentials)?;

    println!("Authenticating with Google...");
    authenticate::grant(&paths, &credentials).await?;

    println!(
        "\n{} Tokens saved to {}",
        "Authenticated.".green(),
        paths.token.display()
    );
    println!("\nRun `reschedule` to pick an event and move it.");

    Ok(())
}
