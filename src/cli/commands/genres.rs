//! Genres and moods listing commands.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::suggest::MOODS;
use crate::tmdb::{MovieDatabase, TmdbClient};
use anyhow::Result;

/// Run the genres command.
pub async fn run_genres(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Genres, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let client = TmdbClient::from_settings(&settings.tmdb)?;
    let genres = client.genres().await?;

    if genres.is_empty() {
        Output::info("TMDB returned no genres.");
        return Ok(());
    }

    Output::header(&format!("Genres ({})", genres.len()));
    for genre in &genres {
        Output::kv(&format!("{:>5}", genre.id), &genre.name);
    }
    println!();

    Ok(())
}

/// Run the moods command.
pub fn run_moods() -> Result<()> {
    Output::header("Moods");
    for mood in MOODS {
        Output::list_item(mood);
    }
    println!();
    Output::info("Any other mood word works too; these are the suggested ones.");

    Ok(())
}
