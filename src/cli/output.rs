//! CLI output formatting utilities.

use crate::tmdb::Movie;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Styled terminal output for the CLI.
pub struct Output;

impl Output {
    pub fn info(msg: &str) {
        println!("{} {}", style("i").cyan().bold(), msg);
    }

    pub fn success(msg: &str) {
        println!("{} {}", style("✓").green().bold(), msg);
    }

    /// Warnings and errors go to stderr so `--json` output stays clean.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style("!").yellow().bold(), msg);
    }

    pub fn error(msg: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(msg).red());
    }

    /// Section title.
    pub fn header(title: &str) {
        println!("\n{}", style(title).bold().underlined());
    }

    pub fn kv(label: &str, value: &str) {
        println!("  {:<12} {}", style(label).dim(), value);
    }

    pub fn list_item(item: &str) {
        println!("  {} {}", style("-").cyan(), item);
    }

    /// Print one suggested movie.
    pub fn movie(index: usize, movie: &Movie) {
        println!(
            "\n{} {} {}",
            style(format!("{:>2}.", index)).green(),
            style(&movie.title).bold(),
            style(format!("(★ {}, TMDB {})", movie.rating_label(), movie.id)).dim()
        );
        if let Some(reason) = &movie.reason {
            println!("    {}", style(reason).italic());
        }
        if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
            println!("    {}", content_preview(overview, 200));
        }
        if let Some(url) = movie.poster_url() {
            println!("    {}", style(url).dim());
        }
    }

    /// Spinner shown while the agent works. Call `finish_and_clear` when done.
    pub fn spinner(msg: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner().with_message(msg.to_string());
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg} ({elapsed})") {
            spinner.set_style(template);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

/// Flatten to one line and cut at `max_chars` characters.
fn content_preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
