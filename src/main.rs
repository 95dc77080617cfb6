use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use papertrends::config::Config;
use papertrends::corpus::loader::load_papers;
use papertrends::output::{terminal, write_json_report};
use papertrends::pipeline::analysis;

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("papertrends=info")),
        )
        .init();

    let config = Config::load()?;
    info!(
        csv = %config.papers_csv.display(),
        topics = config.analysis.number_of_topics,
        top_words = config.analysis.number_of_top_words,
        seed = ?config.analysis.random_seed,
        "Starting title analysis"
    );

    let papers = load_papers(&config.papers_csv)?;
    println!("Loaded {} papers from {}", papers.len(), config.papers_csv.display());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Fitting LDA with {} topics...",
        config.analysis.number_of_topics
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = analysis::analyze(&papers, &config.analysis);
    spinner.finish_and_clear();
    let report = result?;

    terminal::display_report(&report);

    if let Some(path) = &config.json_out {
        write_json_report(&report, path)?;
        println!("{} {}", "Report written to".dimmed(), path.display());
    }

    Ok(())
}
