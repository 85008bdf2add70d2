//! Command-line interface
//!
//! `scrape` pulls a diary from the site, `import` reads an exported diary
//! file; both print the entries or their tag statistics to stdout. Progress
//! and logs go to stderr.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::application::DiaryScraper;
use crate::domain::tag_stats::{compute_tag_stats, films_with_tag, rating_distribution, summarize};
use crate::domain::{DiaryEntry, ProgressSink};
use crate::infrastructure::config::defaults;
use crate::infrastructure::{
    import_diary_file, init_logging_with_config, write_diary_csv, ConfigManager,
};

#[derive(Parser, Debug)]
#[command(name = "letterboxd-tag-stats")]
#[command(version)]
#[command(
    about = "Scrape a Letterboxd diary and see how your tags relate to your ratings",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape a public diary
    Scrape {
        /// Letterboxd username
        username: String,

        /// Visit per-date pages to find tags missing from the listing (slower)
        #[arg(long)]
        deep_scan: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Read a diary.csv from a Letterboxd data export
    Import {
        /// Path to diary.csv
        path: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// What to print
    #[arg(long, value_enum, default_value_t = OutputFormat::Stats)]
    pub format: OutputFormat,

    /// Only show tags used on at least this many rated films
    #[arg(long, default_value_t = defaults::MIN_FILMS_PER_TAG)]
    pub min_films: usize,

    /// Also show the rating distribution and films for this tag
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Entries as a JSON array
    Json,
    /// Entries in the diary export layout
    Csv,
    /// Summary and per-tag statistics
    Stats,
}

/// Progress reporter writing to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn notify(&self, message: &str, fraction: Option<f64>) {
        match fraction {
            Some(fraction) => eprintln!("[{:>3.0}%] {}", fraction * 100.0, message),
            None => eprintln!("{}", message),
        }
    }
}

/// Parse arguments and run the selected command
pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

/// Run a parsed command line
pub async fn run_with(cli: Cli) -> Result<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;

    let stdout = std::io::stdout();
    match cli.command {
        Commands::Scrape {
            username,
            deep_scan,
            output,
        } => {
            let scraper = DiaryScraper::from_config(&config.scraper)?;
            let entries = scraper.scrape(&username, deep_scan, &StderrProgress).await;

            if entries.is_empty() {
                println!(
                    "No diary entries found for {}. \
                     Check that the username is correct and the profile is public.",
                    username
                );
                return Ok(());
            }

            info!("Scraped {} diary entries for {}", entries.len(), username);
            render(&mut stdout.lock(), &entries, &output)
        }
        Commands::Import { path, output } => {
            let entries = import_diary_file(&path)?;

            if entries.is_empty() {
                println!("No diary entries found in {}.", path.display());
                return Ok(());
            }

            render(&mut stdout.lock(), &entries, &output)
        }
    }
}

/// Write entries in the requested format
pub fn render<W: Write>(out: &mut W, entries: &[DiaryEntry], output: &OutputArgs) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, entries).context("Failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_diary_csv(&mut *out, entries)?,
        OutputFormat::Stats => render_stats(out, entries, output.min_films, output.tag.as_deref())?,
    }
    Ok(())
}

/// Summary, tag table and optionally a per-tag breakdown
pub fn render_stats<W: Write>(
    out: &mut W,
    entries: &[DiaryEntry],
    min_films: usize,
    tag: Option<&str>,
) -> Result<()> {
    let summary = summarize(entries);

    writeln!(out, "Diary entries: {}", summary.entry_count)?;
    writeln!(out, "Rated films:   {}", summary.rated_titles)?;
    match summary.average_rating {
        Some(avg) => writeln!(out, "Avg rating:    {:.2} ★", avg)?,
        None => writeln!(out, "Avg rating:    -")?,
    }
    writeln!(out, "Unique tags:   {}", summary.unique_tags)?;
    writeln!(out)?;

    if summary.unique_tags == 0 {
        writeln!(out, "No tags found. Tags are only visible when added to diary entries.")?;
        writeln!(out, "Try a deep scan to pick up tags the listing does not show.")?;
        return Ok(());
    }

    let stats = compute_tag_stats(entries, min_films);
    if stats.is_empty() {
        writeln!(out, "No tags with at least {} rated films.", min_films)?;
    } else {
        let width = stats.iter().map(|s| s.tag.chars().count()).max().unwrap_or(3).max(3);
        writeln!(
            out,
            "{:<width$}  {:>5}  {:>5}  {:>6}  {:>6}",
            "Tag", "Films", "Avg", "Median", "vs Avg"
        )?;
        for stat in &stats {
            writeln!(
                out,
                "{:<width$}  {:>5}  {:>5.2}  {:>6.2}  {:>+6.2}",
                stat.tag, stat.films, stat.average, stat.median, stat.vs_average
            )?;
        }
    }

    if let Some(tag) = tag {
        writeln!(out)?;
        render_tag_detail(out, entries, tag)?;
    }

    Ok(())
}

fn render_tag_detail<W: Write>(out: &mut W, entries: &[DiaryEntry], tag: &str) -> Result<()> {
    let films = films_with_tag(entries, tag);
    if films.is_empty() {
        writeln!(out, "No films tagged '{}'.", tag)?;
        return Ok(());
    }

    writeln!(out, "Rating distribution, #{} vs. all films:", tag)?;
    let tagged = rating_distribution(entries, Some(tag));
    let all = rating_distribution(entries, None);
    writeln!(out, "  {:>4}  {:>6}  {:>9}", "★", format!("#{}", tag), "All films")?;
    for (index, (tag_count, all_count)) in tagged.iter().zip(all.iter()).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let stars = (index + 1) as f64 / 2.0;
        writeln!(out, "  {:>4.1}  {:>6}  {:>9}", stars, tag_count, all_count)?;
    }

    writeln!(out)?;
    writeln!(out, "Films tagged '{}':", tag)?;
    for film in films {
        let rating = film.rating.map_or_else(|| "-".to_string(), |r| r.to_string());
        let year = film.year.as_deref().map(|y| format!(" ({})", y)).unwrap_or_default();
        writeln!(out, "  {:>3}  {}{}", rating, film.title, year)?;
    }

    Ok(())
}
