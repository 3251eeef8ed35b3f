mod config;
mod console;

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use services::{CatalogIndex, QuizLoopService, QuizSession};
use storage::DirectoryCatalog;
use storage::repository::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::QuizSettings;
use crate::console::ConsoleSink;

#[derive(Debug, Parser)]
#[command(name = "flag-quiz", version, about = "Guess the country from its flag")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Extra TOML settings file, applied after ./flagquiz.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Asset directory laid out as <Region>/<Region>-<Name>.png.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Comma-separated regions to draw from.
    #[arg(short, long, value_delimiter = ',')]
    regions: Vec<String>,

    /// Choices per question (2, 4, 6 or 8).
    #[arg(short, long)]
    choices: Option<usize>,

    /// Questions per round.
    #[arg(short = 'n', long)]
    questions: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Play rounds until you stop (default).
    Play,
    /// List regions and how many flags each holds.
    Regions,
}

impl Cli {
    fn apply(&self, settings: &mut QuizSettings) {
        if let Some(dir) = &self.catalog {
            settings.catalog_dir = Some(dir.clone());
        }
        if !self.regions.is_empty() {
            settings.regions.clone_from(&self.regions);
        }
        if let Some(choices) = self.choices {
            settings.choices = choices;
        }
        if let Some(questions) = self.questions {
            settings.questions = questions;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_regions(catalog: &CatalogIndex) -> anyhow::Result<()> {
    let regions = catalog.regions_available();
    if regions.is_empty() {
        println!("No regions with flags found.");
        return Ok(());
    }
    for region in regions {
        let count = catalog.identifiers(&BTreeSet::from([region.clone()]))?.len();
        println!("{:<20} {count:>4}", region.display_name());
    }
    Ok(())
}

/// One line from stdin, `None` at end of input. The stdin lock is released
/// before returning.
fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

async fn play(mut quiz: QuizLoopService) -> anyhow::Result<()> {
    let mut sink = ConsoleSink::new(io::stdout());
    let mut first_round = true;

    loop {
        if !first_round {
            if let Err(err) = quiz.refresh_catalog().await {
                warn!(error = %err, "catalog refresh failed; keeping previous flags");
            }
        }
        first_round = false;

        quiz.start_round(&mut sink)
            .context("could not start a round")?;

        while !quiz.session().is_round_complete() {
            sink.prompt();
            let Some(line) = read_line()? else {
                return Ok(());
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                return Ok(());
            }
            match sink.resolve(line) {
                Ok(name) => {
                    quiz.answer(&name, &mut sink)?;
                }
                Err(rejection) => sink.reject(&rejection),
            }
        }

        sink.ask_reset();
        let Some(line) = read_line()? else {
            return Ok(());
        };
        if matches!(line.trim().to_ascii_lowercase().as_str(), "n" | "no" | "q") {
            return Ok(());
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings =
        QuizSettings::load(cli.config.as_deref()).context("failed to load settings")?;
    cli.apply(&mut settings);

    let storage = match &settings.catalog_dir {
        Some(dir) => {
            let assets = DirectoryCatalog::new(dir).with_extension(&settings.catalog_extension);
            info!(
                path = %assets.root().display(),
                extension = %settings.catalog_extension,
                "using asset directory"
            );
            Storage::directory(assets)
        }
        None => Storage::sample().context("bundled catalog is invalid")?,
    };
    let catalog = CatalogIndex::load(Arc::clone(&storage.catalog))
        .await
        .context("failed to load the flag catalog")?;
    info!(
        regions = catalog.regions_available().len(),
        items = catalog.item_count(),
        "catalog loaded"
    );

    match cli.command.unwrap_or(Command::Play) {
        Command::Regions => print_regions(&catalog),
        Command::Play => {
            let session = settings
                .seed
                .map_or_else(QuizSession::new, QuizSession::with_seed);
            let draft = settings.round_draft().context("invalid region setting")?;
            play(QuizLoopService::new(Arc::new(catalog), session).with_config(draft)).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli).await
}
