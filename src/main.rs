use crate::config::Config;
use crate::domain::Listing;
use crate::pipeline::{run_cycle, CycleReport, IdentityResolver, RentStats};
use crate::publish::{export_all, ExportTargets, GitPublisher, PublishOutcome};
use crate::scraper::{Portal, PortalScraper, ScrapeSettings};
use crate::store::{CorpusStore, JsonCorpusStore, MemoryCorpusStore};
use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod domain;
mod errors;
mod pipeline;
mod publish;
mod scraper;
mod store;

#[cfg(test)]
mod tests;

/// Veille immobilière Genève: collect rental listings, merge them into the
/// corpus, rank, export and push for the static site.
#[derive(Parser, Debug)]
#[command(name = "immo-watch")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus file, relative to IMMO_REPO_DIR (overrides IMMO_DATA_FILE).
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// CSV export file, relative to IMMO_REPO_DIR (overrides IMMO_CSV_FILE).
    #[arg(long, global = true, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Also export an XLSX workbook (overrides IMMO_XLSX_FILE).
    #[arg(long, global = true, value_name = "PATH")]
    xlsx: Option<PathBuf>,

    /// Skip the git commit and push.
    #[arg(long, global = true)]
    no_publish: bool,

    /// Run the cycle in memory: nothing is saved, exported or pushed.
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the portals, merge into the corpus, export and publish.
    Scrape,
    /// Merge a JSON batch of new listings into the corpus, export and publish.
    Merge {
        /// Batch file (JSON array of listings).
        #[arg(value_name = "INCOMING")]
        incoming: PathBuf,
    },
    /// Re-export the current corpus without merging anything.
    Export,
    /// Print rent statistics for the current corpus.
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // 1️⃣ Settings: environment first, flags on top
    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(path) = &cli.data {
        config.data_file = config.in_repo(path);
    }
    if let Some(path) = &cli.csv {
        config.csv_file = config.in_repo(path);
    }
    if let Some(path) = &cli.xlsx {
        config.xlsx_file = Some(config.in_repo(path));
    }

    info!(
        started = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        rent = %format!("{}-{} CHF", config.criteria.rent_min, config.criteria.rent_max),
        rooms = %format!("{}-{}", config.criteria.rooms_min, config.criteria.rooms_max),
        "veille immobilière Genève"
    );

    let store = JsonCorpusStore::new(&config.data_file);

    // 2️⃣ Dispatch
    match &cli.command {
        Commands::Scrape => {
            let settings = ScrapeSettings {
                max_per_portal: config.max_per_portal,
                ..ScrapeSettings::default()
            };
            let scraper = PortalScraper::new(settings)?;
            let batch = scraper.scrape_all(&Portal::ALL, &config.criteria);
            process_batch(&cli, &config, &store, batch)
        }
        Commands::Merge { incoming } => {
            // A missing batch file is just an empty batch.
            let batch = JsonCorpusStore::new(incoming)
                .load()
                .with_context(|| format!("failed to read batch {}", incoming.display()))?;
            process_batch(&cli, &config, &store, batch)
        }
        Commands::Export => {
            let listings = store.load()?;
            publish(&cli, &config, &listings)
        }
        Commands::Stats => {
            let listings = store.load()?;
            report_stats(&listings);
            Ok(())
        }
    }
}

fn process_batch(
    cli: &Cli,
    config: &Config,
    store: &JsonCorpusStore,
    batch: Vec<Listing>,
) -> anyhow::Result<()> {
    let resolver = IdentityResolver::new(config.preferred_source.clone());

    if cli.dry_run {
        let scratch = MemoryCorpusStore::new(store.load()?);
        let report = run_cycle(&scratch, batch, &config.criteria, &resolver)?;
        summarize(&report);
        info!("dry run: corpus, exports and remote left untouched");
        return Ok(());
    }

    // 3️⃣ Filter, merge, rank, save. A failed save fails the run.
    let report = run_cycle(store, batch, &config.criteria, &resolver)
        .context("corpus could not be saved")?;
    summarize(&report);

    // 4️⃣ Exports and push
    publish(cli, config, &report.listings)
}

fn publish(cli: &Cli, config: &Config, listings: &[Listing]) -> anyhow::Result<()> {
    if cli.dry_run {
        info!("dry run: nothing exported");
        return Ok(());
    }

    let targets = ExportTargets {
        csv: config.csv_file.clone(),
        xlsx: config.xlsx_file.clone(),
    };
    let mut paths = vec![config.data_file.clone()];
    paths.extend(export_all(listings, &targets)?);

    if cli.no_publish {
        info!("publication disabled");
        return Ok(());
    }

    let publisher = GitPublisher::new(&config.repo_dir, &config.git_remote, &config.git_branch);
    match publisher.publish(&paths, &Local::now()) {
        PublishOutcome::Pushed => info!("✅ pushed, the site will redeploy"),
        PublishOutcome::Skipped => {}
        PublishOutcome::Failed(reason) => warn!(%reason, "⚠️ corpus saved but not pushed"),
    }
    Ok(())
}

fn summarize(report: &CycleReport) {
    info!(
        raw = report.raw,
        accepted = report.accepted,
        existing = report.existing,
        duplicates_dropped = report.duplicates_dropped,
        total = report.total(),
        "run summary"
    );
    report_stats(&report.listings);
}

fn report_stats(listings: &[Listing]) {
    match RentStats::from_listings(listings) {
        Some(stats) => info!(listings = listings.len(), "{stats}"),
        None => info!(listings = listings.len(), "no readable rents"),
    }
}
