use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use commands::correlations::CorrelationsRequest;
use config::AppConfig;
use covariates::Covariate;
use dump_client::{Geocoder, PhotoFetcher};
use dump_correlate::DEFAULT_REPORT_LIMIT;
use dump_store::{Database, DirDatabase};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod config;
mod covariates;
mod report;

#[derive(Parser)]
#[command(name = "profile-dump")]
#[command(about = "Scan dating profiles and find the words that set groups apart", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML config file (store paths, HTTP and scan settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an api file from a HAR capture read on stdin
    #[command(name = "generate-api")]
    GenerateApi,

    /// Dump profiles from random locations as JSON lines on stdout
    Scan(ScanArgs),

    /// Store JSON-lines profiles from stdin and download their photos
    Ingest,

    /// Report the bio words most correlated with profile properties
    Correlations(CorrelationsArgs),

    /// Count stored users per location
    Locations,

    /// Geocode user locations that are not stored yet
    #[command(name = "find-locations")]
    FindLocations,
}

#[derive(Args)]
struct ScanArgs {
    /// Api file written by `generate-api`
    api: PathBuf,

    /// Profiles to collect before moving to a new location (at least 1)
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    per_location: Option<usize>,
}

#[derive(Args)]
struct CorrelationsArgs {
    /// country:<code>, gender:male, gender:female, under-24, over-40,
    /// over-six-foot or zodiac; repeatable (default: all)
    #[arg(long = "covariate", short = 'c')]
    covariates: Vec<Covariate>,

    /// Words listed per covariate
    #[arg(long, default_value_t = DEFAULT_REPORT_LIMIT)]
    limit: usize,

    /// Words left out of the report (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::GenerateApi => commands::generate_api::run()?,
        Commands::Scan(args) => {
            commands::scan::run(&args.api, args.per_location, &config.client, &config.scan)
                .await?
        }
        Commands::Ingest => {
            let db: Arc<dyn Database> = Arc::new(open_store(&config)?);
            let fetcher = PhotoFetcher::new(&config.client)?;
            commands::ingest::run(std::io::stdin(), db, fetcher, &config.scan).await?;
        }
        Commands::Correlations(args) => {
            let db = open_store(&config)?;
            commands::correlations::run(
                &db,
                CorrelationsRequest {
                    covariates: args.covariates,
                    limit: args.limit,
                    ignore: args.ignore,
                    json: args.json,
                },
            )?
        }
        Commands::Locations => commands::locations::count(&open_store(&config)?)?,
        Commands::FindLocations => {
            let db = open_store(&config)?;
            let geocoder = Geocoder::new(&config.client)?;
            commands::locations::find(&db, &geocoder).await?
        }
    }
    Ok(())
}

fn open_store(config: &AppConfig) -> Result<DirDatabase> {
    DirDatabase::open(config.store.clone()).with_context(|| {
        format!(
            "Failed to open profile store at {}",
            config.store.root.display()
        )
    })
}
