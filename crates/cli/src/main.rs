mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petfood_core::{
    extract_info, load_config, load_config_from_env, metrics, validate_config, Config,
    ConfigError, DictionaryStore, FoodCatalog, IngestPipeline, IngestReport, NaverSearcher,
    SanitizedConfig, SearchRequest, ShoppingSearcher, SqliteCatalog,
};

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load(&cli.config)?;

    match cli.command {
        Commands::Run { max, keep_db } => run_three_track(&config, max, keep_db).await?,
        Commands::Fetch { max, query, reset } => fetch(&config, &query, max, reset).await?,
        Commands::Init { drop } => init(&config, drop)?,
        Commands::Stats { limit } => stats(&config, limit)?,
        Commands::Search {
            query,
            display,
            sort,
        } => search(&config, &query, display, sort).await?,
    }

    if let Some(path) = &cli.metrics_out {
        let rendered = metrics::render_metrics().context("Failed to render metrics")?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write metrics to {:?}", path))?;
        info!("Metrics written to {:?}", path);
    }

    Ok(())
}

fn load(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    let config = match load_config(path) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) => {
            warn!("Config file {:?} not found, using defaults and environment", path);
            load_config_from_env().context("Failed to load config from environment")?
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to load config from {:?}", path)),
    };

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        client_id_configured = sanitized.naver.client_id_configured,
        client_secret_configured = sanitized.naver.client_secret_configured,
        database = ?sanitized.database.path,
        dictionary = ?sanitized.dictionary.path,
        "Configuration loaded"
    );
    Ok(config)
}

fn open_catalog(config: &Config) -> Result<SqliteCatalog> {
    SqliteCatalog::new(&config.database.path)
        .with_context(|| format!("Failed to open database {:?}", config.database.path))
}

fn create_searcher(config: &Config) -> Result<NaverSearcher> {
    let searcher =
        NaverSearcher::new(config.naver.clone()).context("Failed to create search client")?;
    searcher
        .check_credentials()
        .context("Set NAVER_CLIENT_ID and NAVER_CLIENT_SECRET")?;
    Ok(searcher)
}

async fn run_three_track(config: &Config, max: Option<u32>, keep_db: bool) -> Result<()> {
    let searcher = create_searcher(config)?;
    let catalog = open_catalog(config)?;
    if !keep_db {
        catalog.reset().context("Failed to reset database")?;
        info!("Database schema recreated");
    }

    let mut run_config = config.clone();
    if let Some(max) = max {
        run_config.fetch.max_results = max;
    }

    let store = DictionaryStore::new(&config.dictionary.path);
    let mut dictionary = store.load();

    let pipeline = IngestPipeline::new(&searcher, &catalog, &run_config);
    let report = pipeline
        .run_three_track(&mut dictionary, &store)
        .await
        .context("3-track ingest failed")?;

    print_report(&report)?;
    print_stats(&catalog, 5)
}

async fn fetch(config: &Config, query: &str, max: u32, reset: bool) -> Result<()> {
    let searcher = create_searcher(config)?;
    let catalog = open_catalog(config)?;
    if reset {
        let removed = catalog.clear_foods().context("Failed to clear foods")?;
        info!(removed = removed, "Cleared stored foods");
    }

    let dictionary = DictionaryStore::new(&config.dictionary.path).load();
    let pipeline = IngestPipeline::new(&searcher, &catalog, config);
    let report = pipeline
        .run_single_query(query, max, &dictionary)
        .await
        .context("Single-query ingest failed")?;

    print_report(&report)?;
    print_stats(&catalog, 5)
}

fn init(config: &Config, drop: bool) -> Result<()> {
    let catalog = open_catalog(config)?;
    if drop {
        catalog.reset().context("Failed to recreate schema")?;
        info!("Dropped and recreated tables");
    }
    info!("Database ready at {:?}", config.database.path);
    Ok(())
}

fn stats(config: &Config, limit: u32) -> Result<()> {
    if !config.database.path.exists() {
        bail!("Database {:?} does not exist, run `petfood init` first", config.database.path);
    }
    let catalog = open_catalog(config)?;
    print_stats(&catalog, limit)
}

async fn search(
    config: &Config,
    query: &str,
    display: u32,
    sort: petfood_core::SortMode,
) -> Result<()> {
    let searcher = create_searcher(config)?;
    let request = SearchRequest::new(query).display(display).sort(sort);
    let items = searcher.search(&request).await.context("Search failed")?;

    let extracted: Vec<_> = items.iter().map(extract_info).collect();
    println!("{}", serde_json::to_string_pretty(&extracted)?);
    info!(query = query, results = extracted.len(), "Search complete");
    Ok(())
}

fn print_report(report: &IngestReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_stats(catalog: &SqliteCatalog, limit: u32) -> Result<()> {
    let stats = catalog.stats().context("Failed to read catalog stats")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    for food in catalog.recent_foods(limit).context("Failed to read foods")? {
        println!(
            "- [{}] {} ({}) {}",
            food.brand.as_deref().unwrap_or("-"),
            food.name,
            food.category,
            food.min_price
                .map(|p| format!("{:.0}원", p))
                .unwrap_or_default()
        );
    }
    Ok(())
}
