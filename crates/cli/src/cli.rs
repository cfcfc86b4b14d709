use std::path::PathBuf;

use clap::{Parser, Subcommand};
use petfood_core::SortMode;

/// Command line interface for the pet food ingestion pipeline.
#[derive(Parser, Debug)]
#[command(name = "petfood")]
#[command(about = "Collect, normalize and store cat food listings from shopping search")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "PETFOOD_CONFIG",
        default_value = "config.toml",
        help = "Configuration file (missing file falls back to defaults and environment)"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        global = true,
        help = "Write Prometheus metrics to this file after the command"
    )]
    pub metrics_out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full 3-track collection and store the results.
    Run {
        #[arg(long, help = "Results fetched per brand and per price band")]
        max: Option<u32>,

        #[arg(long, help = "Keep existing tables instead of recreating them")]
        keep_db: bool,
    },

    /// Fetch a single query without post-filters and store the results.
    Fetch {
        #[arg(long, default_value_t = 1000, help = "Maximum results to fetch")]
        max: u32,

        #[arg(long, default_value = "고양이 사료", help = "Search query")]
        query: String,

        #[arg(long, help = "Delete stored foods before fetching")]
        reset: bool,
    },

    /// Create the database schema.
    Init {
        #[arg(long, help = "Drop existing tables first")]
        drop: bool,
    },

    /// Print catalog statistics and recently stored foods.
    Stats {
        #[arg(long, default_value_t = 10, help = "Number of recent foods to show")]
        limit: u32,
    },

    /// Run one raw search call and print the extracted items.
    Search {
        #[arg(help = "Search query")]
        query: String,

        #[arg(long, default_value_t = 10, help = "Results per page (1-100)")]
        display: u32,

        #[arg(
            long,
            default_value = "sim",
            help = "Sort order: sim, date, asc or dsc"
        )]
        sort: SortMode,
    },
}
