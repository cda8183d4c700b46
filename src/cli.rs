use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CLI for browsing the remote catalog with local filtering
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Browse a remote product catalog: filter, search, sort", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch pages through the scroll loader and print the filtered listing
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of pages to pull before printing
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Print cards as JSON instead of text lines
        #[arg(long)]
        json: bool,
    },
    /// Print the shareable query string for the given filter flags
    Share {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    /// Comma-separated pricing tiers: paid,free,view-only
    #[arg(long)]
    pub pricing: Option<String>,

    /// Keyword matched against creator and title
    #[arg(long)]
    pub search: Option<String>,

    /// Sort order: title, price-high or price-low
    #[arg(long)]
    pub sort: Option<String>,

    /// Inclusive price range as min,max (applies while paid is selected)
    #[arg(long = "price-range")]
    pub price_range: Option<String>,

    /// Restore filters from a share query string instead of flags
    #[arg(long, conflicts_with_all = ["pricing", "search", "sort", "price_range"])]
    pub query: Option<String>,
}
