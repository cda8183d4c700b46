mod cli;

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FilterArgs};
use vitrine::config::VitrineConfig;
use vitrine::filters::FilterParams;
use vitrine::source::HttpSource;
use vitrine::types::{PricingOption, SortKey};
use vitrine::{LoadOutcome, Vitrine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = VitrineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List { filters, pages, json } => {
            let params = params_from_flags(&filters)?;
            run_list(&config, params, pages, json).await
        }
        Commands::Share { filters } => {
            let params = params_from_flags(&filters)?;
            println!("{}", params.encode());
            Ok(())
        }
    }
}

/// Build the durable filter params from CLI flags, or parse a raw share
/// query when one is given.
fn params_from_flags(flags: &FilterArgs) -> Result<FilterParams> {
    if let Some(query) = &flags.query {
        return Ok(FilterParams::parse(query));
    }

    let mut params = FilterParams::new();
    if let Some(pricing) = &flags.pricing {
        let mut options = Vec::new();
        for name in pricing.split(',') {
            let opt = PricingOption::from_name(name)
                .ok_or_else(|| anyhow!("unknown pricing tier: {name}"))?;
            if !options.contains(&opt) {
                options.push(opt);
            }
        }
        params.set_pricing_options(&options);
    }
    if let Some(search) = &flags.search {
        params.set_search_keyword(search);
    }
    if let Some(sort) = &flags.sort {
        params.set_sort_by(SortKey::parse(sort));
    }
    if let Some(range) = &flags.price_range {
        let (min, max) = range
            .split_once(',')
            .and_then(|(a, b)| Some((a.trim().parse().ok()?, b.trim().parse().ok()?)))
            .ok_or_else(|| anyhow!("price range must be min,max: {range}"))?;
        params.set_price_range((min, max));
    }
    Ok(params)
}

async fn run_list(config: &VitrineConfig, params: FilterParams, pages: u32, json: bool) -> Result<()> {
    let source = HttpSource::new(&config.api_url)?;
    let mut session = Vitrine::with_query(Box::new(source), config, &params.encode());

    session.ensure_initialized().await;
    if let Some(err) = session.error() {
        return Err(anyhow!("initial fetch failed: {err}"));
    }

    // Simulate the scroll loop: keep the sentinel visible until the
    // requested page count is reached or the source runs dry.
    while session.page() < pages && session.has_more() {
        match session.on_sentinel(1.0, Instant::now()).await {
            Some(LoadOutcome::Failed) => {
                let err = session.error().unwrap_or("unknown error");
                return Err(anyhow!("fetch for page {} failed: {err}", session.page() + 1));
            }
            Some(_) => {}
            None => tokio::time::sleep(Duration::from_millis(25)).await,
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&session.visible_cards())?);
        return Ok(());
    }

    for (i, card) in session.visible_cards().iter().enumerate() {
        println!("{:>3}. {}", i + 1, card.line());
    }
    let stats = session.stats();
    println!(
        "{} shown of {} fetched (page {}, {})",
        stats.visible,
        stats.fetched,
        stats.page,
        if stats.has_more { "more available" } else { "end of catalog" }
    );
    Ok(())
}
