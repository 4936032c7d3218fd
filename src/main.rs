use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fan_scraper::config::{AdvanceStrategy, AppConfig, BrowserBuilder};
use fan_scraper::output::{default_output_path, CsvSink, WriteMode};
use fan_scraper::pipeline::Pipeline;
use fan_scraper::utils::Timer;

#[derive(Parser)]
#[command(
    name = "fan-scraper",
    about = "Collect product specs from a paginated catalog into CSV",
    version
)]
struct Cli {
    /// Extra TOML/YAML/JSON config file layered over config/default.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog listing page to start from
    #[arg(long, env = "FAN_SCRAPER_START_URL")]
    start_url: Option<String>,

    /// Output CSV path (default: tmp/fans_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append to the output file instead of replacing it
    #[arg(long)]
    append: bool,

    /// Upper bound for each click or wait, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// How the catalog reveals more products
    #[arg(long, value_enum)]
    strategy: Option<AdvanceStrategy>,

    /// Stop after this many listing pages
    #[arg(long)]
    max_pages: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Chrome/Chromium executable to launch
    #[arg(long)]
    chrome_path: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

impl Cli {
    /// Command-line flags win over every config source.
    fn apply(&self, config: &mut AppConfig) {
        let scraper = &mut config.scraper;
        if let Some(url) = &self.start_url {
            scraper.start_url = url.clone();
        }
        if let Some(output) = &self.output {
            scraper.output = Some(output.clone());
        }
        if self.append {
            scraper.append = true;
        }
        if let Some(secs) = self.timeout_secs {
            scraper.action_timeout_secs = secs;
        }
        if let Some(strategy) = self.strategy {
            scraper.strategy = strategy;
        }
        if let Some(max) = self.max_pages {
            scraper.max_pages = max;
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(path) = &self.chrome_path {
            config.browser.chrome_path = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let started_at = Local::now().naive_local();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "fan_scraper=info,warn",
        1 => "fan_scraper=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.scraper.validate().context("Invalid configuration")?;

    let output = config
        .scraper
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(started_at));
    let mode = if config.scraper.append {
        WriteMode::Append
    } else {
        WriteMode::Truncate
    };

    let _t = Timer::start("Catalog scrape");

    let browser = BrowserBuilder::from_config(config.browser.clone())
        .build()
        .await
        .context("Failed to launch browser")?;
    let page = browser.new_page().await.context("Failed to open a tab")?;

    let mut sink = CsvSink::open(&output, mode)
        .with_context(|| format!("Failed to open output file {:?}", output))?;

    let result = Pipeline::new(&page, &config.scraper).run(&mut sink).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close tab: {e}");
    }
    if let Err(e) = browser.close().await {
        warn!("Failed to shut down browser: {e}");
    }

    let stats = result.context("Scrape aborted")?;
    info!(
        "Wrote {} rows ({} incomplete) to {:?}",
        stats.records_written,
        stats.incomplete_records,
        sink.path()
    );
    Ok(())
}
