//! Orchestrator: listing walk → product pages → CSV rows.
//!
//! 1. Write the header, so even an empty catalog leaves a valid file.
//! 2. Collect every product URL across the listing (deduplicated).
//! 3. Visit each URL in order, extract its fields, write one row.
//!
//! Everything happens on one browser tab, one page at a time.

use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::driver::Driver;
use crate::error::Result;
use crate::extract::FieldExtractor;
use crate::output::RowSink;
use crate::pagination::Paginator;
use crate::record::{ProductRecord, CSV_HEADERS, NOT_AVAILABLE};

pub struct Pipeline<'a, D: Driver> {
    driver: &'a D,
    config: &'a ScraperConfig,
}

impl<'a, D: Driver> Pipeline<'a, D> {
    pub fn new(driver: &'a D, config: &'a ScraperConfig) -> Self {
        Self { driver, config }
    }

    pub async fn run<S: RowSink>(&self, sink: &mut S) -> Result<RunStats> {
        sink.write_header(&CSV_HEADERS)?;

        info!("=== Step 1: Collecting product links ===");
        let urls = Paginator::new(self.driver, self.config).collect().await?;

        info!("=== Step 2: Extracting {} products ===", urls.len());
        let extractor = FieldExtractor::new(self.driver, self.config);
        let mut stats = RunStats {
            products_found: urls.len(),
            ..RunStats::default()
        };

        for (i, url) in urls.iter().enumerate() {
            let record = extractor.extract(url).await?;
            report(i + 1, urls.len(), &record);

            sink.write_row(&record.to_row())?;
            stats.records_written += 1;
            if record.to_row().contains(&NOT_AVAILABLE) {
                stats.incomplete_records += 1;
            }
        }

        sink.finish()?;

        info!(
            "=== Done: {} products | {} rows | {} with missing fields ===",
            stats.products_found, stats.records_written, stats.incomplete_records
        );
        Ok(stats)
    }
}

fn report(n: usize, total: usize, record: &ProductRecord) {
    info!("[{}/{}] Name: {}", n, total, record.name);
    info!("  Price: {}", record.price);
    info!("  Air Extraction Rate: {}", record.air_extraction_rate);
    info!("  Decibel Level: {}", record.decibel_level);
    info!("  URL: {}", record.url);
    debug!(
        "record {}",
        serde_json::to_string(record).unwrap_or_else(|e| e.to_string())
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub products_found: usize,
    pub records_written: usize,
    /// Rows where at least one field fell back to "N/A".
    pub incomplete_records: usize,
}
