pub mod browser;
pub mod config;
pub mod driver;
pub mod element;
pub mod error;
pub mod extract;
pub mod output;
pub mod page;
pub mod pagination;
pub mod pipeline;
pub mod record;
pub mod resilient;
pub mod utils;
pub mod wait;

pub use browser::ChromiumBrowser;
pub use config::{AdvanceStrategy, AppConfig, BrowserConfig, ScraperConfig, SelectorMap};
pub use driver::{Driver, ElementHandle, ElementId};
pub use error::{Error, Result};
pub use extract::FieldExtractor;
pub use output::{CsvSink, RowSink, WriteMode};
pub use page::ChromiumPage;
pub use pagination::Paginator;
pub use pipeline::{Pipeline, RunStats};
pub use record::ProductRecord;
