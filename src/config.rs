use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::ChromiumBrowser;
use crate::error::{Error, Result};

// ── Browser ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
    /// Upper bound on a single CDP request (navigation included), in seconds.
    pub request_timeout_secs: u64,
}

impl BrowserConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
            request_timeout_secs: 30,
        }
    }
}

pub struct BrowserBuilder {
    config: BrowserConfig,
}

impl BrowserBuilder {
    pub fn new() -> Self {
        Self {
            config: BrowserConfig::default(),
        }
    }

    pub fn from_config(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set the upper bound for a single browser request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn build_config(self) -> BrowserConfig {
        self.config
    }

    pub async fn build(self) -> Result<ChromiumBrowser> {
        ChromiumBrowser::launch(self.build_config()).await
    }
}

impl Default for BrowserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Scraper ─────────────────────────────────────────────────────────────────

/// How the catalog reveals more products after the first batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AdvanceStrategy {
    /// Click a "next page" control; the product list is replaced.
    NextButton,
    /// Click a "load more" control; the product list grows in place.
    LoadMore,
    /// Scroll to the bottom; the product list grows in place.
    InfiniteScroll,
    /// Everything is on the first page.
    None,
}

impl AdvanceStrategy {
    /// Whether advancing appends to the existing list rather than replacing it.
    pub fn grows_in_place(self) -> bool {
        matches!(self, AdvanceStrategy::LoadMore | AdvanceStrategy::InfiniteScroll)
    }
}

/// CSS selectors for every element the scraper touches, keyed by role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorMap {
    pub name: String,
    pub price: String,
    pub next_button: String,
    pub close_button: String,
    pub product_link: String,
    pub spec_row_header: String,
    pub spec_row_value: String,
    pub load_more_button: String,
}

impl SelectorMap {
    fn roles(&self) -> [(&'static str, &str); 8] {
        [
            ("name", self.name.as_str()),
            ("price", self.price.as_str()),
            ("next_button", self.next_button.as_str()),
            ("close_button", self.close_button.as_str()),
            ("product_link", self.product_link.as_str()),
            ("spec_row_header", self.spec_row_header.as_str()),
            ("spec_row_value", self.spec_row_value.as_str()),
            ("load_more_button", self.load_more_button.as_str()),
        ]
    }
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            name: "h1".into(),
            price: ".single-product-summary__total-price".into(),
            next_button: ".next-button".into(),
            close_button: "button.close".into(),
            product_link: ".product-card > a".into(),
            spec_row_header: ".single-product-specs__row-header".into(),
            spec_row_value: ".single-product-specs__row-value".into(),
            load_more_button: ".load-more-button".into(),
        }
    }
}

/// Spec-table header labels accepted for each numeric field, highest priority
/// first. The site has renamed these headers several times.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderAliases {
    pub air_extraction_rate: Vec<String>,
    pub decibel_level: Vec<String>,
}

impl Default for HeaderAliases {
    fn default() -> Self {
        Self {
            air_extraction_rate: [
                "Air Extraction (m3/hr)",
                "Air Extraction Rate",
                "Air Extraction",
                "Air Extraction (m³/h)",
                "Air Extraction (m³H)",
                "Air Extraction (m3H)",
                "Air Extraction (m3/h)",
                "Air Extraction (m³/hr)",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            decibel_level: ["Decibel Rating", "Decibel Level", "Decibel"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub start_url: String,

    /// Output CSV; a timestamped file under `tmp/` when unset.
    pub output: Option<PathBuf>,

    /// Append to `output` instead of truncating it.
    pub append: bool,

    pub action_timeout_secs: u64,

    /// How long to look for a dismissable overlay on the first page.
    pub overlay_timeout_secs: u64,

    pub poll_interval_ms: u64,

    pub strategy: AdvanceStrategy,

    /// Stop collecting after this many listing pages.
    pub max_pages: usize,

    pub selectors: SelectorMap,

    pub aliases: HeaderAliases,
}

impl ScraperConfig {
    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.action_timeout_secs)
    }

    pub fn overlay_timeout(&self) -> Duration {
        Duration::from_secs(self.overlay_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject configurations the scraper cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.start_url.trim().is_empty() {
            return Err(Error::Config("start_url is empty".into()));
        }
        if self.action_timeout_secs == 0 {
            return Err(Error::Config("action_timeout_secs must be positive".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be positive".into()));
        }
        if self.max_pages == 0 {
            return Err(Error::Config("max_pages must be positive".into()));
        }
        for (role, selector) in self.selectors.roles() {
            if selector.trim().is_empty() {
                return Err(Error::Config(format!("selector for `{role}` is empty")));
            }
        }
        if self.aliases.air_extraction_rate.is_empty() || self.aliases.decibel_level.is_empty() {
            return Err(Error::Config("header alias lists must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.ceilingfansdirect.com.au/category/exhaust-fans-170".into(),
            output: None,
            append: false,
            action_timeout_secs: 10,
            overlay_timeout_secs: 10,
            poll_interval_ms: 100,
            strategy: AdvanceStrategy::NextButton,
            max_pages: 200,
            selectors: SelectorMap::default(),
            aliases: HeaderAliases::default(),
        }
    }
}

// ── Loader ──────────────────────────────────────────────────────────────────

/// Top-level configuration: what to scrape and how to launch the browser.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub browser: BrowserConfig,
}

impl AppConfig {
    /// Layer `config/default.toml`, `config/local.toml`, an optional explicit
    /// file, then `FAN_SCRAPER__*` environment variables over the defaults.
    ///
    /// Not validated here: command-line overrides still have to be applied.
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            );

        if let Some(path) = extra {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let cfg = builder
            .add_source(config::Environment::with_prefix("FAN_SCRAPER").separator("__"))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}
