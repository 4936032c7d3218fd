//! Product detail page → [`ProductRecord`].
//!
//! Every field is read independently; a missing or malformed element costs
//! that one field ("N/A"), never the record.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{HeaderAliases, ScraperConfig, SelectorMap};
use crate::driver::{Driver, ElementHandle};
use crate::error::Result;
use crate::record::{ProductRecord, NOT_AVAILABLE};
use crate::resilient::recover;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("number pattern is valid"));

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Round half away from zero and render without a fractional part.
/// 87.6 → Some("88") | 123.4 → Some("123") | inf → None
pub fn round_to_string(value: f64) -> Option<String> {
    value.is_finite().then(|| format!("{:.0}", value.round()))
}

/// Keep only digits and dots, then parse and round.
/// "$1,299.95" → Some("1300") | "Call us" → None
pub fn parse_price(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok().and_then(round_to_string)
}

/// First run of digits (with an optional fractional part) in `text`, rounded.
/// "123.4 m³/h" → Some("123") | "approx. 40-45 dBA" → Some("40") | "-" → None
pub fn first_number(text: &str) -> Option<String> {
    let m = NUMBER.find(text)?;
    m.as_str().parse::<f64>().ok().and_then(round_to_string)
}

/// Position of the header matched by the highest-priority alias.
///
/// Aliases are tried in order and the first one present anywhere in `headers`
/// wins, even if a lower-priority alias occurs earlier in the table.
pub fn header_position<S: AsRef<str>>(headers: &[S], aliases: &[S]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|header| header.as_ref() == alias.as_ref())
    })
}

// ── Spec table ──────────────────────────────────────────────────────────────

/// The product's specification list: two index-aligned columns of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecTable {
    pub headers: Vec<String>,
    pub values: Vec<String>,
}

impl SpecTable {
    pub fn new(headers: Vec<String>, values: Vec<String>) -> Self {
        Self { headers, values }
    }

    /// Read both columns from the current page in one go.
    pub async fn read<D: Driver>(driver: &D, selectors: &SelectorMap) -> Result<Self> {
        let headers = read_column(driver, &selectors.spec_row_header).await?;
        let values = read_column(driver, &selectors.spec_row_value).await?;
        Ok(Self { headers, values })
    }

    /// Numeric value of the row named by one of `aliases`, or "N/A".
    pub fn resolve_numeric<S: AsRef<str>>(&self, aliases: &[S]) -> String {
        let aliases: Vec<&str> = aliases.iter().map(|a| a.as_ref()).collect();
        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();

        header_position(&headers[..], &aliases[..])
            .and_then(|i| self.values.get(i))
            .and_then(|cell| first_number(cell))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Texts of every element matching `selector`. An unreadable cell becomes an
/// empty string so the column keeps its positions.
async fn read_column<D: Driver>(driver: &D, selector: &str) -> Result<Vec<String>> {
    let elements = recover(driver.query_all(selector).await)?.unwrap_or_default();

    let mut texts = Vec::with_capacity(elements.len());
    for el in &elements {
        let text = recover(el.text().await)?.unwrap_or_default();
        texts.push(text.trim().to_string());
    }
    Ok(texts)
}

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct FieldExtractor<'a, D: Driver> {
    driver: &'a D,
    selectors: &'a SelectorMap,
    aliases: &'a HeaderAliases,
}

impl<'a, D: Driver> FieldExtractor<'a, D> {
    pub fn new(driver: &'a D, config: &'a ScraperConfig) -> Self {
        Self {
            driver,
            selectors: &config.selectors,
            aliases: &config.aliases,
        }
    }

    /// Open `url` and pull out every exported field.
    ///
    /// Only a failed navigation or a broken browser session is an error.
    pub async fn extract(&self, url: &str) -> Result<ProductRecord> {
        self.driver.navigate(url).await?;

        let name = self
            .read_text(&self.selectors.name)
            .await?
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let price = self
            .read_text(&self.selectors.price)
            .await?
            .and_then(|text| parse_price(&text))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let table = SpecTable::read(self.driver, self.selectors).await?;

        Ok(ProductRecord {
            name,
            price,
            air_extraction_rate: table.resolve_numeric(&self.aliases.air_extraction_rate),
            decibel_level: table.resolve_numeric(&self.aliases.decibel_level),
            url: url.to_string(),
        })
    }

    /// Trimmed text of the first match, `None` if absent, unreadable or blank.
    async fn read_text(&self, selector: &str) -> Result<Option<String>> {
        let Some(el) = recover(self.driver.query_one(selector).await)?.flatten() else {
            return Ok(None);
        };
        let text = recover(el.text().await)?.unwrap_or_default();
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}
