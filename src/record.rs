use serde::Serialize;

/// Placeholder written for any field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column titles of the output file, in row order.
pub const CSV_HEADERS: [&str; 5] = [
    "Name",
    "Price ($)",
    "Air Extraction Rate (m3h)",
    "Decibel Level (dBA)",
    "URL",
];

/// One product page reduced to the fields we export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub air_extraction_rate: String,
    pub decibel_level: String,
    pub url: String,
}

impl ProductRecord {
    /// Field values in [`CSV_HEADERS`] order.
    pub fn to_row(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.price.as_str(),
            self.air_extraction_rate.as_str(),
            self.decibel_level.as_str(),
            self.url.as_str(),
        ]
    }
}
