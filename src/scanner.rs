//! Stock screener: text search plus sector, price and volume bands.

use serde::{Deserialize, Serialize};

use crate::models::StockRecord;

pub const ALL_SECTORS: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under50")]
    Under50,
    #[serde(rename = "50to200")]
    From50To200,
    #[serde(rename = "over200")]
    Over200,
}

impl PriceRange {
    pub fn contains(self, price: f64) -> bool {
        match self {
            PriceRange::All => true,
            PriceRange::Under50 => price < 50.0,
            PriceRange::From50To200 => (50.0..=200.0).contains(&price),
            PriceRange::Over200 => price > 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeBand {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl VolumeBand {
    pub fn contains(self, volume: u64) -> bool {
        match self {
            VolumeBand::All => true,
            VolumeBand::High => volume > 30_000_000,
            VolumeBand::Medium => (10_000_000..=30_000_000).contains(&volume),
            VolumeBand::Low => volume < 10_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanCriteria {
    pub search: String,
    pub sector: String,
    pub price: PriceRange,
    pub volume: VolumeBand,
}

impl Default for ScanCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            sector: ALL_SECTORS.to_string(),
            price: PriceRange::All,
            volume: VolumeBand::All,
        }
    }
}

impl ScanCriteria {
    pub fn matches(&self, stock: &StockRecord) -> bool {
        let sector_ok = self.sector == ALL_SECTORS || stock.sector == self.sector;
        stock.matches_search(&self.search)
            && sector_ok
            && self.price.contains(stock.price)
            && self.volume.contains(stock.volume)
    }
}

pub fn scan(stocks: &[StockRecord], criteria: &ScanCriteria) -> Vec<StockRecord> {
    stocks
        .iter()
        .filter(|s| criteria.matches(s))
        .cloned()
        .collect()
}

/// Distinct sectors in first-seen order.
pub fn sectors(stocks: &[StockRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for stock in stocks {
        if !seen.contains(&stock.sector) {
            seen.push(stock.sector.clone());
        }
    }
    seen
}
