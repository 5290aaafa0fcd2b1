use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    /// Stored independently of `change`; the two can disagree after a refresh.
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: String,
    pub sector: String,
}

impl StockRecord {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.symbol.to_lowercase().contains(&term) || self.name.to_lowercase().contains(&term)
    }
}

impl AsRef<StockRecord> for StockRecord {
    fn as_ref(&self) -> &StockRecord {
        self
    }
}

/// Lookup view of a single stock with generated fundamentals.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    #[serde(flatten)]
    pub stock: StockRecord,
    pub year_high: f64,
    pub year_low: f64,
    pub pe: f64,
    pub eps: f64,
    pub dividend: Option<f64>,
    pub beta: f64,
    pub avg_volume: u64,
    pub description: String,
}
