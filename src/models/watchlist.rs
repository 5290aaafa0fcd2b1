use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StockRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub stock: StockRecord,
    pub alerts: u32,
}

impl WatchlistEntry {
    pub fn new(stock: StockRecord) -> Self {
        Self { stock, alerts: 0 }
    }

    pub fn with_alerts(stock: StockRecord, alerts: u32) -> Self {
        Self { stock, alerts }
    }
}

impl AsRef<StockRecord> for WatchlistEntry {
    fn as_ref(&self) -> &StockRecord {
        &self.stock
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistStats {
    pub gainers: usize,
    pub losers: usize,
    /// Mean percent change, absent for an empty list.
    pub avg_change: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToWatchlistRequest {
    pub symbol: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWatchlistRequest {
    pub name: String,
}
