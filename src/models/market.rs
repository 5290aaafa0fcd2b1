use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StockRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub name: String,
    pub symbol: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SectorPerformance {
    pub sector: String,
    pub change: f64,
    pub stocks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsArticle {
    pub id: u32,
    pub title: String,
    pub summary: String,
    /// Relative, display-only ("2 hours ago").
    pub time: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Breaking,
    Earnings,
    Merger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketAlert {
    pub kind: AlertKind,
    pub title: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub indices: Vec<MarketIndex>,
    pub sectors: Vec<SectorPerformance>,
    pub top_gainers: Vec<StockRecord>,
    pub top_losers: Vec<StockRecord>,
}
