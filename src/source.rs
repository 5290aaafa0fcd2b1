//! Market data sources.
//!
//! Handlers only see [`DataSource`]; the demo wires in [`MockDataSource`],
//! which serves the static dataset and simulates a slow refresh.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

use crate::mock_data;
use crate::models::{MarketIndex, NewsArticle, SectorPerformance, StockRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed data from source: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn id(&self) -> &'static str;

    /// Current stock rows without simulated latency.
    async fn snapshot(&self) -> Result<Vec<StockRecord>, SourceError>;

    /// Freshly fetched stock rows. Replaces the caller's rows wholesale.
    async fn refresh(&self) -> Result<Vec<StockRecord>, SourceError>;

    async fn indices(&self) -> Result<Vec<MarketIndex>, SourceError>;

    async fn sectors(&self) -> Result<Vec<SectorPerformance>, SourceError>;

    async fn news(&self) -> Result<Vec<NewsArticle>, SourceError>;
}

pub struct MockDataSource {
    stocks: Vec<StockRecord>,
    refresh_delay: Duration,
}

impl MockDataSource {
    pub fn new(refresh_delay: Duration) -> Self {
        Self {
            stocks: mock_data::stock_data(),
            refresh_delay,
        }
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn snapshot(&self) -> Result<Vec<StockRecord>, SourceError> {
        Ok(self.stocks.clone())
    }

    async fn refresh(&self) -> Result<Vec<StockRecord>, SourceError> {
        tokio::time::sleep(self.refresh_delay).await;
        let rows = perturb(&self.stocks, &mut rand::thread_rng());
        tracing::debug!(rows = rows.len(), "mock refresh resolved");
        Ok(rows)
    }

    async fn indices(&self) -> Result<Vec<MarketIndex>, SourceError> {
        Ok(mock_data::market_indices())
    }

    async fn sectors(&self) -> Result<Vec<SectorPerformance>, SourceError> {
        Ok(mock_data::sector_performance())
    }

    async fn news(&self) -> Result<Vec<NewsArticle>, SourceError> {
        Ok(mock_data::news())
    }
}

/// Returns jittered copies of `base`.
///
/// `price` and `volume` move relative to the base row; `change` and
/// `change_percent` are replaced outright, so they are not kept consistent
/// with each other or with the price move.
pub fn perturb<R: Rng + ?Sized>(base: &[StockRecord], rng: &mut R) -> Vec<StockRecord> {
    base.iter()
        .map(|stock| {
            let volume_delta = ((rng.gen::<f64>() - 0.5) * 1_000_000.0).floor() as i64;
            let price = stock.price + (rng.gen::<f64>() - 0.5) * 2.0;
            let change = (rng.gen::<f64>() - 0.5) * 5.0;
            let change_percent = (rng.gen::<f64>() - 0.5) * 3.0;
            StockRecord {
                price,
                change,
                change_percent,
                volume: stock.volume.saturating_add_signed(volume_delta),
                ..stock.clone()
            }
        })
        .collect()
}
