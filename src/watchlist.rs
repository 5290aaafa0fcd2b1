//! Watchlists: the single "My Watchlist" page and the book of named lists.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::mock_data;
use crate::models::{StockRecord, WatchlistEntry, WatchlistStats};

/// Add-to-watchlist suggestions shown at most.
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        Self { entries }
    }

    pub fn seeded(stocks: &[StockRecord]) -> Self {
        Self::new(mock_data::seed_entries(stocks, mock_data::WATCHLIST_SEED))
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|e| e.stock.symbol == symbol)
    }

    pub fn add(&mut self, stock: StockRecord) -> Result<&WatchlistEntry, AppError> {
        if self.contains(&stock.symbol) {
            return Err(AppError::AlreadyWatched);
        }
        self.entries.push(WatchlistEntry::new(stock));
        self.entries.last().ok_or_else(|| AppError::Internal("watchlist push lost".into()))
    }

    pub fn remove(&mut self, symbol: &str) -> Result<WatchlistEntry, AppError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.stock.symbol == symbol)
            .ok_or(AppError::NotWatched)?;
        Ok(self.entries.remove(index))
    }

    /// Stocks from `universe` not yet on the list that match `search`.
    pub fn available<'a>(&self, universe: &'a [StockRecord], search: &str) -> Vec<&'a StockRecord> {
        universe
            .iter()
            .filter(|s| !self.contains(&s.symbol) && s.matches_search(search))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Swaps in refreshed quotes by symbol, keeping alert counts. Entries
    /// absent from `rows` keep their previous quote.
    pub fn apply_refresh(&mut self, rows: &[StockRecord]) {
        for entry in &mut self.entries {
            if let Some(fresh) = rows.iter().find(|r| r.symbol == entry.stock.symbol) {
                entry.stock = fresh.clone();
            }
        }
    }

    pub fn total_alerts(&self) -> u32 {
        self.entries.iter().map(|e| e.alerts).sum()
    }

    pub fn stats(&self) -> WatchlistStats {
        let gainers = self.entries.iter().filter(|e| e.stock.change_percent > 0.0).count();
        let losers = self.entries.iter().filter(|e| e.stock.change_percent < 0.0).count();
        let avg_change = (!self.entries.is_empty()).then(|| {
            let total: f64 = self.entries.iter().map(|e| e.stock.change_percent).sum();
            total / self.entries.len() as f64
        });
        WatchlistStats {
            gainers,
            losers,
            avg_change,
        }
    }

    pub fn process(&self, filter: WatchlistFilter, sort: WatchlistSort) -> Vec<WatchlistEntry> {
        let mut rows: Vec<WatchlistEntry> = self
            .entries
            .iter()
            .filter(|e| filter.keeps(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistFilter {
    #[default]
    All,
    Gainers,
    Losers,
    Alerts,
}

impl WatchlistFilter {
    fn keeps(self, entry: &WatchlistEntry) -> bool {
        match self {
            WatchlistFilter::All => true,
            WatchlistFilter::Gainers => entry.stock.change_percent > 0.0,
            WatchlistFilter::Losers => entry.stock.change_percent < 0.0,
            WatchlistFilter::Alerts => entry.alerts > 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WatchlistSort {
    #[default]
    ChangePercent,
    Price,
    Volume,
    Symbol,
}

impl WatchlistSort {
    /// Numeric keys sort high to low; symbol sorts A to Z.
    fn compare(self, a: &WatchlistEntry, b: &WatchlistEntry) -> Ordering {
        let (a, b) = (&a.stock, &b.stock);
        match self {
            WatchlistSort::ChangePercent => b
                .change_percent
                .partial_cmp(&a.change_percent)
                .unwrap_or(Ordering::Equal),
            WatchlistSort::Price => b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal),
            WatchlistSort::Volume => b.volume.cmp(&a.volume),
            WatchlistSort::Symbol => a.symbol.cmp(&b.symbol),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedWatchlist {
    pub name: String,
    pub list: Watchlist,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistSummary {
    pub name: String,
    pub count: usize,
    pub alerts: u32,
    pub stats: WatchlistStats,
}

/// Named watchlists in tab order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchlistBook {
    lists: Vec<NamedWatchlist>,
}

impl WatchlistBook {
    pub fn seeded(stocks: &[StockRecord]) -> Self {
        let lists = mock_data::WATCHLIST_BOOK_SEED
            .iter()
            .map(|(name, seed)| NamedWatchlist {
                name: name.to_string(),
                list: Watchlist::new(mock_data::seed_entries(stocks, seed)),
            })
            .collect();
        Self { lists }
    }

    pub fn names(&self) -> Vec<&str> {
        self.lists.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&Watchlist, AppError> {
        self.lists
            .iter()
            .find(|l| l.name == name)
            .map(|l| &l.list)
            .ok_or(AppError::UnknownWatchlist)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Watchlist, AppError> {
        self.lists
            .iter_mut()
            .find(|l| l.name == name)
            .map(|l| &mut l.list)
            .ok_or(AppError::UnknownWatchlist)
    }

    pub fn create(&mut self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidQuery("watchlist name must not be empty".into()));
        }
        if self.lists.iter().any(|l| l.name == name) {
            return Err(AppError::WatchlistExists);
        }
        self.lists.push(NamedWatchlist {
            name: name.to_string(),
            list: Watchlist::default(),
        });
        Ok(())
    }

    pub fn apply_refresh(&mut self, rows: &[StockRecord]) {
        for named in &mut self.lists {
            named.list.apply_refresh(rows);
        }
    }

    pub fn total_alerts(&self) -> u32 {
        self.lists.iter().map(|l| l.list.total_alerts()).sum()
    }

    pub fn summaries(&self) -> Vec<WatchlistSummary> {
        self.lists
            .iter()
            .map(|l| WatchlistSummary {
                name: l.name.clone(),
                count: l.list.len(),
                alerts: l.list.total_alerts(),
                stats: l.list.stats(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(symbol: &str) -> StockRecord {
        mock_data::stock_data()
            .into_iter()
            .find(|s| s.symbol == symbol)
            .unwrap()
    }

    #[test]
    fn add_starts_with_zero_alerts_and_rejects_duplicates() {
        let mut list = Watchlist::seeded(&mock_data::stock_data());
        let added = list.add(stock("AMD")).unwrap();
        assert_eq!(added.alerts, 0);
        assert_eq!(list.len(), 5);
        assert!(matches!(list.add(stock("AAPL")), Err(AppError::AlreadyWatched)));
    }

    #[test]
    fn remove_unknown_symbol_fails() {
        let mut list = Watchlist::seeded(&mock_data::stock_data());
        assert_eq!(list.remove("TSLA").unwrap().alerts, 1);
        assert!(matches!(list.remove("TSLA"), Err(AppError::NotWatched)));
        assert_eq!(list.total_alerts(), 5);
    }

    #[test]
    fn available_excludes_watched_and_caps_results() {
        let stocks = mock_data::stock_data();
        let list = Watchlist::seeded(&stocks);
        let all = list.available(&stocks, "");
        assert_eq!(all.len(), MAX_SUGGESTIONS);
        assert!(all.iter().all(|s| !list.contains(&s.symbol)));

        let apple = list.available(&stocks, "apple");
        assert!(apple.is_empty());
    }

    #[test]
    fn refresh_keeps_alerts_and_unknown_entries() {
        let stocks = mock_data::stock_data();
        let mut list = Watchlist::seeded(&stocks);
        let mut rows = stocks.clone();
        rows.retain(|s| s.symbol != "META");
        for row in &mut rows {
            row.price += 10.0;
        }
        list.apply_refresh(&rows);

        let aapl = &list.entries()[0];
        assert_eq!(aapl.alerts, 2);
        assert!((aapl.stock.price - 192.52).abs() < 1e-9);
        let meta = &list.entries()[3];
        assert_eq!(meta.alerts, 3);
        assert!((meta.stock.price - 484.20).abs() < 1e-9);
    }

    #[test]
    fn stats_count_direction_and_average() {
        let list = Watchlist::seeded(&mock_data::stock_data());
        let stats = list.stats();
        assert_eq!((stats.gainers, stats.losers), (4, 0));
        let avg = stats.avg_change.unwrap();
        assert!((avg - (1.36 + 5.28 + 2.64 + 1.87) / 4.0).abs() < 1e-9);

        assert_eq!(Watchlist::default().stats().avg_change, None);
    }

    #[test]
    fn process_filters_and_sorts() {
        let book = WatchlistBook::seeded(&mock_data::stock_data());
        let tech = book.get("Tech Stocks").unwrap();

        let by_change: Vec<_> = tech
            .process(WatchlistFilter::All, WatchlistSort::ChangePercent)
            .into_iter()
            .map(|e| e.stock.symbol)
            .collect();
        assert_eq!(by_change, ["TSLA", "GOOGL", "AAPL", "NVDA"]);

        let losers = tech.process(WatchlistFilter::Losers, WatchlistSort::Symbol);
        assert_eq!(losers.len(), 1);
        assert_eq!(losers[0].stock.symbol, "NVDA");

        let alerted: Vec<_> = tech
            .process(WatchlistFilter::Alerts, WatchlistSort::Symbol)
            .into_iter()
            .map(|e| e.stock.symbol)
            .collect();
        assert_eq!(alerted, ["AAPL", "TSLA"]);
    }

    #[test]
    fn book_tracks_alerts_and_names() {
        let mut book = WatchlistBook::seeded(&mock_data::stock_data());
        assert_eq!(book.names(), ["Tech Stocks", "Growth Stocks", "Dividend Stocks"]);
        assert_eq!(book.total_alerts(), 4);

        book.create("Energy").unwrap();
        assert!(matches!(book.create("Energy"), Err(AppError::WatchlistExists)));
        assert!(matches!(book.create("   "), Err(AppError::InvalidQuery(_))));
        assert!(book.get("Energy").unwrap().is_empty());
        assert!(matches!(book.get("Missing"), Err(AppError::UnknownWatchlist)));
    }

    #[test]
    fn book_refresh_updates_every_list() {
        let stocks = mock_data::stock_data();
        let mut book = WatchlistBook::seeded(&stocks);
        let mut rows = stocks.clone();
        for row in &mut rows {
            row.change_percent = -1.0;
        }
        book.apply_refresh(&rows);
        for summary in book.summaries() {
            assert_eq!(summary.stats.gainers, 0);
            assert_eq!(summary.stats.losers, summary.count);
        }
        assert_eq!(book.total_alerts(), 4);
    }
}
