//! Market overview, symbol lookup and news search over the current rows.

use std::cmp::Ordering;

use rand::Rng;

use crate::error::AppError;
use crate::models::{
    MarketIndex, MarketOverview, NewsArticle, SectorPerformance, StockDetail, StockRecord,
};

pub const TOP_MOVERS: usize = 5;
pub const MAX_LOOKUP_RESULTS: usize = 8;

fn by_change_percent(a: &StockRecord, b: &StockRecord) -> Ordering {
    a.change_percent
        .partial_cmp(&b.change_percent)
        .unwrap_or(Ordering::Equal)
}

pub fn top_gainers(stocks: &[StockRecord], n: usize) -> Vec<StockRecord> {
    let mut gainers: Vec<StockRecord> = stocks
        .iter()
        .filter(|s| s.change_percent > 0.0)
        .cloned()
        .collect();
    gainers.sort_by(|a, b| by_change_percent(b, a));
    gainers.truncate(n);
    gainers
}

pub fn top_losers(stocks: &[StockRecord], n: usize) -> Vec<StockRecord> {
    let mut losers: Vec<StockRecord> = stocks
        .iter()
        .filter(|s| s.change_percent < 0.0)
        .cloned()
        .collect();
    losers.sort_by(by_change_percent);
    losers.truncate(n);
    losers
}

pub fn overview(
    stocks: &[StockRecord],
    indices: Vec<MarketIndex>,
    sectors: Vec<SectorPerformance>,
) -> MarketOverview {
    MarketOverview {
        indices,
        sectors,
        top_gainers: top_gainers(stocks, TOP_MOVERS),
        top_losers: top_losers(stocks, TOP_MOVERS),
    }
}

/// Typeahead matches on symbol or name. A blank query yields nothing.
pub fn search<'a>(stocks: &'a [StockRecord], query: &str) -> Vec<&'a StockRecord> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    stocks
        .iter()
        .filter(|s| s.matches_search(query))
        .take(MAX_LOOKUP_RESULTS)
        .collect()
}

pub fn find<'a>(stocks: &'a [StockRecord], symbol: &str) -> Result<&'a StockRecord, AppError> {
    stocks
        .iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
        .ok_or(AppError::InvalidSymbol)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Detail view with fundamentals drawn fresh from `rng` on every call.
pub fn detail<R: Rng + ?Sized>(stock: &StockRecord, rng: &mut R) -> StockDetail {
    let pe = 15.4 + rng.gen::<f64>() * 10.0;
    let eps = stock.price / (15.0 + rng.gen::<f64>() * 10.0);
    let dividend = if rng.gen::<f64>() > 0.5 {
        Some(round2(rng.gen::<f64>() * 3.0))
    } else {
        None
    };
    let beta = round2(0.8 + rng.gen::<f64>() * 0.8);
    let avg_volume = (stock.volume as f64 * (0.8 + rng.gen::<f64>() * 0.4)) as u64;

    StockDetail {
        year_high: stock.price * 1.25,
        year_low: stock.price * 0.75,
        pe,
        eps,
        dividend,
        beta,
        avg_volume,
        description: format!(
            "{} operates in the {} sector and is a leading company in its industry.",
            stock.name, stock.sector
        ),
        stock: stock.clone(),
    }
}

pub fn search_news(articles: Vec<NewsArticle>, query: &str) -> Vec<NewsArticle> {
    let query = query.to_lowercase();
    articles
        .into_iter()
        .filter(|a| {
            a.title.to_lowercase().contains(&query) || a.summary.to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mock_data;

    fn symbols(rows: &[StockRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn movers_are_ordered_and_capped() {
        let stocks = mock_data::stock_data();
        assert_eq!(
            symbols(&top_gainers(&stocks, TOP_MOVERS)),
            ["AMD", "TSLA", "XOM", "CRM", "BAC"]
        );
        assert_eq!(
            symbols(&top_losers(&stocks, TOP_MOVERS)),
            ["NFLX", "NVDA", "LLY", "TMO", "ABBV"]
        );
    }

    #[test]
    fn movers_skip_flat_rows() {
        let mut stocks = mock_data::stock_data();
        for s in &mut stocks {
            s.change_percent = 0.0;
        }
        assert!(top_gainers(&stocks, 5).is_empty());
        assert!(top_losers(&stocks, 5).is_empty());
    }

    #[test]
    fn lookup_search_matches_symbol_or_name() {
        let stocks = mock_data::stock_data();
        assert!(search(&stocks, "   ").is_empty());

        let micro: Vec<_> = search(&stocks, "MICRO").iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(micro, ["MSFT", "AMD"]);

        assert_eq!(search(&stocks, "a").len(), MAX_LOOKUP_RESULTS);
    }

    #[test]
    fn find_is_case_insensitive() {
        let stocks = mock_data::stock_data();
        assert_eq!(find(&stocks, "nvda").unwrap().name, "NVIDIA Corporation");
        assert!(matches!(find(&stocks, "ZZZZ"), Err(AppError::InvalidSymbol)));
    }

    #[test]
    fn detail_stays_within_generated_ranges() {
        let stocks = mock_data::stock_data();
        let aapl = find(&stocks, "AAPL").unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let d = detail(aapl, &mut rng);
            assert!((d.year_high - 182.52 * 1.25).abs() < 1e-9);
            assert!((d.year_low - 182.52 * 0.75).abs() < 1e-9);
            assert!((15.4..25.4).contains(&d.pe));
            assert!(d.eps > 182.52 / 25.0 && d.eps <= 182.52 / 15.0);
            assert!((0.8..=1.6).contains(&d.beta));
            if let Some(dividend) = d.dividend {
                assert!((0.0..=3.0).contains(&dividend));
            }
            assert!(d.avg_volume >= 36_505_679 && d.avg_volume <= 54_758_520);
            assert_eq!(
                d.description,
                "Apple Inc. operates in the Technology sector and is a leading company in its industry."
            );
        }
    }

    #[test]
    fn news_search_checks_title_and_summary() {
        let hits = search_news(mock_data::news(), "rate");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);

        let summary_only = search_news(mock_data::news(), "iphone");
        assert_eq!(summary_only[0].id, 1);

        assert_eq!(search_news(mock_data::news(), "").len(), 5);
    }
}
