//! Static demo dataset standing in for the market-data, news and billing
//! backends. Everything here is hardcoded; [`crate::source::MockDataSource`]
//! is the only consumer that perturbs it.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    AlertKind, Invoice, InvoiceStatus, MarketAlert, MarketIndex, NewsArticle, Plan, PlanId,
    SectorPerformance, StockRecord, WatchlistEntry,
};

type StockRow = (&'static str, &'static str, f64, f64, f64, u64, &'static str, &'static str);

#[rustfmt::skip]
const STOCKS: &[StockRow] = &[
    ("AAPL", "Apple Inc.", 182.52, 2.45, 1.36, 45_632_100, "2.85T", "Technology"),
    ("MSFT", "Microsoft Corporation", 378.85, -1.23, -0.32, 23_456_700, "2.81T", "Technology"),
    ("GOOGL", "Alphabet Inc.", 142.69, 3.67, 2.64, 28_934_500, "1.79T", "Technology"),
    ("AMZN", "Amazon.com Inc.", 151.94, -0.85, -0.56, 34_567_800, "1.57T", "Consumer Discretionary"),
    ("TSLA", "Tesla Inc.", 248.42, 12.45, 5.28, 89_234_100, "789.2B", "Consumer Discretionary"),
    ("NVDA", "NVIDIA Corporation", 875.28, -15.67, -1.76, 45_123_600, "2.16T", "Technology"),
    ("META", "Meta Platforms Inc.", 484.20, 8.90, 1.87, 18_765_400, "1.23T", "Communication Services"),
    ("JPM", "JPMorgan Chase & Co.", 174.83, 1.56, 0.90, 12_456_700, "507.8B", "Financial Services"),
    ("JNJ", "Johnson & Johnson", 160.24, -0.78, -0.48, 8_934_500, "421.6B", "Healthcare"),
    ("V", "Visa Inc.", 267.45, 3.21, 1.22, 6_782_300, "567.9B", "Financial Services"),
    ("UNH", "UnitedHealth Group Inc.", 525.67, -2.34, -0.44, 3_245_600, "487.2B", "Healthcare"),
    ("HD", "The Home Depot Inc.", 327.18, 4.56, 1.41, 4_321_800, "334.1B", "Consumer Discretionary"),
    ("PG", "Procter & Gamble Co.", 155.89, 0.67, 0.43, 7_654_200, "372.4B", "Consumer Staples"),
    ("MA", "Mastercard Inc.", 398.76, -3.21, -0.80, 3_567_900, "383.2B", "Financial Services"),
    ("BAC", "Bank of America Corp.", 32.45, 0.89, 2.82, 45_678_200, "262.1B", "Financial Services"),
    ("ABBV", "AbbVie Inc.", 165.43, -1.67, -1.00, 6_543_700, "293.8B", "Healthcare"),
    ("AVGO", "Broadcom Inc.", 892.34, 15.67, 1.79, 2_345_600, "411.2B", "Technology"),
    ("WMT", "Walmart Inc.", 159.78, 2.34, 1.49, 8_765_400, "435.6B", "Consumer Staples"),
    ("LLY", "Eli Lilly and Co.", 598.45, -8.90, -1.47, 3_456_700, "569.3B", "Healthcare"),
    ("XOM", "Exxon Mobil Corporation", 108.76, 3.45, 3.28, 19_876_500, "448.9B", "Energy"),
    ("CVX", "Chevron Corporation", 147.89, 2.67, 1.84, 12_345_600, "274.5B", "Energy"),
    ("ADBE", "Adobe Inc.", 567.23, -4.56, -0.80, 2_987_600, "259.8B", "Technology"),
    ("CRM", "Salesforce Inc.", 234.67, 6.78, 2.98, 5_432_100, "231.4B", "Technology"),
    ("COST", "Costco Wholesale Corp.", 789.12, -3.45, -0.44, 1_876_500, "349.7B", "Consumer Staples"),
    ("PEP", "PepsiCo Inc.", 167.89, 1.23, 0.74, 5_678_900, "231.8B", "Consumer Staples"),
    ("TMO", "Thermo Fisher Scientific Inc.", 534.76, -7.89, -1.45, 1_234_500, "209.3B", "Healthcare"),
    ("ACN", "Accenture plc", 367.45, 4.32, 1.19, 2_345_600, "232.1B", "Technology"),
    ("AMD", "Advanced Micro Devices Inc.", 145.67, 8.90, 6.51, 67_890_100, "235.4B", "Technology"),
    ("NFLX", "Netflix Inc.", 498.23, -12.45, -2.44, 4_321_700, "221.6B", "Communication Services"),
    ("COP", "ConocoPhillips", 108.34, 2.78, 2.63, 8_765_400, "138.2B", "Energy"),
];

/// Symbols and alert counts of the default watchlist.
pub const WATCHLIST_SEED: &[(&str, u32)] = &[("AAPL", 2), ("TSLA", 1), ("GOOGL", 0), ("META", 3)];

/// Named watchlists, in tab order.
pub const WATCHLIST_BOOK_SEED: &[(&str, &[(&str, u32)])] = &[
    ("Tech Stocks", &[("AAPL", 2), ("TSLA", 1), ("GOOGL", 0), ("NVDA", 0)]),
    ("Growth Stocks", &[("TSLA", 1), ("AMZN", 0)]),
    ("Dividend Stocks", &[("JNJ", 0), ("PG", 0)]),
];

pub fn stock_data() -> Vec<StockRecord> {
    STOCKS
        .iter()
        .map(|&(symbol, name, price, change, change_percent, volume, cap, sector)| {
            StockRecord {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price,
                change,
                change_percent,
                volume,
                market_cap: cap.to_string(),
                sector: sector.to_string(),
            }
        })
        .collect()
}

/// Resolves seed symbols against `stocks`. Unknown symbols are skipped.
pub fn seed_entries(stocks: &[StockRecord], seed: &[(&str, u32)]) -> Vec<WatchlistEntry> {
    seed.iter()
        .filter_map(|&(symbol, alerts)| {
            stocks
                .iter()
                .find(|s| s.symbol == symbol)
                .map(|s| WatchlistEntry::with_alerts(s.clone(), alerts))
        })
        .collect()
}

pub fn market_indices() -> Vec<MarketIndex> {
    [
        ("S&P 500", "SPX", 4567.12, 23.45, 0.52),
        ("Dow Jones", "DJI", 34821.93, -156.78, -0.45),
        ("NASDAQ", "IXIC", 14234.56, 67.89, 0.48),
        ("Russell 2000", "RUT", 1987.45, 12.34, 0.63),
    ]
    .into_iter()
    .map(|(name, symbol, value, change, change_percent)| MarketIndex {
        name: name.to_string(),
        symbol: symbol.to_string(),
        value,
        change,
        change_percent,
    })
    .collect()
}

pub fn sector_performance() -> Vec<SectorPerformance> {
    [
        ("Technology", 1.45, 156),
        ("Healthcare", -0.23, 89),
        ("Financial Services", 0.67, 134),
        ("Consumer Discretionary", 2.12, 78),
        ("Communication Services", 0.89, 45),
        ("Energy", -1.56, 67),
        ("Consumer Staples", 0.34, 54),
    ]
    .into_iter()
    .map(|(sector, change, stocks)| SectorPerformance {
        sector: sector.to_string(),
        change,
        stocks,
    })
    .collect()
}

pub fn news() -> Vec<NewsArticle> {
    [
        (
            1,
            "Apple Reports Strong Q4 Earnings, Beats Expectations",
            "Apple Inc. reported better-than-expected quarterly results driven by strong iPhone sales.",
            "2 hours ago",
            "MarketWatch",
        ),
        (
            2,
            "Tesla Stock Surges on New Model Announcement",
            "Tesla shares jumped after the company unveiled its latest electric vehicle model.",
            "4 hours ago",
            "Bloomberg",
        ),
        (
            3,
            "Fed Signals Potential Rate Cut in Next Meeting",
            "Federal Reserve hints at possible interest rate reduction to support economic growth.",
            "6 hours ago",
            "Reuters",
        ),
        (
            4,
            "Tech Sector Rallies on Strong AI Investment Numbers",
            "Major technology companies see significant gains following robust AI infrastructure spending reports.",
            "8 hours ago",
            "CNBC",
        ),
        (
            5,
            "Oil Prices Rise Amid Geopolitical Tensions",
            "Crude oil futures climb higher as international tensions affect supply concerns.",
            "10 hours ago",
            "Reuters",
        ),
    ]
    .into_iter()
    .map(|(id, title, summary, time, source)| NewsArticle {
        id,
        title: title.to_string(),
        summary: summary.to_string(),
        time: time.to_string(),
        source: source.to_string(),
    })
    .collect()
}

pub fn market_alerts() -> Vec<MarketAlert> {
    [
        (AlertKind::Breaking, "Fed Meeting Scheduled for Tomorrow", "1 hour ago"),
        (AlertKind::Earnings, "AAPL Earnings After Market Close", "3 hours ago"),
        (AlertKind::Merger, "Major Acquisition Announced in Tech Sector", "5 hours ago"),
    ]
    .into_iter()
    .map(|(kind, title, time)| MarketAlert {
        kind,
        title: title.to_string(),
        time: time.to_string(),
    })
    .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn plans() -> Vec<Plan> {
    vec![
        Plan {
            id: PlanId::Starter,
            name: "Starter".to_string(),
            description: "Perfect for beginners exploring the market".to_string(),
            monthly: Decimal::ZERO,
            annual: Decimal::ZERO,
            popular: false,
            features: strings(&[
                "3 watchlists (10 stocks each)",
                "Basic market data (15-minute delay)",
                "Simple stock screener",
                "Email alerts",
                "Mobile app access",
                "Community support",
            ]),
            limitations: strings(&[
                "Limited to 3 custom screens",
                "No advanced indicators",
                "No portfolio analytics",
                "Basic customer support",
            ]),
        },
        Plan {
            id: PlanId::Professional,
            name: "Professional".to_string(),
            description: "For serious traders and active investors".to_string(),
            monthly: Decimal::new(29, 0),
            annual: Decimal::new(290, 0),
            popular: true,
            features: strings(&[
                "Unlimited watchlists",
                "Real-time market data",
                "Advanced stock screening (50+ filters)",
                "Portfolio analytics & tracking",
                "Technical indicators & charts",
                "Price & volume alerts",
                "Mobile app with all features",
                "Priority email support",
                "Export data (CSV, Excel)",
                "Advanced news filtering",
            ]),
            limitations: strings(&["No API access", "Standard support hours"]),
        },
        Plan {
            id: PlanId::Enterprise,
            name: "Enterprise".to_string(),
            description: "For institutions and professional teams".to_string(),
            monthly: Decimal::new(99, 0),
            annual: Decimal::new(990, 0),
            popular: false,
            features: strings(&[
                "Everything in Professional",
                "REST API access",
                "Custom indicators & strategies",
                "White-label solutions",
                "Team management (up to 25 users)",
                "Advanced portfolio analytics",
                "Custom data exports",
                "Dedicated account manager",
                "24/7 phone support",
                "Priority feature requests",
                "Custom integrations",
                "SLA guarantee (99.9% uptime)",
            ]),
            limitations: Vec::new(),
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn billing_history() -> Vec<Invoice> {
    let professional_monthly = |id: &str, date: NaiveDate| Invoice {
        id: id.to_string(),
        date,
        description: "Professional Plan - Monthly".to_string(),
        amount: Decimal::new(2900, 2),
        tax: Decimal::new(232, 2),
        total: Decimal::new(3132, 2),
        status: InvoiceStatus::Paid,
        payment_method: "PayPal".to_string(),
    };

    vec![
        professional_monthly("INV-2025-003", date(2025, 3, 15)),
        professional_monthly("INV-2025-002", date(2025, 2, 15)),
        professional_monthly("INV-2025-001", date(2025, 1, 15)),
        Invoice {
            id: "INV-2024-012".to_string(),
            date: date(2024, 12, 15),
            description: "Starter Plan - Monthly".to_string(),
            amount: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            status: InvoiceStatus::Paid,
            payment_method: "Free Plan".to_string(),
        },
        Invoice {
            id: "INV-2024-011".to_string(),
            date: date(2024, 11, 20),
            description: "Professional Plan - Annual".to_string(),
            amount: Decimal::new(29000, 2),
            tax: Decimal::new(2320, 2),
            total: Decimal::new(31320, 2),
            status: InvoiceStatus::Refunded,
            payment_method: "PayPal".to_string(),
        },
    ]
}
