//! Per-visitor view state.
//!
//! A session owns what each dashboard page would otherwise keep locally:
//! the gainers/losers tables, the scanner, the watchlist and the book of
//! named watchlists. Sessions live in a [`SessionStore`] keyed by UUID.
//!
//! Refreshes never hold a map guard across the data-source await: the
//! store flags the target, releases the entry, fetches, then re-acquires
//! the entry to apply rows. A session dropped mid-refresh discards the
//! result.
//!
//! Sessions untouched for longer than the store's idle timeout are
//! treated as gone and swept out of the map.

use std::time::{Duration, Instant};

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::market;
use crate::models::{StockRecord, WatchlistEntry, WatchlistStats};
use crate::scanner::{self, ScanCriteria};
use crate::source::DataSource;
use crate::table::{
    quote_columns, scan_columns, watchlist_columns, ColumnKey, SortConfig, TablePage, TableSpec,
    TableState,
};
use crate::watchlist::{Watchlist, WatchlistBook, WatchlistFilter, WatchlistSort, WatchlistSummary};

pub const MOVERS_PAGE_SIZE: usize = 5;
pub const SCANNER_PAGE_SIZE: usize = 15;
pub const WATCHLIST_PAGE_SIZE: usize = 10;
pub const NAMED_LIST_PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableId {
    Gainers,
    Losers,
    Scanner,
    Watchlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
    Table(TableId),
    Book,
}

/// A session table rendered for the wire; row shape depends on the table.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RenderedTable {
    Stocks(TablePage<StockRecord>),
    Watchlist(TablePage<WatchlistEntry>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistView {
    pub entries: Vec<WatchlistEntry>,
    pub total_alerts: u32,
    pub stats: WatchlistStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub lists: Vec<WatchlistSummary>,
    pub total_alerts: u32,
    pub refreshing: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedListView {
    #[serde(flatten)]
    pub table: TablePage<WatchlistEntry>,
    pub filter: WatchlistFilter,
    pub order: WatchlistSort,
    pub stats: WatchlistStats,
    pub total_alerts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movers {
    Gainers,
    Losers,
}

#[derive(Debug, Clone)]
struct MoversTable {
    movers: Movers,
    rows: Vec<StockRecord>,
    state: TableState,
}

impl MoversTable {
    fn new(movers: Movers, quotes: &[StockRecord]) -> Self {
        let mut table = Self {
            movers,
            rows: Vec::new(),
            state: TableState::new(MOVERS_PAGE_SIZE),
        };
        table.load(quotes);
        table
    }

    fn load(&mut self, quotes: &[StockRecord]) {
        self.rows = match self.movers {
            Movers::Gainers => market::top_gainers(quotes, market::TOP_MOVERS),
            Movers::Losers => market::top_losers(quotes, market::TOP_MOVERS),
        };
    }

    fn spec(&self) -> TableSpec<StockRecord> {
        let title = match self.movers {
            Movers::Gainers => "Top Gainers",
            Movers::Losers => "Top Losers",
        };
        TableSpec::new(title, quote_columns())
    }
}

#[derive(Debug, Clone)]
struct ScannerView {
    criteria: ScanCriteria,
    state: TableState,
}

#[derive(Debug, Clone)]
pub struct Session {
    /// Latest quotes this session has seen; the scanner universe and the
    /// source of add-to-watchlist candidates.
    quotes: Vec<StockRecord>,
    gainers: MoversTable,
    losers: MoversTable,
    scanner: ScannerView,
    watchlist: Watchlist,
    watchlist_state: TableState,
    book: WatchlistBook,
    book_refreshing: bool,
    last_seen: Instant,
}

fn scanner_spec() -> TableSpec<StockRecord> {
    TableSpec::new("Filtered Results", scan_columns())
}

fn watchlist_spec() -> TableSpec<WatchlistEntry> {
    TableSpec::new("My Watchlist", watchlist_columns())
}

impl Session {
    pub fn new(quotes: Vec<StockRecord>) -> Self {
        Self {
            gainers: MoversTable::new(Movers::Gainers, &quotes),
            losers: MoversTable::new(Movers::Losers, &quotes),
            scanner: ScannerView {
                criteria: ScanCriteria::default(),
                state: TableState::new(SCANNER_PAGE_SIZE),
            },
            watchlist: Watchlist::seeded(&quotes),
            watchlist_state: TableState::new(WATCHLIST_PAGE_SIZE),
            book: WatchlistBook::seeded(&quotes),
            book_refreshing: false,
            last_seen: Instant::now(),
            quotes,
        }
    }

    fn state_mut(&mut self, table: TableId) -> &mut TableState {
        match table {
            TableId::Gainers => &mut self.gainers.state,
            TableId::Losers => &mut self.losers.state,
            TableId::Scanner => &mut self.scanner.state,
            TableId::Watchlist => &mut self.watchlist_state,
        }
    }

    fn is_sortable(&self, table: TableId, key: ColumnKey) -> bool {
        match table {
            TableId::Gainers => self.gainers.spec().is_sortable(key),
            TableId::Losers => self.losers.spec().is_sortable(key),
            TableId::Scanner => scanner_spec().is_sortable(key),
            TableId::Watchlist => watchlist_spec().is_sortable(key),
        }
    }

    pub fn render(&self, table: TableId) -> RenderedTable {
        match table {
            TableId::Gainers => {
                let movers = &self.gainers;
                RenderedTable::Stocks(movers.state.render(&movers.spec(), &movers.rows))
            }
            TableId::Losers => {
                let movers = &self.losers;
                RenderedTable::Stocks(movers.state.render(&movers.spec(), &movers.rows))
            }
            TableId::Scanner => {
                let matches = scanner::scan(&self.quotes, &self.scanner.criteria);
                RenderedTable::Stocks(self.scanner.state.render(&scanner_spec(), &matches))
            }
            TableId::Watchlist => RenderedTable::Watchlist(
                self.watchlist_state
                    .render(&watchlist_spec(), self.watchlist.entries()),
            ),
        }
    }

    pub fn sort(&mut self, table: TableId, key: ColumnKey) -> Result<SortConfig, AppError> {
        if !self.is_sortable(table, key) {
            return Err(AppError::InvalidQuery(format!(
                "column {key:?} is not sortable"
            )));
        }
        Ok(self.state_mut(table).request_sort(key))
    }

    pub fn set_page(&mut self, table: TableId, page: usize) {
        self.state_mut(table).set_page(page);
    }

    pub fn criteria(&self) -> &ScanCriteria {
        &self.scanner.criteria
    }

    /// Keeps the current page; a page past the new result count renders empty.
    pub fn set_criteria(&mut self, criteria: ScanCriteria) {
        self.scanner.criteria = criteria;
    }

    pub fn begin_refresh(&mut self, target: RefreshTarget) -> Result<(), AppError> {
        let started = match target {
            RefreshTarget::Table(table) => self.state_mut(table).begin_refresh(),
            RefreshTarget::Book if self.book_refreshing => false,
            RefreshTarget::Book => {
                self.book_refreshing = true;
                true
            }
        };
        if started {
            Ok(())
        } else {
            Err(AppError::RefreshInProgress)
        }
    }

    pub fn finish_refresh(&mut self, target: RefreshTarget, rows: Vec<StockRecord>) {
        match target {
            RefreshTarget::Table(TableId::Gainers) => {
                self.gainers.load(&rows);
                self.gainers.state.finish_refresh();
            }
            RefreshTarget::Table(TableId::Losers) => {
                self.losers.load(&rows);
                self.losers.state.finish_refresh();
            }
            RefreshTarget::Table(TableId::Scanner) => self.scanner.state.finish_refresh(),
            RefreshTarget::Table(TableId::Watchlist) => {
                self.watchlist.apply_refresh(&rows);
                self.watchlist_state.finish_refresh();
            }
            RefreshTarget::Book => {
                self.book.apply_refresh(&rows);
                self.book_refreshing = false;
            }
        }
        self.quotes = rows;
    }

    pub fn abort_refresh(&mut self, target: RefreshTarget) {
        match target {
            RefreshTarget::Table(table) => self.state_mut(table).abort_refresh(),
            RefreshTarget::Book => self.book_refreshing = false,
        }
    }

    pub fn watchlist_view(&self) -> WatchlistView {
        WatchlistView {
            entries: self.watchlist.entries().to_vec(),
            total_alerts: self.watchlist.total_alerts(),
            stats: self.watchlist.stats(),
        }
    }

    pub fn available(&self, search: &str) -> Vec<StockRecord> {
        self.watchlist
            .available(&self.quotes, search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn watch(&mut self, symbol: &str) -> Result<WatchlistEntry, AppError> {
        let stock = market::find(&self.quotes, symbol)?.clone();
        self.watchlist.add(stock).cloned()
    }

    pub fn unwatch(&mut self, symbol: &str) -> Result<WatchlistEntry, AppError> {
        self.watchlist.remove(symbol)
    }

    pub fn book_view(&self) -> BookView {
        BookView {
            lists: self.book.summaries(),
            total_alerts: self.book.total_alerts(),
            refreshing: self.book_refreshing,
        }
    }

    pub fn create_list(&mut self, name: &str) -> Result<(), AppError> {
        self.book.create(name)
    }

    pub fn watch_in(&mut self, name: &str, symbol: &str) -> Result<WatchlistEntry, AppError> {
        let list = self.book.get_mut(name)?;
        let stock = market::find(&self.quotes, symbol)?.clone();
        list.add(stock).cloned()
    }

    pub fn unwatch_in(&mut self, name: &str, symbol: &str) -> Result<WatchlistEntry, AppError> {
        self.book.get_mut(name)?.remove(symbol)
    }

    pub fn named_list(
        &self,
        name: &str,
        filter: WatchlistFilter,
        order: WatchlistSort,
        page: usize,
    ) -> Result<NamedListView, AppError> {
        let list = self.book.get(name)?;
        let rows = list.process(filter, order);
        let state = TableState::new(NAMED_LIST_PAGE_SIZE).with_page(page);
        let spec = TableSpec::new(name, watchlist_columns());

        Ok(NamedListView {
            table: state.render(&spec, &rows),
            filter,
            order,
            stats: list.stats(),
            total_alerts: list.total_alerts(),
        })
    }

    fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    fn expired(&self, session: &Session) -> bool {
        session.idle_for() >= self.idle_timeout
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn create(&self, quotes: Vec<StockRecord>) -> Uuid {
        self.purge_expired();
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new(quotes));
        tracing::info!(session = %id, "session created");
        id
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .remove(&id)
            .map(|_| tracing::info!(session = %id, "session dropped"))
            .ok_or(AppError::SessionNotFound)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|session| !self.expired(&session))
    }

    /// Drops every idle session and returns how many went.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !self.expired(session));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            tracing::info!(purged, "idle sessions expired");
        }
        purged
    }

    /// Live entry for `id` with its idle clock reset. An expired entry is
    /// removed and reported as not found.
    fn touch(&self, id: Uuid) -> Result<RefMut<'_, Uuid, Session>, AppError> {
        let mut session = self.sessions.get_mut(&id).ok_or(AppError::SessionNotFound)?;
        if self.expired(&session) {
            drop(session);
            if self
                .sessions
                .remove_if(&id, |_, session| self.expired(session))
                .is_some()
            {
                tracing::info!(session = %id, "session expired");
            }
            return Err(AppError::SessionNotFound);
        }
        session.last_seen = Instant::now();
        Ok(session)
    }

    pub fn read<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Result<T, AppError> {
        let session = self.touch(id)?;
        Ok(f(&session))
    }

    pub fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut session = self.touch(id)?;
        f(&mut session)
    }

    /// Fetches fresh rows for `target`. A second refresh of the same target
    /// while one is in flight fails with `RefreshInProgress`.
    pub async fn refresh(
        &self,
        id: Uuid,
        target: RefreshTarget,
        source: &dyn DataSource,
    ) -> Result<(), AppError> {
        self.update(id, |s| s.begin_refresh(target))
            .inspect_err(|err| tracing::warn!(session = %id, ?target, %err, "refresh rejected"))?;
        tracing::debug!(session = %id, ?target, source = source.id(), "refresh started");

        let fetched = source.refresh().await;

        let Some(mut session) = self.sessions.get_mut(&id) else {
            tracing::info!(
                session = %id,
                ?target,
                "session dropped during refresh, result discarded"
            );
            return Err(AppError::SessionNotFound);
        };
        match fetched {
            Ok(rows) => {
                session.finish_refresh(target, rows);
                tracing::debug!(session = %id, ?target, "refresh finished");
                Ok(())
            }
            Err(err) => {
                session.abort_refresh(target);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::mock_data;
    use crate::models::{MarketIndex, NewsArticle, SectorPerformance};
    use crate::scanner::PriceRange;
    use crate::source::{MockDataSource, SourceError};

    const IDLE: Duration = Duration::from_secs(60);

    fn session() -> Session {
        Session::new(mock_data::stock_data())
    }

    fn stock_rows(table: RenderedTable) -> TablePage<StockRecord> {
        match table {
            RenderedTable::Stocks(page) => page,
            RenderedTable::Watchlist(_) => panic!("expected a stock table"),
        }
    }

    #[test]
    fn new_session_seeds_every_view() {
        let s = session();
        let gainers = stock_rows(s.render(TableId::Gainers));
        assert_eq!(gainers.title, "Top Gainers");
        assert_eq!(gainers.total_rows, 5);
        assert!(gainers.pagination.is_none());

        let scanner = stock_rows(s.render(TableId::Scanner));
        assert_eq!(scanner.total_rows, 30);
        assert_eq!(scanner.page_size, SCANNER_PAGE_SIZE);

        assert_eq!(s.watchlist_view().total_alerts, 6);
        assert_eq!(s.book_view().lists.len(), 3);
    }

    #[test]
    fn unsortable_column_is_rejected() {
        let mut s = session();
        assert!(matches!(
            s.sort(TableId::Scanner, ColumnKey::Sector),
            Err(AppError::InvalidQuery(_))
        ));
        assert!(matches!(
            s.sort(TableId::Watchlist, ColumnKey::Alerts),
            Err(AppError::InvalidQuery(_))
        ));
        let config = s.sort(TableId::Losers, ColumnKey::Volume).unwrap();
        assert_eq!(config.key, ColumnKey::Volume);
    }

    #[test]
    fn criteria_change_keeps_page() {
        let mut s = session();
        s.set_page(TableId::Scanner, 2);
        s.set_criteria(ScanCriteria {
            price: PriceRange::Under50,
            ..ScanCriteria::default()
        });
        let page = stock_rows(s.render(TableId::Scanner));
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_rows, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn watch_uses_session_quotes() {
        let mut s = session();
        let entry = s.watch("amd").unwrap();
        assert_eq!(entry.stock.symbol, "AMD");
        assert!(matches!(s.watch("AMD"), Err(AppError::AlreadyWatched)));
        assert!(matches!(s.watch("NOPE"), Err(AppError::InvalidSymbol)));
        assert!(s.available("amd").is_empty());
        s.unwatch("AMD").unwrap();
        assert_eq!(s.available("amd").len(), 1);
    }

    #[test]
    fn refresh_flow_resets_page_and_rejects_reentry() {
        let mut s = session();
        s.set_page(TableId::Watchlist, 3);
        s.begin_refresh(RefreshTarget::Table(TableId::Watchlist)).unwrap();
        assert!(matches!(
            s.begin_refresh(RefreshTarget::Table(TableId::Watchlist)),
            Err(AppError::RefreshInProgress)
        ));
        // other tables are independent
        s.begin_refresh(RefreshTarget::Table(TableId::Gainers)).unwrap();

        let mut rows = mock_data::stock_data();
        rows.iter_mut().for_each(|r| r.price = 1.0);
        s.finish_refresh(RefreshTarget::Table(TableId::Watchlist), rows);

        let view = s.watchlist_view();
        assert!(view.entries.iter().all(|e| e.stock.price == 1.0));
        assert_eq!(view.total_alerts, 6);
        match s.render(TableId::Watchlist) {
            RenderedTable::Watchlist(page) => {
                assert_eq!(page.current_page, 1);
                assert!(!page.refreshing);
            }
            RenderedTable::Stocks(_) => panic!("expected watchlist table"),
        }
    }

    #[test]
    fn named_list_renders_with_filter_and_order() {
        let s = session();
        let view = s
            .named_list("Tech Stocks", WatchlistFilter::Gainers, WatchlistSort::Price, 1)
            .unwrap();
        assert_eq!(view.table.title, "Tech Stocks");
        let symbols: Vec<_> = view.table.rows.iter().map(|e| e.stock.symbol.as_str()).collect();
        assert_eq!(symbols, ["TSLA", "AAPL", "GOOGL"]);
        assert_eq!(view.total_alerts, 3);
        assert!(matches!(
            s.named_list("Nope", WatchlistFilter::All, WatchlistSort::Symbol, 1),
            Err(AppError::UnknownWatchlist)
        ));
    }

    #[test]
    fn created_lists_take_stocks() {
        let mut s = session();
        s.create_list("Energy").unwrap();
        s.watch_in("Energy", "xom").unwrap();
        s.watch_in("Energy", "CVX").unwrap();
        assert!(matches!(s.watch_in("Energy", "XOM"), Err(AppError::AlreadyWatched)));
        assert!(matches!(s.watch_in("Energy", "NOPE"), Err(AppError::InvalidSymbol)));
        assert!(matches!(s.watch_in("Missing", "XOM"), Err(AppError::UnknownWatchlist)));

        let view = s
            .named_list("Energy", WatchlistFilter::All, WatchlistSort::Symbol, 1)
            .unwrap();
        let symbols: Vec<_> = view.table.rows.iter().map(|e| e.stock.symbol.as_str()).collect();
        assert_eq!(symbols, ["CVX", "XOM"]);

        s.unwatch_in("Energy", "CVX").unwrap();
        assert!(matches!(s.unwatch_in("Energy", "CVX"), Err(AppError::NotWatched)));
        assert_eq!(s.book_view().lists[3].count, 1);
        // the main watchlist is separate
        assert!(!s.watchlist_view().entries.iter().any(|e| e.stock.symbol == "XOM"));
    }

    #[test]
    fn criteria_round_trip_through_session() {
        let mut s = session();
        assert_eq!(s.criteria(), &ScanCriteria::default());
        let criteria = ScanCriteria {
            price: PriceRange::Under50,
            ..ScanCriteria::default()
        };
        s.set_criteria(criteria.clone());
        assert_eq!(s.criteria(), &criteria);
    }

    struct FailingSource;

    #[async_trait]
    impl DataSource for FailingSource {
        fn id(&self) -> &'static str {
            "failing"
        }
        async fn snapshot(&self) -> Result<Vec<StockRecord>, SourceError> {
            Ok(mock_data::stock_data())
        }
        async fn refresh(&self) -> Result<Vec<StockRecord>, SourceError> {
            Err(SourceError::Unavailable("offline".into()))
        }
        async fn indices(&self) -> Result<Vec<MarketIndex>, SourceError> {
            Ok(Vec::new())
        }
        async fn sectors(&self) -> Result<Vec<SectorPerformance>, SourceError> {
            Ok(Vec::new())
        }
        async fn news(&self) -> Result<Vec<NewsArticle>, SourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn store_refresh_applies_rows() {
        let store = SessionStore::new(IDLE);
        let id = store.create(mock_data::stock_data());
        let source = MockDataSource::new(Duration::ZERO);

        store
            .refresh(id, RefreshTarget::Table(TableId::Gainers), &source)
            .await
            .unwrap();
        let page = store
            .read(id, |s| stock_rows(s.render(TableId::Gainers)))
            .unwrap();
        assert!(!page.refreshing);
        assert!(page.rows.iter().all(|r| r.change_percent > 0.0));
    }

    #[tokio::test]
    async fn failed_refresh_clears_flag_and_keeps_rows() {
        let store = SessionStore::new(IDLE);
        let id = store.create(mock_data::stock_data());

        let err = store
            .refresh(id, RefreshTarget::Book, &FailingSource)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
        let view = store.read(id, Session::book_view).unwrap();
        assert!(!view.refreshing);
        assert_eq!(view.total_alerts, 4);
    }

    #[tokio::test]
    async fn refresh_of_dropped_session_is_discarded() {
        let store = std::sync::Arc::new(SessionStore::new(IDLE));
        let id = store.create(mock_data::stock_data());
        let source = MockDataSource::new(Duration::from_millis(50));

        let task = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .refresh(id, RefreshTarget::Table(TableId::Scanner), &source)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.remove(id).unwrap();

        assert!(matches!(task.await.unwrap(), Err(AppError::SessionNotFound)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::from_millis(200));
        let idle = store.create(mock_data::stock_data());
        let busy = store.create(mock_data::stock_data());

        tokio::time::sleep(Duration::from_millis(120)).await;
        store.read(busy, Session::book_view).unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(!store.contains(idle));
        assert!(matches!(store.read(idle, Session::book_view), Err(AppError::SessionNotFound)));
        assert!(store.contains(busy));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_sweeps_expired_sessions() {
        let store = SessionStore::new(Duration::ZERO);
        store.create(mock_data::stock_data());
        store.create(mock_data::stock_data());
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = SessionStore::new(IDLE);
        assert!(matches!(store.remove(Uuid::new_v4()), Err(AppError::SessionNotFound)));
        assert!(matches!(
            store.read(Uuid::new_v4(), |s| s.book_view()),
            Err(AppError::SessionNotFound)
        ));
    }
}
