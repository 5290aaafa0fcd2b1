//! Sortable, paginated tables over stock-like rows.
//!
//! A table is a [`TableSpec`] (title plus column descriptors) rendered
//! against a [`TableState`] (sort, page, refresh flag) and a row slice. The
//! rows themselves live with whoever owns them, so the same state works for
//! plain stock rows, scan results and watchlist entries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::format;
use crate::models::{StockRecord, WatchlistEntry};
use crate::pagination::PaginationView;

pub const EMPTY_MESSAGE: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    Symbol,
    Name,
    Price,
    Change,
    ChangePercent,
    Volume,
    MarketCap,
    Sector,
    Alerts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: ColumnKey,
    pub direction: SortDirection,
}

/// Raw cell value used for ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Count(u64),
    Missing,
}

impl FieldValue<'_> {
    fn as_number(&self) -> Option<f64> {
        match *self {
            FieldValue::Number(n) => Some(n),
            FieldValue::Count(n) => Some(n as f64),
            _ => None,
        }
    }

    /// Plain less-than/greater-than; anything incomparable is `Equal`.
    pub fn compare(&self, other: &Self) -> Ordering {
        let ordering = match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.partial_cmp(b),
            (FieldValue::Count(a), FieldValue::Count(b)) => a.partial_cmp(b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        };
        ordering.unwrap_or(Ordering::Equal)
    }
}

pub trait Row {
    fn field(&self, key: ColumnKey) -> FieldValue<'_>;
}

impl Row for StockRecord {
    fn field(&self, key: ColumnKey) -> FieldValue<'_> {
        match key {
            ColumnKey::Symbol => FieldValue::Text(&self.symbol),
            ColumnKey::Name => FieldValue::Text(&self.name),
            ColumnKey::Price => FieldValue::Number(self.price),
            ColumnKey::Change => FieldValue::Number(self.change),
            ColumnKey::ChangePercent => FieldValue::Number(self.change_percent),
            ColumnKey::Volume => FieldValue::Count(self.volume),
            ColumnKey::MarketCap => FieldValue::Text(&self.market_cap),
            ColumnKey::Sector => FieldValue::Text(&self.sector),
            ColumnKey::Alerts => FieldValue::Missing,
        }
    }
}

impl Row for WatchlistEntry {
    fn field(&self, key: ColumnKey) -> FieldValue<'_> {
        match key {
            ColumnKey::Alerts => FieldValue::Count(u64::from(self.alerts)),
            other => self.stock.field(other),
        }
    }
}

pub struct Column<R> {
    pub key: ColumnKey,
    pub title: &'static str,
    pub sortable: bool,
    render: fn(&R) -> String,
}

impl<R> Column<R> {
    pub fn new(
        key: ColumnKey,
        title: &'static str,
        sortable: bool,
        render: fn(&R) -> String,
    ) -> Self {
        Self {
            key,
            title,
            sortable,
            render,
        }
    }

    pub fn render(&self, row: &R) -> String {
        (self.render)(row)
    }

    fn meta(&self) -> ColumnMeta {
        ColumnMeta {
            key: self.key,
            title: self.title,
            sortable: self.sortable,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnMeta {
    pub key: ColumnKey,
    pub title: &'static str,
    pub sortable: bool,
}

/// Symbol, name, price, change, % change and volume.
pub fn quote_columns<R: AsRef<StockRecord>>() -> Vec<Column<R>> {
    vec![
        Column::new(ColumnKey::Symbol, "Symbol", true, |r: &R| r.as_ref().symbol.clone()),
        Column::new(ColumnKey::Name, "Company Name", false, |r: &R| r.as_ref().name.clone()),
        Column::new(ColumnKey::Price, "Price", true, |r: &R| format::price(r.as_ref().price)),
        Column::new(ColumnKey::Change, "Change", true, |r: &R| format::change(r.as_ref().change)),
        Column::new(ColumnKey::ChangePercent, "% Change", true, |r: &R| {
            format::percent(r.as_ref().change_percent)
        }),
        Column::new(ColumnKey::Volume, "Volume", true, |r: &R| format::volume(r.as_ref().volume)),
    ]
}

pub fn scan_columns() -> Vec<Column<StockRecord>> {
    let mut columns = quote_columns();
    columns.push(Column::new(ColumnKey::Sector, "Sector", false, |r: &StockRecord| {
        r.sector.clone()
    }));
    columns
}

pub fn watchlist_columns() -> Vec<Column<WatchlistEntry>> {
    let mut columns = quote_columns();
    columns.push(Column::new(ColumnKey::Alerts, "Alerts", false, |r: &WatchlistEntry| {
        if r.alerts > 0 {
            r.alerts.to_string()
        } else {
            String::new()
        }
    }));
    columns
}

pub struct TableSpec<R> {
    pub title: String,
    pub columns: Vec<Column<R>>,
}

impl<R> TableSpec<R> {
    pub fn new(title: impl Into<String>, columns: Vec<Column<R>>) -> Self {
        Self {
            title: title.into(),
            columns,
        }
    }

    pub fn is_sortable(&self, key: ColumnKey) -> bool {
        self.columns.iter().any(|c| c.key == key && c.sortable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    sort: Option<SortConfig>,
    current_page: usize,
    page_size: usize,
    refreshing: bool,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            current_page: 1,
            page_size: page_size.max(1),
            refreshing: false,
        }
    }

    pub fn with_sort(mut self, sort: Option<SortConfig>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    pub fn sort(&self) -> Option<SortConfig> {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Header click: same key flips asc to desc, anything else sorts
    /// ascending by `key`.
    pub fn request_sort(&mut self, key: ColumnKey) -> SortConfig {
        let direction = match self.sort {
            Some(current) if current.key == key && current.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        let config = SortConfig { key, direction };
        self.sort = Some(config);
        config
    }

    /// Not clamped; pages past the end render empty.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Returns `false` if a refresh is already in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        self.current_page = 1;
        true
    }

    pub fn finish_refresh(&mut self) {
        self.refreshing = false;
    }

    /// Clears the in-flight flag after a failed fetch; rows stay as they were.
    pub fn abort_refresh(&mut self) {
        self.refreshing = false;
    }

    pub fn total_pages(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size)
    }

    pub fn sorted<'r, R: Row>(&self, rows: &'r [R]) -> Vec<&'r R> {
        let mut sorted: Vec<&R> = rows.iter().collect();
        if let Some(SortConfig { key, direction }) = self.sort {
            sorted.sort_by(|a, b| {
                let ordering = a.field(key).compare(&b.field(key));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        sorted
    }

    pub fn page_of<'r, R: Row>(&self, rows: &'r [R], page: usize) -> Vec<&'r R> {
        let Some(start) = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.page_size))
        else {
            return Vec::new();
        };
        self.sorted(rows)
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn current_rows<'r, R: Row>(&self, rows: &'r [R]) -> Vec<&'r R> {
        self.page_of(rows, self.current_page)
    }

    pub fn render<R: Row + Clone>(&self, spec: &TableSpec<R>, rows: &[R]) -> TablePage<R> {
        let page_rows = self.current_rows(rows);
        let cells = page_rows
            .iter()
            .map(|row| spec.columns.iter().map(|c| c.render(row)).collect())
            .collect();
        let total_pages = self.total_pages(rows.len());

        TablePage {
            title: spec.title.clone(),
            columns: spec.columns.iter().map(Column::meta).collect(),
            rows: page_rows.into_iter().cloned().collect(),
            cells,
            sort: self.sort,
            current_page: self.current_page,
            page_size: self.page_size,
            total_rows: rows.len(),
            pagination: PaginationView::new(
                self.current_page,
                total_pages,
                self.page_size,
                rows.len(),
            ),
            refreshing: self.refreshing,
            empty_message: rows.is_empty().then_some(EMPTY_MESSAGE),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage<R> {
    pub title: String,
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<R>,
    /// Rendered strings, one per column, for each row in `rows`.
    pub cells: Vec<Vec<String>>,
    pub sort: Option<SortConfig>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub pagination: Option<PaginationView>,
    pub refreshing: bool,
    pub empty_message: Option<&'static str>,
}
